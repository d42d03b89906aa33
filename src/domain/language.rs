//! Language Codes
//!
//! 后端用整数标识语言（文本语言与语音语言共用同一套编号）

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 语言代码解析错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("无效的语言代码: {0:?}")]
pub struct LangCodeError(pub String);

/// 语言代码
///
/// JSON 中序列化为裸整数；作为 map key 时序列化为字符串（如 `"1"`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LangCode(u32);

impl LangCode {
    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    /// 宽松解析：取字符串开头的整数部分
    ///
    /// 忽略首尾空白与整数之后的字符，`"2"`、`" 2 "`、`"2abc"` 都得到 2；
    /// 开头没有数字（或为负数）则报错。
    /// 取值上限为 `u32::MAX`，超出时报错而不是截断
    pub fn parse_leading(input: &str) -> Result<Self, LangCodeError> {
        let trimmed = input.trim();
        let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let digits: String = unsigned.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return Err(LangCodeError(input.to_string()));
        }
        digits
            .parse::<u32>()
            .map(Self)
            .map_err(|_| LangCodeError(input.to_string()))
    }
}

impl From<u32> for LangCode {
    fn from(code: u32) -> Self {
        Self(code)
    }
}

/// 严格解析，整个字符串必须是非负整数
impl std::str::FromStr for LangCode {
    type Err = LangCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u32>()
            .map(Self)
            .map_err(|_| LangCodeError(s.to_string()))
    }
}

impl std::fmt::Display for LangCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 可以被强制转换为 [`LangCode`] 的值
///
/// 语音接口要求 `langCode` 必须是整数，调用方可能持有数字或字符串
pub trait IntoLangCode {
    fn into_lang_code(self) -> Result<LangCode, LangCodeError>;
}

impl IntoLangCode for LangCode {
    fn into_lang_code(self) -> Result<LangCode, LangCodeError> {
        Ok(self)
    }
}

impl IntoLangCode for u32 {
    fn into_lang_code(self) -> Result<LangCode, LangCodeError> {
        Ok(LangCode(self))
    }
}

impl IntoLangCode for i64 {
    fn into_lang_code(self) -> Result<LangCode, LangCodeError> {
        u32::try_from(self)
            .map(LangCode)
            .map_err(|_| LangCodeError(self.to_string()))
    }
}

/// 向零取整，`2.5` 得到 2
impl IntoLangCode for f64 {
    fn into_lang_code(self) -> Result<LangCode, LangCodeError> {
        let truncated = self.trunc();
        if truncated.is_finite() && (0.0..=u32::MAX as f64).contains(&truncated) {
            Ok(LangCode(truncated as u32))
        } else {
            Err(LangCodeError(self.to_string()))
        }
    }
}

impl IntoLangCode for &str {
    fn into_lang_code(self) -> Result<LangCode, LangCodeError> {
        LangCode::parse_leading(self)
    }
}

impl IntoLangCode for String {
    fn into_lang_code(self) -> Result<LangCode, LangCodeError> {
        LangCode::parse_leading(&self)
    }
}

impl IntoLangCode for &String {
    fn into_lang_code(self) -> Result<LangCode, LangCodeError> {
        LangCode::parse_leading(self)
    }
}
