//! Query Results
//!
//! 后端响应中 `data` 字段的内容

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

use super::language::LangCode;

/// 带耗时的查询结果 `{contents, time}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timed<T> {
    pub contents: T,
    /// 后端查询耗时（毫秒）
    #[serde(default)]
    pub time: f64,
}

/// 单条文本检索结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEntry {
    /// 文本类别（Dialogue、Fetter 等）
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// 出处（任务名、角色名、书名等）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default)]
    pub voice_paths: Vec<String>,
    /// 语言代码 -> 译文
    #[serde(default)]
    pub translates: BTreeMap<LangCode, String>,
    /// 文本哈希；书籍/字幕结果为其 id，可能是数字或字符串
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_talk: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// 整段对话 `getTalkFromHash`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TalkContent {
    #[serde(default)]
    pub talk_quest_name: Option<String>,
    pub talk_id: u64,
    #[serde(default)]
    pub dialogues: Vec<TalkDialogue>,
}

/// 对话中的一句
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TalkDialogue {
    #[serde(default)]
    pub translates: BTreeMap<LangCode, String>,
    #[serde(default)]
    pub voice_paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<serde_json::Value>,
    #[serde(default)]
    pub talker: Option<String>,
    #[serde(default)]
    pub dialogue_id: Option<u64>,
}

/// 关键词释义 `{k, v}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordExplanation {
    pub k: String,
    pub v: String,
}

impl KeywordExplanation {
    /// 释义查询未启用时返回的固定占位数据
    pub fn placeholder() -> Self {
        Self {
            k: "KEYWORD".to_string(),
            v: "KEYWORD EXPLAIN".to_string(),
        }
    }
}

/// 语音获取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceOver {
    /// 音频数据（wem 原始字节）
    Audio(Vec<u8>),
    /// 请求成功但响应体为空
    Empty,
    /// 服务端明确表示无法提供该语音
    Unavailable { reason: String },
}

impl VoiceOver {
    pub fn audio(&self) -> Option<&[u8]> {
        match self {
            VoiceOver::Audio(data) => Some(data),
            _ => None,
        }
    }
}

/// 旅行者性别过滤（线上格式为 `true` / `false` / `"both"`）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GenderFilter {
    Male,
    Female,
    #[default]
    Both,
}

impl Serialize for GenderFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GenderFilter::Male => serializer.serialize_bool(true),
            GenderFilter::Female => serializer.serialize_bool(false),
            GenderFilter::Both => serializer.serialize_str("both"),
        }
    }
}

impl<'de> Deserialize<'de> for GenderFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Flag(bool),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Flag(true) => Ok(GenderFilter::Male),
            Repr::Flag(false) => Ok(GenderFilter::Female),
            Repr::Text(text) if text == "both" => Ok(GenderFilter::Both),
            Repr::Text(text) => Err(de::Error::custom(format!(
                "invalid isMale value: {:?}",
                text
            ))),
        }
    }
}

/// 后端设置 `getSettings` / `saveSettings`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// 检索结果中展示的语言
    pub result_languages: Vec<LangCode>,
    pub default_search_language: LangCode,
    /// 游戏资源目录
    pub asset_dir: String,
    /// 出处（任务名、说话者）使用的语言
    pub source_language: LangCode,
    pub is_male: GenderFilter,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            result_languages: vec![LangCode::new(1), LangCode::new(4), LangCode::new(9)],
            default_search_language: LangCode::new(1),
            asset_dir: String::new(),
            source_language: LangCode::new(1),
            is_male: GenderFilter::Both,
        }
    }
}

/// 设置修改，仅发送存在的字段
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_search_language: Option<LangCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_languages: Option<Vec<LangCode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_language: Option<LangCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_male: Option<GenderFilter>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.default_search_language.is_none()
            && self.result_languages.is_none()
            && self.source_language.is_none()
            && self.is_male.is_none()
    }
}

/// 启动状态 `startupStatus`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartupStatus {
    pub asset_dir_valid: bool,
    #[serde(default)]
    pub asset_dir: String,
}

/// 资源目录变更结果 `setAssetDir` / `pickAssetDir`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDirUpdate {
    /// 仅 `pickAssetDir` 返回，用户取消选择时为 true
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel: Option<bool>,
    #[serde(default)]
    pub asset_dir: String,
    pub asset_dir_valid: bool,
}
