//! 后端统一响应格式 `{data, code, msg}`

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::application::ports::QueryError;
use crate::domain::Timed;

/// 成功响应码
pub const CODE_OK: i64 = 200;

fn default_code() -> i64 {
    CODE_OK
}

/// 统一响应包装
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub data: Value,
    #[serde(default = "default_code")]
    pub code: i64,
    #[serde(default)]
    pub msg: String,
}

impl ApiEnvelope {
    pub fn parse(body: &[u8]) -> Result<Self, QueryError> {
        serde_json::from_slice(body)
            .map_err(|e| QueryError::InvalidResponse(format!("Malformed envelope: {}", e)))
    }

    /// 取出 `data`，`code` 非 200 时返回服务端错误
    pub fn into_data(self) -> Result<Value, QueryError> {
        if self.code != CODE_OK {
            return Err(QueryError::Service {
                code: self.code,
                msg: self.msg,
            });
        }
        Ok(self.data)
    }
}

/// 将 `data` 解码为具体类型
pub fn decode<T: DeserializeOwned>(data: Value) -> Result<T, QueryError> {
    serde_json::from_value(data)
        .map_err(|e| QueryError::InvalidResponse(format!("Unexpected payload: {}", e)))
}

/// 解码 `{contents, time}`；空关键词时后端返回 `[]`，视为空结果
pub fn decode_timed<T: DeserializeOwned + Default>(data: Value) -> Result<Timed<T>, QueryError> {
    match &data {
        Value::Array(items) if items.is_empty() => Ok(Timed::default()),
        _ => decode(data),
    }
}
