//! 应用层
//!
//! - ports: 检索服务端口定义

pub mod ports;

pub use ports::{fetch_voice_over, LanguageMap, QueryError, QueryServicePort};
