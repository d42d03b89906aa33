//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod query_service;

pub use query_service::{fetch_voice_over, LanguageMap, QueryError, QueryServicePort};
