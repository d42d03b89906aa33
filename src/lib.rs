//! textmap-query - 游戏文本与语音检索客户端
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - 请求体、响应数据、语言代码
//! - 前端构建清单
//!
//! 应用层 (application/):
//! - Ports: 检索服务端口（QueryServicePort）
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: HTTP 检索客户端、测试用 Fake 客户端
//! - Memory: 界面共享状态

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use application::{QueryError, QueryServicePort};
pub use config::{load_config, AppConfig};
pub use infrastructure::{HttpQueryClient, HttpQueryClientConfig, UiState};
