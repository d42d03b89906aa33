//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::infrastructure::adapters::HttpQueryClientConfig;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 检索客户端配置
    #[serde(default)]
    pub client: ClientConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,

    /// 前端构建清单配置
    #[serde(default)]
    pub bundle: BundleConfig,
}

/// 检索客户端配置
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// 后端基础 URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// 是否启用关键词释义接口
    #[serde(default)]
    pub baidu_enabled: bool,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            baidu_enabled: false,
        }
    }
}

impl ClientConfig {
    /// 转换为 HTTP 客户端配置
    pub fn http_config(&self) -> HttpQueryClientConfig {
        HttpQueryClientConfig::new(self.base_url.clone())
            .with_timeout(self.timeout_secs)
            .with_baidu(self.baidu_enabled)
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// 构建清单配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BundleConfig {
    /// 清单文件路径，未设置时使用内置清单
    #[serde(default)]
    pub manifest: Option<PathBuf>,
}
