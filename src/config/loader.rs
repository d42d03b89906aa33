//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（textmap.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["textmap", "textmap.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "TEXTMAP";

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `TEXTMAP_`，层级分隔符 `__`）
/// 2. 配置文件（textmap.toml 或 textmap.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `TEXTMAP_CLIENT__BASE_URL=http://127.0.0.1:5000`
/// - `TEXTMAP_CLIENT__TIMEOUT_SECS=10`
/// - `TEXTMAP_LOG__LEVEL=debug`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("client.base_url", "http://127.0.0.1:5000")?
        .set_default("client.timeout_secs", 30)?
        .set_default("client.baidu_enabled", false)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级），例如 TEXTMAP_CLIENT__BASE_URL
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.client.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Client base URL cannot be empty".to_string(),
        ));
    }

    if config.client.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Client timeout cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::debug!("=== Client Configuration ===");
    tracing::debug!("Base URL: {}", config.client.base_url);
    tracing::debug!("Timeout: {}s", config.client.timeout_secs);
    tracing::debug!("Baidu Lookup: {}", config.client.baidu_enabled);
    match &config.bundle.manifest {
        Some(path) => tracing::debug!("Bundle Manifest: {}", path.display()),
        None => tracing::debug!("Bundle Manifest: built-in"),
    }
    tracing::debug!("Log Level: {}", config.log.level);
    tracing::debug!("============================");
}
