//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 命令行参数（设备主机）
//! 2. `LISTEN` 环境变量（监听地址）
//! 3. 环境变量（前缀 `MKSPROXY_`）
//! 4. 配置文件（config.toml）
//! 5. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::PathBuf;
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
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 监听地址环境变量
const LISTEN_ENV: &str = "LISTEN";

/// 命令行覆盖项
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// 设备主机（必填的位置参数）
    pub device_host: Option<String>,
    /// 指定配置文件，None 时使用默认搜索路径
    pub config_path: Option<PathBuf>,
}

/// 加载应用配置
///
/// # 环境变量示例
/// - `LISTEN=127.0.0.1:10080`
/// - `MKSPROXY_DEVICE__COMMAND_PORT=8080`
/// - `MKSPROXY_DEVICE__STATUS_POLICY=strict`
/// - `MKSPROXY_UPLOAD__MAX_FILE_SIZE=67108864`
pub fn load_config(overrides: &ConfigOverrides) -> Result<AppConfig, ConfigError> {
    build_config(overrides, std::env::var(LISTEN_ENV).ok())
}

fn build_config(
    overrides: &ConfigOverrides,
    listen: Option<String>,
) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.listen", "0.0.0.0:10080")?
        .set_default("device.host", "")?
        .set_default("device.command_port", 8080)?
        .set_default("device.upload_timeout_secs", 300)?
        .set_default("device.start_delay_ms", 3000)?
        .set_default("device.status_policy", "lenient")?
        .set_default("device.response_capture", "single_read")?
        .set_default("device.response_idle_ms", 500)?
        .set_default("device.response_max_bytes", 4096)?
        .set_default("upload.max_file_size", 32 * 1024 * 1024)?
        .set_default("upload.spool_threshold", 4 * 1024 * 1024)?
        .set_default("log.level", "info")?;

    // 2. 配置文件（如果存在）
    if let Some(path) = &overrides.config_path {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量
    // 例如: MKSPROXY_DEVICE__START_DELAY_MS=5000
    builder = builder.add_source(
        Environment::with_prefix("MKSPROXY")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. LISTEN 与命令行参数（最高优先级）
    builder = builder
        .set_override_option("server.listen", listen.filter(|l| !l.is_empty()))?
        .set_override_option("device.host", overrides.device_host.clone())?;

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.host_port().is_none() {
        return Err(ConfigError::ValidationError(format!(
            "Invalid listen address: {}",
            config.server.listen
        )));
    }

    config
        .device
        .address()
        .map_err(|e| ConfigError::ValidationError(format!("Invalid device host: {}", e)))?;

    if config.device.command_port == 0 {
        return Err(ConfigError::ValidationError(
            "Device command port cannot be 0".to_string(),
        ));
    }

    if config.device.upload_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Upload timeout cannot be 0".to_string(),
        ));
    }

    if config.device.response_max_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "Response max bytes cannot be 0".to_string(),
        ));
    }

    if config.upload.max_file_size == 0 {
        return Err(ConfigError::ValidationError(
            "Max file size cannot be 0".to_string(),
        ));
    }

    if config.upload.spool_threshold > config.upload.max_file_size {
        return Err(ConfigError::ValidationError(
            "Spool threshold cannot exceed max file size".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Listen: {}", config.server.listen);
    tracing::info!("Device: {}", config.device.host);
    tracing::info!("Device Command Port: {}", config.device.command_port);
    tracing::info!("Upload Timeout: {}s", config.device.upload_timeout_secs);
    tracing::info!("Start Delay: {}ms", config.device.start_delay_ms);
    tracing::info!("Status Policy: {:?}", config.device.status_policy);
    tracing::info!("Response Capture: {:?}", config.device.response_capture);
    tracing::info!("Max File Size: {} bytes", config.upload.max_file_size);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
