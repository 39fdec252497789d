//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::time::Duration;

use crate::application::ports::{ResponseCapture, StatusPolicy};
use crate::application::DEFAULT_START_DELAY;
use crate::domain::device::{AddressError, DeviceAddress, DEFAULT_COMMAND_PORT};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 目标设备配置
    #[serde(default)]
    pub device: DeviceConfig,

    /// 上传配置
    #[serde(default)]
    pub upload: UploadConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址（host:port）
    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_listen() -> String {
    "0.0.0.0:10080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerConfig {
    /// 拆分为 (host, port)
    pub fn host_port(&self) -> Option<(&str, u16)> {
        let (host, port) = self.listen.rsplit_once(':')?;
        let port = port.parse().ok()?;
        Some((host, port))
    }
}

/// 目标设备（MKS 控制器）配置
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceConfig {
    /// 设备主机（host 或 host:port），由命令行参数提供
    #[serde(default)]
    pub host: String,

    /// 命令通道 TCP 端口
    #[serde(default = "default_command_port")]
    pub command_port: u16,

    /// 上传请求超时时间（秒）
    #[serde(default = "default_upload_timeout")]
    pub upload_timeout_secs: u64,

    /// 上传完成后开始打印前的等待时间（毫秒）
    #[serde(default = "default_start_delay")]
    pub start_delay_ms: u64,

    /// 上传响应状态码策略
    #[serde(default)]
    pub status_policy: StatusPolicy,

    /// 命令响应读取方式
    #[serde(default)]
    pub response_capture: ResponseCapture,

    /// until_idle 模式下的空闲超时（毫秒）
    #[serde(default = "default_response_idle")]
    pub response_idle_ms: u64,

    /// until_idle 模式下最多读取的字节数
    #[serde(default = "default_response_max_bytes")]
    pub response_max_bytes: usize,
}

fn default_command_port() -> u16 {
    DEFAULT_COMMAND_PORT
}

fn default_upload_timeout() -> u64 {
    300
}

fn default_start_delay() -> u64 {
    DEFAULT_START_DELAY.as_millis() as u64
}

fn default_response_idle() -> u64 {
    500
}

fn default_response_max_bytes() -> usize {
    4096
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            command_port: default_command_port(),
            upload_timeout_secs: default_upload_timeout(),
            start_delay_ms: default_start_delay(),
            status_policy: StatusPolicy::default(),
            response_capture: ResponseCapture::default(),
            response_idle_ms: default_response_idle(),
            response_max_bytes: default_response_max_bytes(),
        }
    }
}

impl DeviceConfig {
    /// 解析设备地址（命令端口取自配置）
    pub fn address(&self) -> Result<DeviceAddress, AddressError> {
        Ok(self
            .host
            .parse::<DeviceAddress>()?
            .with_command_port(self.command_port))
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }

    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }

    pub fn response_idle(&self) -> Duration {
        Duration::from_millis(self.response_idle_ms)
    }
}

/// 上传配置
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// 单个 gcode 文件最大大小（字节），默认 32MB
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// 超过该大小的内容写入临时文件（字节），默认 4MB
    #[serde(default = "default_spool_threshold")]
    pub spool_threshold: u64,
}

fn default_max_file_size() -> u64 {
    32 * 1024 * 1024 // 32 MB
}

fn default_spool_threshold() -> u64 {
    4 * 1024 * 1024 // 4 MB
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            spool_threshold: default_spool_threshold(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
