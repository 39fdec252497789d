//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（DeviceUpload、JobControl）
//! - commands: 上传转发命令及处理器

pub mod commands;
pub mod ports;

// Re-exports
pub use commands::{
    handlers::{RelayUploadHandler, DEFAULT_START_DELAY},
    RelayUpload, RelayUploadResponse,
};

pub use ports::{DeviceUploadPort, JobControlPort, ResponseCapture, StatusPolicy};
