//! Device Upload Port - 设备文件上传抽象
//!
//! 将 gcode 文件按设备自己的上传约定转发，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::upload::{DeviceUploadReceipt, GcodeUpload, RelayError};

/// 上传状态码策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPolicy {
    /// 只要响应体可读即视为成功，不检查状态码
    #[default]
    Lenient,
    /// 非 2xx 状态码视为上传失败
    Strict,
}

impl StatusPolicy {
    pub fn accepts(&self, receipt: &DeviceUploadReceipt) -> bool {
        match self {
            Self::Lenient => true,
            Self::Strict => receipt.is_success(),
        }
    }
}

/// Device Upload Port
#[async_trait]
pub trait DeviceUploadPort: Send + Sync {
    /// 上传文件到设备
    ///
    /// 同步完成整个请求；网络错误、超时或响应体不可读返回 `RelayError::UploadFailed`
    async fn upload(&self, file: GcodeUpload) -> Result<DeviceUploadReceipt, RelayError>;
}
