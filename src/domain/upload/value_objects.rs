//! Upload Context - Value Objects

/// 设备上传响应（仅用于诊断日志）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceUploadReceipt {
    pub status: u16,
    pub body: String,
}

impl DeviceUploadReceipt {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 开始打印命令的设备原始响应
///
/// 可能只是部分响应，不做格式校验
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStartResult {
    pub response: String,
}

impl JobStartResult {
    pub fn from_bytes(raw: &[u8]) -> Self {
        Self {
            response: String::from_utf8_lossy(raw).into_owned(),
        }
    }
}
