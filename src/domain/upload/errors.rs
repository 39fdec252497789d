//! Upload Context - Errors

use thiserror::Error;

use super::RelayStage;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("multipart 解析失败: {0}")]
    MultipartParseFailed(String),

    #[error("请求中缺少 gcode 文件")]
    MissingFile,

    #[error("请求中 gcode 文件数量错误: {0}")]
    AmbiguousFileCount(usize),

    #[error("上传到设备失败: {0}")]
    UploadFailed(String),

    #[error("无法连接设备: {0}")]
    DeviceUnreachable(String),

    #[error("无法读取设备响应: {0}")]
    ResponseUnreadable(String),

    #[error("非法的状态转换: {from} -> {to}")]
    InvalidTransition { from: RelayStage, to: RelayStage },
}

/// 错误分类（不携带上下文，用于状态机终态）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayErrorKind {
    MultipartParseFailed,
    MissingFile,
    AmbiguousFileCount,
    UploadFailed,
    DeviceUnreachable,
    ResponseUnreadable,
    InvalidTransition,
}

impl RelayError {
    pub fn kind(&self) -> RelayErrorKind {
        match self {
            Self::MultipartParseFailed(_) => RelayErrorKind::MultipartParseFailed,
            Self::MissingFile => RelayErrorKind::MissingFile,
            Self::AmbiguousFileCount(_) => RelayErrorKind::AmbiguousFileCount,
            Self::UploadFailed(_) => RelayErrorKind::UploadFailed,
            Self::DeviceUnreachable(_) => RelayErrorKind::DeviceUnreachable,
            Self::ResponseUnreadable(_) => RelayErrorKind::ResponseUnreadable,
            Self::InvalidTransition { .. } => RelayErrorKind::InvalidTransition,
        }
    }
}

impl RelayErrorKind {
    /// 上传已完成、开始打印阶段失败
    pub fn is_print_start_failure(&self) -> bool {
        matches!(self, Self::DeviceUnreachable | Self::ResponseUnreadable)
    }
}
