//! HTTP Error Handling
//!
//! 调用方只拿到状态码，错误细节写入日志

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::domain::upload::{RelayError, RelayErrorKind};

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    /// 请求解析、提取或上传到设备失败
    BadRequest(String),
    /// 开始打印失败（文件可能已在设备上）
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::BadRequest(msg) => {
                tracing::warn!(error = %msg, "Bad request");
                StatusCode::BAD_REQUEST.into_response()
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

impl From<RelayError> for ApiError {
    fn from(e: RelayError) -> Self {
        match e.kind() {
            RelayErrorKind::DeviceUnreachable
            | RelayErrorKind::ResponseUnreadable
            | RelayErrorKind::InvalidTransition => ApiError::Internal(e.to_string()),
            RelayErrorKind::MultipartParseFailed
            | RelayErrorKind::MissingFile
            | RelayErrorKind::AmbiguousFileCount
            | RelayErrorKind::UploadFailed => ApiError::BadRequest(e.to_string()),
        }
    }
}
