//! Data Transfer Objects - OctoPrint 兼容响应

use serde::Serialize;

/// 空对象响应 `{}`
#[derive(Debug, Serialize)]
pub struct Empty {}

/// `/api/version` 响应
#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub api: &'static str,
    pub server: &'static str,
    pub text: &'static str,
}

impl VersionResponse {
    /// 客户端据此判断 API 兼容性，按 OctoPrint 1.3.10 回应
    pub const fn octoprint() -> Self {
        Self {
            api: "0.1",
            server: "1.3.10",
            text: "OctoPrint 1.3.10",
        }
    }
}
