//! Version Handler
//!
//! 静态版本信息，slicer 用它探测 OctoPrint 服务

use axum::Json;

use crate::infrastructure::http::dto::VersionResponse;

/// GET /api/version
pub async fn version() -> Json<VersionResponse> {
    Json(VersionResponse::octoprint())
}
