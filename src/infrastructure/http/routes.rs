//! HTTP Routes
//!
//! OctoPrint API 子集:
//! - /api/version       GET   版本信息
//! - /api/files/local   POST  上传 gcode（可选立即打印）

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/version", get(handlers::version))
        .nest("/files", file_routes())
}

/// Files 路由
fn file_routes() -> Router<Arc<AppState>> {
    Router::new().route("/local", post(handlers::upload_file))
}
