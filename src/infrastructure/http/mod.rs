//! HTTP Layer - OctoPrint 兼容 API

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod upload;

pub use error::ApiError;
pub use routes::create_routes;
pub use server::{HttpServer, ServerConfig};
pub use state::AppState;
pub use upload::{parse_octoprint_upload, OctoprintUpload};
