//! Application State

use crate::application::RelayUploadHandler;
use crate::config::UploadConfig;

/// 应用状态
///
/// 设备地址已注入到 handler 的各个端口中，启动后只读
pub struct AppState {
    pub relay_handler: RelayUploadHandler,
    pub upload_limits: UploadConfig,
}

impl AppState {
    pub fn new(relay_handler: RelayUploadHandler, upload_limits: UploadConfig) -> Self {
        Self {
            relay_handler,
            upload_limits,
        }
    }
}
