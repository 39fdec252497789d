//! Device Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("设备地址不能为空")]
    Empty,

    #[error("无效的设备主机: {0}")]
    InvalidHost(String),

    #[error("无效的设备端口: {0}")]
    InvalidPort(String),
}
