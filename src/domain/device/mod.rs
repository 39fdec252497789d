//! Device Context - 打印机控制器限界上下文
//!
//! 职责:
//! - 设备地址解析（上传 URL 与命令端口共用同一主机）
//! - MKS 命令行协议的帧格式

mod errors;
mod value_objects;

pub use errors::AddressError;
pub use value_objects::{DeviceAddress, MksCommand, DEFAULT_COMMAND_PORT};
