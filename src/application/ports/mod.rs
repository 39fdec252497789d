//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod device_upload;
mod job_control;

pub use device_upload::{DeviceUploadPort, StatusPolicy};
pub use job_control::{JobControlPort, ResponseCapture};
