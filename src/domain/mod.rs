//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Device Context: 打印机控制器地址与命令协议
//! - Upload Context: 上传转发与开始打印流程

pub mod device;
pub mod upload;
