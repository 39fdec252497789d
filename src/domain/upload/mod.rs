//! Upload Context - 上传转发限界上下文
//!
//! 职责:
//! - 单次上传请求（文件 + 是否立即打印）
//! - 转发流程状态机（上传 → 等待设备 → 下发命令）
//! - 设备响应的诊断记录

mod aggregate;
mod entities;
mod errors;
mod value_objects;

pub use aggregate::{RelayJob, RelayStage};
pub use entities::{print_requested, GcodeContent, GcodeUpload};
pub use errors::{RelayError, RelayErrorKind};
pub use value_objects::{DeviceUploadReceipt, JobStartResult};
