//! Relay Commands - 上传转发命令

use uuid::Uuid;

use crate::domain::upload::{DeviceUploadReceipt, GcodeUpload, JobStartResult, RelayJob, RelayStage};

/// 转发上传命令
///
/// `job` 须已处于 Extracted 阶段
#[derive(Debug)]
pub struct RelayUpload {
    pub job: RelayJob,
    pub file: GcodeUpload,
    pub start_printing: bool,
}

/// 转发结果
#[derive(Debug, Clone)]
pub struct RelayUploadResponse {
    pub request_id: Uuid,
    pub filename: String,
    pub receipt: DeviceUploadReceipt,
    pub job_start: Option<JobStartResult>,
    pub stage: RelayStage,
}
