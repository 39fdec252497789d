//! Relay Command Handlers
//!
//! 上传 → (可选) 等待设备落盘 → 下发 M23/M24

use std::sync::Arc;
use std::time::Duration;

use crate::application::commands::{RelayUpload, RelayUploadResponse};
use crate::application::ports::{DeviceUploadPort, JobControlPort};
use crate::domain::upload::{
    DeviceUploadReceipt, GcodeUpload, JobStartResult, RelayError, RelayJob, RelayStage,
};

/// 上传完成后、下发打印命令前的等待时间
pub const DEFAULT_START_DELAY: Duration = Duration::from_secs(3);

/// RelayUpload Handler
///
/// 同一请求内设备上传一定先于命令通道完成；跨请求不做互斥
pub struct RelayUploadHandler {
    uploader: Arc<dyn DeviceUploadPort>,
    job_control: Arc<dyn JobControlPort>,
    start_delay: Duration,
}

impl RelayUploadHandler {
    pub fn new(
        uploader: Arc<dyn DeviceUploadPort>,
        job_control: Arc<dyn JobControlPort>,
        start_delay: Duration,
    ) -> Self {
        Self {
            uploader,
            job_control,
            start_delay,
        }
    }

    pub async fn handle(&self, command: RelayUpload) -> Result<RelayUploadResponse, RelayError> {
        let RelayUpload {
            mut job,
            file,
            start_printing,
        } = command;
        let filename = file.filename.clone();

        match self.relay(&mut job, file, start_printing).await {
            Ok((receipt, job_start)) => Ok(RelayUploadResponse {
                request_id: job.id(),
                filename,
                receipt,
                job_start,
                stage: job.stage(),
            }),
            Err(e) => {
                job.fail(&e);
                tracing::error!(
                    request_id = %job.id(),
                    filename = %filename,
                    stage = %job.stage(),
                    error = %e,
                    "Relay failed"
                );
                Err(e)
            }
        }
    }

    async fn relay(
        &self,
        job: &mut RelayJob,
        file: GcodeUpload,
        start_printing: bool,
    ) -> Result<(DeviceUploadReceipt, Option<JobStartResult>), RelayError> {
        let filename = file.filename.clone();

        let receipt = self.uploader.upload(file).await?;
        job.advance(RelayStage::UploadedToDevice)?;

        if !start_printing {
            job.advance(RelayStage::Completed)?;
            return Ok((receipt, None));
        }

        // 设备上传响应中没有“已落盘”信号，只能固定等待
        job.advance(RelayStage::AwaitingDeviceReady)?;
        tokio::time::sleep(self.start_delay).await;

        let result = match self.job_control.start_job(&filename).await {
            Ok(result) => result,
            // 响应不可读时两条命令已经写出
            Err(e @ RelayError::ResponseUnreadable(_)) => {
                job.advance(RelayStage::CommandsSent)?;
                return Err(e);
            }
            Err(e) => return Err(e),
        };
        job.advance(RelayStage::CommandsSent)?;

        tracing::info!(
            request_id = %job.id(),
            filename = %filename,
            response = %result.response,
            "Response from device"
        );

        job.advance(RelayStage::Completed)?;
        Ok((receipt, Some(result)))
    }
}
