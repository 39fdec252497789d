//! Files Handler - OctoPrint 上传接口

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use std::sync::Arc;

use crate::application::RelayUpload;
use crate::config::UploadConfig;
use crate::domain::upload::{RelayError, RelayJob, RelayStage};
use crate::infrastructure::http::dto::Empty;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;
use crate::infrastructure::http::upload::{parse_octoprint_upload, OctoprintUpload};

async fn extract(
    multipart: Result<Multipart, MultipartRejection>,
    limits: &UploadConfig,
) -> Result<OctoprintUpload, RelayError> {
    let multipart = multipart.map_err(|e| RelayError::MultipartParseFailed(e.body_text()))?;
    parse_octoprint_upload(multipart, limits).await
}

/// POST /api/files/local
///
/// 成功返回 `{}`；提取或上传失败返回 400；开始打印失败返回 500
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Empty>, ApiError> {
    let mut job = RelayJob::new();

    let upload = match extract(multipart, &state.upload_limits).await {
        Ok(upload) => upload,
        Err(e) => {
            job.fail(&e);
            tracing::error!(
                request_id = %job.id(),
                error = %e,
                "Can't parse OctoPrint request"
            );
            return Err(e.into());
        }
    };
    job.advance(RelayStage::Extracted)?;

    let command = RelayUpload {
        job,
        file: upload.file,
        start_printing: upload.start_printing,
    };
    let response = state.relay_handler.handle(command).await?;

    tracing::info!(
        request_id = %response.request_id,
        filename = %response.filename,
        device_status = response.receipt.status,
        print_started = response.job_start.is_some(),
        "Upload relayed"
    );

    Ok(Json(Empty {}))
}
