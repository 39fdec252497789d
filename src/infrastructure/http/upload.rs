//! OctoPrint Upload Extractor
//!
//! 从 OctoPrint 风格的 multipart 请求中提取唯一的 gcode 文件和 `print` 标志
//!
//! 字段:
//! - `file`  文件部分（带 filename），必须恰好一个
//! - `print` 值部分（不带 filename），可选

use axum::extract::multipart::Field;
use axum::extract::Multipart;

use crate::config::UploadConfig;
use crate::domain::upload::{print_requested, GcodeUpload, RelayError};
use crate::infrastructure::adapters::storage::ContentSpool;

pub const FILE_FIELD: &str = "file";
pub const PRINT_FIELD: &str = "print";

/// 提取结果
#[derive(Debug)]
pub struct OctoprintUpload {
    pub file: GcodeUpload,
    pub start_printing: bool,
}

fn parse_error(e: impl std::fmt::Display) -> RelayError {
    RelayError::MultipartParseFailed(e.to_string())
}

/// 解析 OctoPrint 上传请求
///
/// 多余的文件部分只计数不缓冲；`print` 多个值时视为 false
pub async fn parse_octoprint_upload(
    mut multipart: Multipart,
    limits: &UploadConfig,
) -> Result<OctoprintUpload, RelayError> {
    let mut print_values: Vec<String> = Vec::new();
    let mut file: Option<GcodeUpload> = None;
    let mut file_count = 0usize;

    while let Some(field) = multipart.next_field().await.map_err(parse_error)? {
        let name = field.name().unwrap_or_default().to_string();
        // 空文件名的部分按普通值处理
        let filename = field
            .file_name()
            .filter(|f| !f.is_empty())
            .map(str::to_string);

        match (name.as_str(), filename) {
            (FILE_FIELD, Some(filename)) => {
                file_count += 1;
                if file.is_none() {
                    file = Some(spool_file(field, filename, limits).await?);
                }
            }
            (PRINT_FIELD, None) => {
                print_values.push(field.text().await.map_err(parse_error)?);
            }
            _ => {}
        }
    }

    let file = match (file_count, file) {
        (1, Some(file)) => file,
        (0, _) | (_, None) => return Err(RelayError::MissingFile),
        (n, _) => return Err(RelayError::AmbiguousFileCount(n)),
    };
    let start_printing = print_requested(&print_values);

    tracing::info!(
        filename = %file.filename,
        size = file.size,
        start_printing,
        "Received gcode file"
    );

    Ok(OctoprintUpload {
        file,
        start_printing,
    })
}

async fn spool_file(
    mut field: Field<'_>,
    filename: String,
    limits: &UploadConfig,
) -> Result<GcodeUpload, RelayError> {
    let mut spool = ContentSpool::new(limits.spool_threshold);

    while let Some(chunk) = field.chunk().await.map_err(parse_error)? {
        if spool.size() + chunk.len() as u64 > limits.max_file_size {
            return Err(RelayError::MultipartParseFailed(format!(
                "file exceeds {} bytes",
                limits.max_file_size
            )));
        }
        spool
            .write(&chunk)
            .await
            .map_err(|e| RelayError::MultipartParseFailed(format!("failed to buffer file: {}", e)))?;
    }

    let size = spool.size();
    let content = spool
        .finish()
        .await
        .map_err(|e| RelayError::MultipartParseFailed(format!("failed to buffer file: {}", e)))?;

    Ok(GcodeUpload::new(filename, size, content))
}
