//! MKS HTTP Uploader - 调用设备的 HTTP 上传接口
//!
//! 实现 DeviceUploadPort trait
//!
//! 设备上传 API:
//! POST http://<host>/upload?X-Filename=<filename>
//! Body: multipart，文件字段名 `uploadfile`
//! Content-Type: application/octet-stream（固件按此约定解析，不带 boundary）

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use std::time::Duration;
use tokio_util::io::ReaderStream;

use crate::application::ports::{DeviceUploadPort, StatusPolicy};
use crate::domain::device::DeviceAddress;
use crate::domain::upload::{DeviceUploadReceipt, GcodeContent, GcodeUpload, RelayError};

/// 设备期望的文件字段名
pub const UPLOAD_FIELD_NAME: &str = "uploadfile";

const OCTET_STREAM: &str = "application/octet-stream";

/// MKS 上传客户端配置
#[derive(Debug, Clone)]
pub struct MksHttpUploaderConfig {
    /// 设备地址
    pub address: DeviceAddress,
    /// 请求超时时间
    pub timeout: Duration,
    /// 状态码策略
    pub status_policy: StatusPolicy,
}

impl MksHttpUploaderConfig {
    pub fn new(address: DeviceAddress) -> Self {
        Self {
            address,
            timeout: Duration::from_secs(300),
            status_policy: StatusPolicy::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.status_policy = policy;
        self
    }
}

/// MKS 上传客户端
pub struct MksHttpUploader {
    client: Client,
    config: MksHttpUploaderConfig,
}

impl MksHttpUploader {
    pub fn new(config: MksHttpUploaderConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, config })
    }
}

/// 文件内容直接流入 multipart，不做任何转换
fn content_body(content: GcodeContent) -> Body {
    match content {
        GcodeContent::Memory(data) => Body::from(data),
        GcodeContent::Spooled(file) => Body::wrap_stream(ReaderStream::new(file)),
    }
}

#[async_trait]
impl DeviceUploadPort for MksHttpUploader {
    async fn upload(&self, file: GcodeUpload) -> Result<DeviceUploadReceipt, RelayError> {
        let url = self.config.address.upload_url(&file.filename);

        let part = Part::stream_with_length(content_body(file.content), file.size)
            .file_name(file.filename.clone())
            .mime_str(OCTET_STREAM)
            .map_err(|e| RelayError::UploadFailed(format!("error building request: {}", e)))?;
        // 文件名原样写入 part 头
        let form = Form::new()
            .percent_encode_noop()
            .part(UPLOAD_FIELD_NAME, part);

        let mut request = self
            .client
            .post(&url)
            .multipart(form)
            .build()
            .map_err(|e| RelayError::UploadFailed(format!("error building request: {}", e)))?;
        request
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(OCTET_STREAM));

        tracing::debug!(
            url = %url,
            filename = %file.filename,
            size = file.size,
            "Sending upload to device"
        );

        let response = self.client.execute(request).await.map_err(|e| {
            if e.is_timeout() {
                RelayError::UploadFailed(format!("device request timed out: {}", e))
            } else if e.is_connect() {
                RelayError::UploadFailed(format!("cannot connect to device: {}", e))
            } else {
                RelayError::UploadFailed(format!("error on device request: {}", e))
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| RelayError::UploadFailed(format!("can't read device response body: {}", e)))?;

        tracing::info!(status, body = %body, "Response from device upload");

        let receipt = DeviceUploadReceipt { status, body };
        if !self.config.status_policy.accepts(&receipt) {
            return Err(RelayError::UploadFailed(format!(
                "device rejected upload with HTTP {}",
                status
            )));
        }

        Ok(receipt)
    }
}
