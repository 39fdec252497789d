//! MKS Adapter - MKS 固件的上传接口与命令通道

mod command_client;
mod http_uploader;

#[cfg(test)]
pub(crate) mod mock_device;

pub use command_client::{MksCommandClient, MksCommandClientConfig, SINGLE_READ_BYTES};
pub use http_uploader::{MksHttpUploader, MksHttpUploaderConfig, UPLOAD_FIELD_NAME};
