//! MKS Command Client - 设备 TCP 命令通道
//!
//! 实现 JobControlPort trait
//!
//! 协议: 纯文本行协议，CRLF 结尾
//! - `M23 <filename>` 选择文件
//! - `M24` 开始打印
//! 两条命令连续写出，不等待中间应答；响应为自由文本

use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::application::ports::{JobControlPort, ResponseCapture};
use crate::domain::device::{DeviceAddress, MksCommand};
use crate::domain::upload::{JobStartResult, RelayError};

/// 单次读取的缓冲大小
pub const SINGLE_READ_BYTES: usize = 1024;

/// MKS 命令客户端配置
#[derive(Debug, Clone)]
pub struct MksCommandClientConfig {
    /// 设备地址（使用其命令端口）
    pub address: DeviceAddress,
    /// 响应读取方式
    pub capture: ResponseCapture,
    /// until_idle 模式下两次读取之间的最长间隔
    pub idle_timeout: Duration,
    /// until_idle 模式下最多保留的字节数
    pub max_response_bytes: usize,
}

impl MksCommandClientConfig {
    pub fn new(address: DeviceAddress) -> Self {
        Self {
            address,
            capture: ResponseCapture::default(),
            idle_timeout: Duration::from_millis(500),
            max_response_bytes: 4096,
        }
    }

    pub fn with_capture(mut self, capture: ResponseCapture) -> Self {
        self.capture = capture;
        self
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub fn with_max_response_bytes(mut self, max: usize) -> Self {
        self.max_response_bytes = max;
        self
    }
}

/// MKS 命令客户端
///
/// 每次调用建立一条新连接，返回前释放
pub struct MksCommandClient {
    config: MksCommandClientConfig,
}

impl MksCommandClient {
    pub fn new(config: MksCommandClientConfig) -> Self {
        Self { config }
    }

    async fn read_response(&self, stream: &mut TcpStream) -> Result<Vec<u8>, RelayError> {
        // 第一次读取不设超时
        let mut buf = [0u8; SINGLE_READ_BYTES];
        let n = stream
            .read(&mut buf)
            .await
            .map_err(|e| RelayError::ResponseUnreadable(e.to_string()))?;
        if n == 0 {
            return Err(RelayError::ResponseUnreadable(
                "connection closed before response".to_string(),
            ));
        }

        let mut response = buf[..n].to_vec();
        if self.config.capture == ResponseCapture::SingleRead {
            return Ok(response);
        }

        let max = self.config.max_response_bytes;
        response.truncate(max);
        while response.len() < max {
            match tokio::time::timeout(self.config.idle_timeout, stream.read(&mut buf)).await {
                Err(_) | Ok(Ok(0)) => break,
                Ok(Ok(n)) => {
                    let take = n.min(max - response.len());
                    response.extend_from_slice(&buf[..take]);
                }
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "Device response read interrupted");
                    break;
                }
            }
        }

        Ok(response)
    }
}

#[async_trait]
impl JobControlPort for MksCommandClient {
    async fn start_job(&self, filename: &str) -> Result<JobStartResult, RelayError> {
        let endpoint = self.config.address.command_endpoint();

        let mut stream = TcpStream::connect(&endpoint)
            .await
            .map_err(|e| RelayError::DeviceUnreachable(format!("{}: {}", endpoint, e)))?;

        for command in [MksCommand::SelectFile(filename.to_string()), MksCommand::StartPrint] {
            stream
                .write_all(command.to_line().as_bytes())
                .await
                .map_err(|e| {
                    RelayError::DeviceUnreachable(format!("{}: write failed: {}", endpoint, e))
                })?;
        }

        tracing::debug!(endpoint = %endpoint, filename = %filename, "Start commands sent");

        let raw = self.read_response(&mut stream).await?;
        Ok(JobStartResult::from_bytes(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::upload::RelayErrorKind;
    use crate::infrastructure::adapters::mks::mock_device::{
        closed_port, MockDevice, MockDeviceBehavior,
    };

    fn client(device: &MockDevice, capture: ResponseCapture) -> MksCommandClient {
        MksCommandClient::new(
            MksCommandClientConfig::new(device.address())
                .with_capture(capture)
                .with_idle_timeout(Duration::from_millis(500)),
        )
    }

    #[tokio::test]
    async fn test_writes_both_commands_before_reading() {
        let device = MockDevice::start(MockDeviceBehavior::default()).await;

        let result = client(&device, ResponseCapture::SingleRead)
            .start_job("a.gco")
            .await
            .unwrap();

        assert_eq!(result.response, "ok\r\n");
        assert_eq!(device.commands(), vec![b"M23 a.gco\r\nM24\r\n".to_vec()]);
    }

    #[tokio::test]
    async fn test_single_read_keeps_first_chunk_only() {
        let behavior = MockDeviceBehavior {
            command_reply: Some(b"ok\r\n".to_vec()),
            late_reply: Some((Duration::from_millis(100), b"Begin file list\r\n".to_vec())),
            ..Default::default()
        };
        let device = MockDevice::start(behavior).await;

        let result = client(&device, ResponseCapture::SingleRead)
            .start_job("a.gco")
            .await
            .unwrap();
        assert_eq!(result.response, "ok\r\n");
    }

    #[tokio::test]
    async fn test_until_idle_accumulates_chunks() {
        let behavior = MockDeviceBehavior {
            command_reply: Some(b"ok\r\n".to_vec()),
            late_reply: Some((Duration::from_millis(100), b"ok\r\n".to_vec())),
            ..Default::default()
        };
        let device = MockDevice::start(behavior).await;

        let result = client(&device, ResponseCapture::UntilIdle)
            .start_job("a.gco")
            .await
            .unwrap();
        assert_eq!(result.response, "ok\r\nok\r\n");
    }

    #[tokio::test]
    async fn test_until_idle_respects_max_bytes() {
        let behavior = MockDeviceBehavior {
            command_reply: Some(b"0123456789".to_vec()),
            ..Default::default()
        };
        let device = MockDevice::start(behavior).await;

        let client = MksCommandClient::new(
            MksCommandClientConfig::new(device.address())
                .with_capture(ResponseCapture::UntilIdle)
                .with_max_response_bytes(4),
        );
        let result = client.start_job("a.gco").await.unwrap();
        assert_eq!(result.response, "0123");
    }

    #[tokio::test]
    async fn test_connect_failure_is_device_unreachable() {
        let address = DeviceAddress::new("127.0.0.1")
            .unwrap()
            .with_command_port(closed_port());
        let client = MksCommandClient::new(MksCommandClientConfig::new(address));

        let err = client.start_job("a.gco").await.unwrap_err();
        assert_eq!(err.kind(), RelayErrorKind::DeviceUnreachable);
    }

    #[tokio::test]
    async fn test_immediate_close_is_response_unreadable() {
        let behavior = MockDeviceBehavior {
            command_reply: None,
            ..Default::default()
        };
        let device = MockDevice::start(behavior).await;

        let err = client(&device, ResponseCapture::SingleRead)
            .start_job("a.gco")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), RelayErrorKind::ResponseUnreadable);
        assert_eq!(device.commands(), vec![b"M23 a.gco\r\nM24\r\n".to_vec()]);
    }
}
