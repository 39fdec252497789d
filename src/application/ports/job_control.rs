//! Job Control Port - 设备打印任务控制抽象

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::upload::{JobStartResult, RelayError};

/// 设备响应读取方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseCapture {
    /// 只读一次（最多 1024 字节），多包响应只保留第一包
    #[default]
    SingleRead,
    /// 持续读取直到空闲超时、达到上限或对端关闭
    UntilIdle,
}

/// Job Control Port
///
/// 通过设备命令通道选择文件并开始打印
#[async_trait]
pub trait JobControlPort: Send + Sync {
    /// 选择文件并开始打印
    ///
    /// 连接或写入失败返回 `DeviceUnreachable`；两条命令写出后读取响应失败返回
    /// `ResponseUnreadable`
    async fn start_job(&self, filename: &str) -> Result<JobStartResult, RelayError>;
}
