//! Upload Context - Entities

use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// 上传文件内容
///
/// 单次消费：小文件保存在内存中，超过阈值的内容落盘到匿名临时文件，
/// 读取位置始终在开头
#[derive(Debug)]
pub enum GcodeContent {
    Memory(Vec<u8>),
    Spooled(File),
}

impl GcodeContent {
    /// 读取全部内容（消费自身）
    pub async fn into_bytes(self) -> std::io::Result<Vec<u8>> {
        match self {
            Self::Memory(data) => Ok(data),
            Self::Spooled(mut file) => {
                let mut data = Vec::new();
                file.read_to_end(&mut data).await?;
                Ok(data)
            }
        }
    }

    pub fn is_spooled(&self) -> bool {
        matches!(self, Self::Spooled(_))
    }
}

/// 从 OctoPrint 请求中提取出的 gcode 文件
///
/// 文件名原样取自 multipart 字段，未做路径清洗
#[derive(Debug)]
pub struct GcodeUpload {
    pub filename: String,
    pub size: u64,
    pub content: GcodeContent,
}

impl GcodeUpload {
    pub fn new(filename: impl Into<String>, size: u64, content: GcodeContent) -> Self {
        Self {
            filename: filename.into(),
            size,
            content,
        }
    }

    pub fn from_bytes(filename: impl Into<String>, data: Vec<u8>) -> Self {
        let size = data.len() as u64;
        Self::new(filename, size, GcodeContent::Memory(data))
    }
}

/// `print` 字段是否请求立即打印
///
/// 仅当恰好一个值且严格等于 `"true"` 时成立；多个值不报错，视为 false
pub fn print_requested(values: &[String]) -> bool {
    matches!(values, [value] if value == "true")
}
