//! Content Spool - 上传内容的内存/磁盘缓冲
//!
//! 小于阈值的内容留在内存，超过阈值后整体转移到匿名临时文件
//! （进程退出或句柄关闭时由操作系统回收）

use std::io;

use tokio::fs::File;
use tokio::io::{AsyncSeekExt, AsyncWriteExt};

use crate::domain::upload::GcodeContent;

/// 内容缓冲
pub struct ContentSpool {
    /// 内存缓冲上限（字节）
    threshold: u64,
    buffer: Vec<u8>,
    file: Option<File>,
    size: u64,
}

impl ContentSpool {
    pub fn new(threshold: u64) -> Self {
        Self {
            threshold,
            buffer: Vec::new(),
            file: None,
            size: 0,
        }
    }

    /// 已写入的字节数
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn is_spilled(&self) -> bool {
        self.file.is_some()
    }

    pub async fn write(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.size += chunk.len() as u64;

        if let Some(file) = self.file.as_mut() {
            return file.write_all(chunk).await;
        }

        if (self.buffer.len() + chunk.len()) as u64 <= self.threshold {
            self.buffer.extend_from_slice(chunk);
            return Ok(());
        }

        let mut file = create_spool_file().await?;
        file.write_all(&self.buffer).await?;
        file.write_all(chunk).await?;
        self.buffer = Vec::new();
        self.file = Some(file);

        tracing::debug!(size = self.size, "Upload spilled to temporary file");
        Ok(())
    }

    /// 结束写入，返回定位在开头的内容句柄
    pub async fn finish(self) -> io::Result<GcodeContent> {
        match self.file {
            Some(mut file) => {
                file.flush().await?;
                file.rewind().await?;
                Ok(GcodeContent::Spooled(file))
            }
            None => Ok(GcodeContent::Memory(self.buffer)),
        }
    }
}

async fn create_spool_file() -> io::Result<File> {
    let file = tokio::task::spawn_blocking(tempfile::tempfile)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))??;
    Ok(File::from_std(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_small_content_stays_in_memory() {
        let mut spool = ContentSpool::new(16);
        spool.write(b"G28\n").await.unwrap();
        spool.write(b"G1 X1\n").await.unwrap();

        assert!(!spool.is_spilled());
        assert_eq!(spool.size(), 10);

        let content = spool.finish().await.unwrap();
        assert!(!content.is_spooled());
        assert_eq!(content.into_bytes().await.unwrap(), b"G28\nG1 X1\n");
    }

    #[tokio::test]
    async fn test_large_content_spills_to_file() {
        let mut spool = ContentSpool::new(8);
        spool.write(b"0123456").await.unwrap();
        assert!(!spool.is_spilled());

        spool.write(b"789abc").await.unwrap();
        assert!(spool.is_spilled());
        spool.write(b"def").await.unwrap();

        let content = spool.finish().await.unwrap();
        assert!(content.is_spooled());
        assert_eq!(content.into_bytes().await.unwrap(), b"0123456789abcdef");
    }

    #[tokio::test]
    async fn test_empty_content() {
        let spool = ContentSpool::new(0);
        let content = spool.finish().await.unwrap();
        assert_eq!(content.into_bytes().await.unwrap(), Vec::<u8>::new());
    }

    #[tokio::test]
    async fn test_zero_threshold_spills_first_byte() {
        let mut spool = ContentSpool::new(0);
        spool.write(b"x").await.unwrap();
        assert!(spool.is_spilled());
        assert_eq!(spool.finish().await.unwrap().into_bytes().await.unwrap(), b"x");
    }
}
