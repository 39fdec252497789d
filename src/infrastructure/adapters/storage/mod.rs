//! Storage Adapter - 上传内容缓冲

mod spool;

pub use spool::ContentSpool;
