//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod mks;
pub mod storage;

pub use mks::*;
pub use storage::*;
