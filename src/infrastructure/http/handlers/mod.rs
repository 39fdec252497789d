//! HTTP Handlers

mod files;
mod version;

pub use files::*;
pub use version::*;
