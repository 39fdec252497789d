//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod relay_handlers;

pub use relay_handlers::*;
