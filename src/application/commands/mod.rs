//! 应用层 - 命令
//!
//! 判定请求是唯一的写操作（无持久化）

mod analyze_commands;

pub mod handlers;

pub use analyze_commands::*;
