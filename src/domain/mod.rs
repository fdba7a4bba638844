//! Domain Layer - 领域层
//!
//! 包含一个限界上下文:
//! - Analysis Context: 漏水音判定

pub mod analysis;
