//! Rousui - 漏水音判定服务
//!
//! 架构设计: DDD + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Analysis Context: 表单校验、请求参数、模型别名、提示词、判定结果
//!
//! 应用层 (application/):
//! - Ports: GenerativeModel 端口
//! - Commands: AnalyzeAudio 命令处理器（校验 → 编码 → 请求 → 解析 → 渲染）
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: 表单页面 + JSON API
//! - Adapters: Gemini HTTP 客户端、Fake 客户端

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
