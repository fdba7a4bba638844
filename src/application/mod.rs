//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（GenerativeModel）
//! - commands: 判定命令及处理器
//! - encoder / interpreter / renderer: 流水线中的各步骤
//! - trigger: 提交按钮状态
//! - error: 应用层错误定义

pub mod commands;
pub mod encoder;
pub mod error;
pub mod interpreter;
pub mod ports;
pub mod renderer;
pub mod trigger;

// Re-exports
pub use commands::{
    handlers::{AnalysisSettings, AnalyzeAudioHandler},
    AnalyzeAudio, AnalyzeAudioResponse,
};

pub use encoder::{encode_audio, EncodedAudio, EncodingError};
pub use error::AnalysisError;
pub use interpreter::interpret;

pub use ports::{GenerateRequest, GenerativeModelPort, RemoteError};

pub use renderer::{
    render, RenderedResult, ResultMetadata, Section, SectionBody, StatusMessage,
};
pub use trigger::{SubmissionGuard, SubmissionTrigger};
