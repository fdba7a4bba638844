//! 应用层错误定义
//!
//! 一次解析可能的致命错误。结构化解析失败不在此列（退回纯文本）。

use thiserror::Error;

use crate::application::encoder::EncodingError;
use crate::application::ports::RemoteError;
use crate::application::renderer::StatusMessage;
use crate::domain::analysis::ValidationError;

/// 解析错误
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// 输入校验失败，未发起任何请求
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// 文件读取失败
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// 远端错误（含 404 模型不存在、空回答）
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// 已有解析在进行
    #[error("解析中です。完了するまでお待ちください。")]
    AlreadyInFlight,
}

impl AnalysisError {
    /// 错误类别（日志字段）
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Encoding(_) => "encoding",
            Self::Remote(RemoteError::ModelNotFound { .. }) => "model_not_found",
            Self::Remote(RemoteError::EmptyResponse) => "empty_response",
            Self::Remote(_) => "remote",
            Self::AlreadyInFlight => "already_in_flight",
        }
    }

    /// 展示给用户的错误状态
    pub fn status(&self) -> StatusMessage {
        StatusMessage::error(self.to_string())
    }
}
