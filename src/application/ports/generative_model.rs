//! Generative Model Port - 生成式模型抽象
//!
//! 定义远端内容生成接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

use crate::application::encoder::EncodedAudio;
use crate::domain::analysis::{ApiKey, ModelId, Temperature};

/// 远端调用错误
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout")]
    Timeout,

    /// 404：模型标识可能无效
    #[error("Gemini API error: 404 モデル「{model}」が見つかりません。モデル名が正しいか確認してください。 {body}")]
    ModelNotFound { model: String, body: String },

    #[error("Gemini API error: {status} {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// 2xx 但没有可用文本
    #[error("Geminiからの返答が取得できませんでした。")]
    EmptyResponse,
}

impl RemoteError {
    /// 按 HTTP 状态码构造错误
    pub fn from_status(status: u16, model: &ModelId, body: String) -> Self {
        if status == 404 {
            Self::ModelNotFound {
                model: model.to_string(),
                body,
            }
        } else {
            Self::Status { status, body }
        }
    }
}

/// 内容生成请求
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub api_key: ApiKey,
    pub audio: EncodedAudio,
    pub mime_type: String,
    /// 用户选择的模型（未规范化）
    pub model: ModelId,
    pub temperature: Temperature,
    pub prompt: String,
}

/// Generative Model Port
///
/// 一次请求对应一次远端调用，不重试。
#[async_trait]
pub trait GenerativeModelPort: Send + Sync {
    /// 发送提示词与内联音频，返回首个候选的首段文本
    async fn generate(&self, request: GenerateRequest) -> Result<String, RemoteError>;

    /// 请求中实际使用的模型标识
    fn resolve_model(&self, model: &ModelId) -> ModelId {
        model.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_distinct_from_server_error() {
        let model = ModelId::new("gemini-x").unwrap();
        let not_found = RemoteError::from_status(404, &model, "nope".to_string());
        let server = RemoteError::from_status(500, &model, "boom".to_string());

        assert!(matches!(not_found, RemoteError::ModelNotFound { .. }));
        assert!(matches!(server, RemoteError::Status { status: 500, .. }));
        assert!(not_found.to_string().contains("gemini-x"));
        assert!(not_found.to_string().contains("モデル名が正しいか確認してください"));
        assert_eq!(server.to_string(), "Gemini API error: 500 boom");
        assert_ne!(not_found.to_string(), server.to_string());
    }
}
