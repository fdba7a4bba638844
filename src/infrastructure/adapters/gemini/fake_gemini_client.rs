//! Fake Gemini Client - 用于测试和离线运行
//!
//! 不访问网络，始终返回配置的固定回答

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::application::ports::{GenerateRequest, GenerativeModelPort, RemoteError};
use crate::domain::analysis::{ModelAliasTable, ModelId};

/// 默认返回的结构化回答
pub const DEFAULT_FAKE_REPLY: &str =
    r#"{"likelihood":"低","rationale":"テスト用の固定回答です。","followups":[]}"#;

/// 固定回答
#[derive(Debug, Clone)]
pub enum FakeReply {
    /// 成功，返回文本
    Text(String),
    /// 返回 HTTP 错误状态
    Status { status: u16, body: String },
    /// 2xx 但无文本
    Empty,
}

impl Default for FakeReply {
    fn default() -> Self {
        Self::Text(DEFAULT_FAKE_REPLY.to_string())
    }
}

/// Fake Gemini Client
pub struct FakeGeminiClient {
    reply: FakeReply,
    aliases: ModelAliasTable,
    calls: AtomicUsize,
}

impl FakeGeminiClient {
    pub fn new(reply: FakeReply) -> Self {
        tracing::info!(reply = ?reply, "FakeGeminiClient initialized");
        Self {
            reply,
            aliases: ModelAliasTable::builtin(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(FakeReply::default())
    }

    pub fn with_aliases(mut self, aliases: ModelAliasTable) -> Self {
        self.aliases = aliases;
        self
    }

    /// 已处理的请求数
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerativeModelPort for FakeGeminiClient {
    async fn generate(&self, request: GenerateRequest) -> Result<String, RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let model = self.resolve_model(&request.model);

        tracing::debug!(
            model = %model,
            audio_bytes = request.audio.byte_len(),
            "FakeGeminiClient: returning fixed reply"
        );

        match &self.reply {
            FakeReply::Text(text) => Ok(text.clone()),
            FakeReply::Status { status, body } => {
                Err(RemoteError::from_status(*status, &model, body.clone()))
            }
            FakeReply::Empty => Err(RemoteError::EmptyResponse),
        }
    }

    fn resolve_model(&self, model: &ModelId) -> ModelId {
        self.aliases.normalize(model)
    }
}
