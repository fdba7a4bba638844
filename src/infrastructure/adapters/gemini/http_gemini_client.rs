//! HTTP Gemini Client - 调用 Gemini generateContent
//!
//! 实现 GenerativeModelPort trait
//!
//! 外部 API:
//! POST {base_url}/models/{model}:generateContent?key={api_key}
//! Request: JSON（提示词 + 内联音频 + generationConfig）
//! Response: JSON，取 candidates[0].content.parts[0].text

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::envelope::{GenerateContentRequest, GenerateContentResponse};
use crate::application::ports::{GenerateRequest, GenerativeModelPort, RemoteError};
use crate::domain::analysis::{ModelAliasTable, ModelId};

/// 默认 API 基础 URL
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini 客户端配置
#[derive(Debug, Clone)]
pub struct GeminiClientConfig {
    /// API 基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 模型别名表
    pub aliases: ModelAliasTable,
}

impl Default for GeminiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout_secs: 120,
            aliases: ModelAliasTable::builtin(),
        }
    }
}

impl GeminiClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_aliases(mut self, aliases: ModelAliasTable) -> Self {
        self.aliases = aliases;
        self
    }
}

/// Gemini HTTP 客户端
pub struct GeminiClient {
    client: Client,
    config: GeminiClientConfig,
}

impl GeminiClient {
    /// 创建新的 Gemini 客户端
    pub fn new(config: GeminiClientConfig) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 生成 URL（不含 key，可安全写日志）
    fn generate_url(&self, model: &ModelId) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }
}

#[async_trait]
impl GenerativeModelPort for GeminiClient {
    async fn generate(&self, request: GenerateRequest) -> Result<String, RemoteError> {
        let model = self.resolve_model(&request.model);
        let url = self.generate_url(&model);
        let body = GenerateContentRequest::new(
            &request.prompt,
            &request.mime_type,
            request.audio.as_str(),
            request.temperature.value(),
        );

        tracing::debug!(
            url = %url,
            model = %model,
            mime_type = %request.mime_type,
            audio_bytes = request.audio.byte_len(),
            "Sending Gemini generateContent request"
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", request.api_key.expose())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                // reqwest 的错误信息会带上完整 URL（含 key）
                let e = e.without_url();
                if e.is_timeout() {
                    RemoteError::Timeout
                } else if e.is_connect() {
                    RemoteError::Network(format!("Cannot connect to Gemini API: {}", e))
                } else {
                    RemoteError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(RemoteError::from_status(status.as_u16(), &model, error_text));
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::InvalidResponse(e.without_url().to_string()))?;

        let text = payload.into_first_text()?;

        tracing::info!(
            model = %model,
            text_len = text.len(),
            "Gemini response received"
        );

        Ok(text)
    }

    fn resolve_model(&self, model: &ModelId) -> ModelId {
        self.config.aliases.normalize(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::encoder::encode_audio;
    use crate::domain::analysis::{ApiKey, AudioAsset, Temperature};
    use axum::{
        extract::{Query, State},
        http::{StatusCode, Uri},
        response::IntoResponse,
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Default)]
    struct Captured {
        path: String,
        query: HashMap<String, String>,
        body: Value,
    }

    #[derive(Clone)]
    struct MockState {
        status: StatusCode,
        reply: Value,
        captured: Arc<Mutex<Option<Captured>>>,
    }

    async fn mock_generate(
        State(state): State<MockState>,
        uri: Uri,
        Query(query): Query<HashMap<String, String>>,
        Json(body): Json<Value>,
    ) -> impl IntoResponse {
        *state.captured.lock().unwrap() = Some(Captured {
            path: uri.path().to_string(),
            query,
            body,
        });
        (state.status, Json(state.reply.clone()))
    }

    /// 在本地端口启动模拟的 Gemini 服务
    async fn spawn_mock(
        status: StatusCode,
        reply: Value,
    ) -> (String, Arc<Mutex<Option<Captured>>>) {
        let captured = Arc::new(Mutex::new(None));
        let state = MockState {
            status,
            reply,
            captured: captured.clone(),
        };
        let app = Router::new().fallback(mock_generate).with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}/v1beta", addr), captured)
    }

    async fn request(model: &str) -> GenerateRequest {
        let asset = AudioAsset::from_bytes("pipe.wav", Some("audio/wav"), b"RIFF".to_vec());
        GenerateRequest {
            api_key: ApiKey::new("test-key").unwrap(),
            audio: encode_audio(&asset).await.unwrap(),
            mime_type: asset.mime_type().to_string(),
            model: ModelId::new(model).unwrap(),
            temperature: Temperature::new(0.25).unwrap(),
            prompt: "判定してください".to_string(),
        }
    }

    fn client(base_url: String) -> GeminiClient {
        GeminiClient::new(GeminiClientConfig::new(base_url).with_timeout(5)).unwrap()
    }

    #[tokio::test]
    async fn test_generate_success() {
        let (base_url, captured) = spawn_mock(
            StatusCode::OK,
            json!({"candidates": [{"content": {"parts": [{"text": "plain text answer"}]}}]}),
        )
        .await;

        let text = client(base_url)
            .generate(request("gemini-1.5-pro").await)
            .await
            .unwrap();
        assert_eq!(text, "plain text answer");

        let captured = captured.lock().unwrap().take().unwrap();
        assert_eq!(
            captured.path,
            "/v1beta/models/gemini-1.5-pro-latest:generateContent"
        );
        assert_eq!(captured.query.get("key").map(String::as_str), Some("test-key"));
        assert_eq!(captured.body["generationConfig"]["temperature"], json!(0.25));
        assert_eq!(captured.body["contents"][0]["role"], "user");
        assert_eq!(
            captured.body["contents"][0]["parts"][0]["text"],
            "判定してください"
        );
        assert_eq!(
            captured.body["contents"][0]["parts"][1]["inline_data"],
            json!({"mime_type": "audio/wav", "data": "UklGRg=="})
        );
    }

    #[tokio::test]
    async fn test_404_is_model_not_found() {
        let (base_url, _) =
            spawn_mock(StatusCode::NOT_FOUND, json!({"error": {"code": 404}})).await;
        let err = client(base_url)
            .generate(request("gemini-nope").await)
            .await
            .unwrap_err();

        match &err {
            RemoteError::ModelNotFound { model, .. } => assert_eq!(model, "gemini-nope"),
            other => panic!("expected ModelNotFound, got {:?}", other),
        }
        assert!(err.to_string().contains("モデル名が正しいか確認してください"));
    }

    #[tokio::test]
    async fn test_500_is_status_error() {
        let (base_url, _) = spawn_mock(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": "internal"}),
        )
        .await;
        let err = client(base_url)
            .generate(request("gemini-1.5-pro").await)
            .await
            .unwrap_err();

        assert!(matches!(err, RemoteError::Status { status: 500, .. }));
        assert!(err.to_string().starts_with("Gemini API error: 500"));
        assert!(!err.to_string().contains("モデル名"));
    }

    #[tokio::test]
    async fn test_missing_text_is_empty_response() {
        let (base_url, _) = spawn_mock(StatusCode::OK, json!({"candidates": []})).await;
        let err = client(base_url)
            .generate(request("gemini-1.5-pro").await)
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(format!("http://{}", addr))
            .generate(request("gemini-1.5-pro").await)
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::Network(_)));
        assert!(!err.to_string().contains("test-key"));
    }

    #[test]
    fn test_config_builder() {
        let config = GeminiClientConfig::new("http://example.com/v1").with_timeout(30);
        assert_eq!(config.base_url, "http://example.com/v1");
        assert_eq!(config.timeout_secs, 30);
        assert!(!config.aliases.is_empty());
    }

    #[test]
    fn test_generate_url_trims_slash() {
        let client = client("http://example.com/v1beta/".to_string());
        let model = ModelId::new("gemini-2.0-flash").unwrap();
        assert_eq!(
            client.generate_url(&model),
            "http://example.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }
}
