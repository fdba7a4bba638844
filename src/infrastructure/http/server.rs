//! HTTP Server
//!
//! Axum HTTP 服务器启动和配置

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::Router;
use http::header::CONTENT_TYPE;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::middleware::error_logging_middleware;
use super::routes::create_routes;
use super::state::AppState;

/// 表单字段等额外开销
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 请求体上限（字节）
    pub body_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            body_limit: 20 * 1024 * 1024 + FORM_OVERHEAD_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// 按文件大小上限放宽请求体限制
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.body_limit = usize::try_from(max_file_size)
            .unwrap_or(usize::MAX)
            .saturating_add(FORM_OVERHEAD_BYTES);
        self
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 构建 Router
pub fn build_router(state: Arc<AppState>, body_limit: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600));

    create_routes()
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(error_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// HTTP 服务器
pub struct HttpServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    /// 创建新的 HTTP 服务器
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    /// 启动服务器（带优雅关闭）
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = build_router(self.state.clone(), self.config.body_limit);
        let addr = self.config.addr();

        info!("Starting HTTP server on {} (with graceful shutdown)", addr);

        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::renderer::FAILED_TEXT;
    use crate::application::AnalysisSettings;
    use crate::domain::analysis::{
        format_bytes, ModelId, PromptVariant, ValidationLimits, MAX_FILE_SIZE_BYTES,
    };
    use crate::infrastructure::adapters::{FakeGeminiClient, FakeReply};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::util::ServiceExt;

    const BOUNDARY: &str = "rousui-test-boundary";

    fn state(reply: FakeReply) -> Arc<AppState> {
        let settings = AnalysisSettings {
            limits: ValidationLimits::default(),
            default_model: ModelId::new("gemini-1.5-pro").unwrap(),
            prompt_variant: PromptVariant::StrictJson,
        };
        Arc::new(AppState::new(
            Arc::new(FakeGeminiClient::new(reply)),
            settings,
            vec!["gemini-1.5-flash".to_string()],
        ))
    }

    fn router(state: Arc<AppState>) -> Router {
        build_router(state, ServerConfig::default().body_limit)
    }

    fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                    BOUNDARY, name, value
                )
                .as_bytes(),
            );
        }
        if let Some((file_name, data)) = file {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"audio_file\"; filename=\"{}\"\r\nContent-Type: audio/wav\r\n\r\n",
                    BOUNDARY, file_name
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    fn post(uri: &str, body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .header(http::header::CONTENT_LENGTH, body.len())
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        serde_json::from_str(&body_string(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_index_page() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = router(state(FakeReply::default()))
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains(r#"<option value="gemini-1.5-pro" selected>"#));
        assert!(html.contains(r#"<option value="gemini-1.5-flash">"#));
    }

    #[tokio::test]
    async fn test_api_analyze_structured() {
        let state = state(FakeReply::default());
        let body = multipart_body(
            &[("api_key", "key"), ("model", "gemini-1.5-flash"), ("temperature", "0.5")],
            Some(("pipe.wav", b"RIFF")),
        );
        let response = router(state.clone())
            .oneshot(post("/api/analyze", body))
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["errno"], 0);
        assert_eq!(json["data"]["result"]["kind"], "structured");
        assert_eq!(json["data"]["result"]["likelihood"], "low");
        assert_eq!(json["data"]["model"], "gemini-1.5-flash-latest");
        assert_eq!(
            json["data"]["rendered"]["metadata"][2],
            "モデル: gemini-1.5-flash-latest"
        );
        assert_eq!(json["data"]["status"]["is_error"], false);
        assert!(!state.trigger.is_in_flight());
    }

    #[tokio::test]
    async fn test_api_analyze_missing_key() {
        let body = multipart_body(&[], Some(("pipe.wav", b"RIFF")));
        let response = router(state(FakeReply::default()))
            .oneshot(post("/api/analyze", body))
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["errno"], 400);
        assert_eq!(json["error"], "APIキーを入力してください。");
    }

    #[tokio::test]
    async fn test_api_analyze_empty_file_input_is_missing_file() {
        let body = multipart_body(&[("api_key", "key")], Some(("", b"")));
        let response = router(state(FakeReply::default()))
            .oneshot(post("/api/analyze", body))
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["errno"], 400);
        assert_eq!(json["error"], "音声ファイルを選択してください。");
    }

    #[tokio::test]
    async fn test_api_analyze_bad_temperature() {
        let body = multipart_body(
            &[("api_key", "key"), ("temperature", "warm")],
            Some(("pipe.wav", b"RIFF")),
        );
        let response = router(state(FakeReply::default()))
            .oneshot(post("/api/analyze", body))
            .await
            .unwrap();

        assert_eq!(body_json(response).await["errno"], 400);
    }

    #[tokio::test]
    async fn test_page_remote_failure_shows_placeholder() {
        let state = state(FakeReply::Status {
            status: 404,
            body: "not found".to_string(),
        });
        let body = multipart_body(&[("api_key", "key")], Some(("pipe.wav", b"RIFF")));
        let response = router(state.clone())
            .oneshot(post("/analyze", body))
            .await
            .unwrap();

        let html = body_string(response).await;
        assert!(html.contains(r#"class="status error""#));
        assert!(html.contains("モデル名が正しいか確認してください"));
        assert!(html.contains(FAILED_TEXT));
        assert!(!state.trigger.is_in_flight());
    }

    #[tokio::test]
    async fn test_page_validation_failure_has_no_result_card() {
        let body = multipart_body(&[("api_key", "key")], None);
        let response = router(state(FakeReply::default()))
            .oneshot(post("/analyze", body))
            .await
            .unwrap();

        let html = body_string(response).await;
        assert!(html.contains("音声ファイルを選択してください。"));
        assert!(!html.contains(r#"id="resultCard""#));
    }

    #[tokio::test]
    async fn test_page_success_renders_sections() {
        let body = multipart_body(&[("api_key", "key")], Some(("pipe.wav", b"RIFF")));
        let response = router(state(FakeReply::default()))
            .oneshot(post("/analyze", body))
            .await
            .unwrap();

        let html = body_string(response).await;
        assert!(html.contains("判定が完了しました。"));
        assert!(html.contains("<h3>判定</h3><p>漏水音の可能性: 低</p>"));
        assert!(html.contains("<li>ファイル名: pipe.wav</li>"));
        assert!(html.contains("<li>モデル: gemini-1.5-pro-latest</li>"));
    }

    fn oversized_body() -> Vec<u8> {
        let audio = vec![0u8; MAX_FILE_SIZE_BYTES as usize + 2 * 1024 * 1024];
        multipart_body(&[("api_key", "key")], Some(("big.wav", audio.as_slice())))
    }

    #[tokio::test]
    async fn test_api_analyze_body_over_limit_is_file_too_large() {
        let state = state(FakeReply::default());
        let body = oversized_body();
        let expected = format!("ファイルサイズが大きすぎます ({})。", format_bytes(body.len() as u64));

        let response = router(state.clone())
            .oneshot(post("/api/analyze", body))
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["errno"], 400);
        assert_eq!(json["error"], expected.as_str());
        assert!(!state.trigger.is_in_flight());
    }

    #[tokio::test]
    async fn test_page_body_over_limit_is_file_too_large() {
        let body = oversized_body();
        let response = router(state(FakeReply::default()))
            .oneshot(post("/analyze", body))
            .await
            .unwrap();

        let html = body_string(response).await;
        assert!(html.contains(r#"class="status error">ファイルサイズが大きすぎます ("#));
        assert!(!html.contains(r#"id="resultCard""#));
    }

    #[tokio::test]
    async fn test_models_and_ping() {
        let app = router(state(FakeReply::default()));

        let request = Request::builder().uri("/api/models").body(Body::empty()).unwrap();
        let json = body_json(app.clone().oneshot(request).await.unwrap()).await;
        assert_eq!(json["data"]["default_model"], "gemini-1.5-pro");
        assert_eq!(json["data"]["models"][0], "gemini-1.5-pro");

        let request = Request::builder().uri("/api/ping").body(Body::empty()).unwrap();
        let json = body_json(app.oneshot(request).await.unwrap()).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["busy"], false);
    }

    #[test]
    fn test_body_limit_follows_file_size() {
        let config = ServerConfig::new("0.0.0.0", 9000).with_max_file_size(1024);
        assert_eq!(config.body_limit, 1024 + FORM_OVERHEAD_BYTES);
        assert_eq!(config.addr(), "0.0.0.0:9000");
    }
}
