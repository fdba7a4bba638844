//! Analyze HTTP Handlers
//!
//! 同一份 multipart 表单:
//! - POST /analyze      返回整页 HTML
//! - POST /api/analyze  返回 JSON

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{header::CONTENT_LENGTH, HeaderMap, StatusCode},
    response::Html,
    Json,
};
use std::sync::Arc;

use crate::application::{
    AnalysisError, AnalyzeAudio, RenderedResult, StatusMessage,
};
use crate::domain::analysis::{AudioAsset, FormSnapshot, ValidationError};
use crate::infrastructure::http::dto::{AnalyzeResponseDto, ApiResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::page::{render_page, PageView};
use crate::infrastructure::http::state::AppState;

/// 表单读取失败
#[derive(Debug)]
pub enum FormError {
    /// 请求体超过上限，按文件过大处理
    TooLarge(ValidationError),
    /// multipart 格式错误
    Malformed(String),
}

impl FormError {
    fn from_multipart(e: MultipartError, what: &str, declared_len: u64) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            FormError::TooLarge(ValidationError::FileTooLarge(declared_len))
        } else {
            FormError::Malformed(format!("Failed to read {}: {}", what, e))
        }
    }
}

impl From<FormError> for ApiError {
    fn from(e: FormError) -> Self {
        match e {
            FormError::TooLarge(e) => AnalysisError::Validation(e).into(),
            FormError::Malformed(msg) => ApiError::BadRequest(msg),
        }
    }
}

/// 请求声明的长度；缺失时退回文件大小上限
fn declared_len(headers: &HeaderMap, fallback: u64) -> u64 {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(fallback)
}

/// 从 multipart 表单读取快照
///
/// 字段: api_key, audio_file, model, temperature。
/// 浏览器未选文件时会提交空文件名的空字段，视为未选择。
/// 超过请求体上限时无法得知文件本身大小，以请求长度 `declared_len` 报告。
pub async fn read_form(
    mut multipart: Multipart,
    declared_len: u64,
) -> Result<FormSnapshot, FormError> {
    let mut snapshot = FormSnapshot::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| FormError::from_multipart(e, "multipart field", declared_len))?
    {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "api_key" => {
                snapshot.api_key = field
                    .text()
                    .await
                    .map_err(|e| FormError::from_multipart(e, "api_key", declared_len))?;
            }
            "model" => {
                let model = field
                    .text()
                    .await
                    .map_err(|e| FormError::from_multipart(e, "model", declared_len))?;
                snapshot.model = Some(model);
            }
            "temperature" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| FormError::from_multipart(e, "temperature", declared_len))?;
                let raw = raw.trim();
                // 无法解析的值交给校验，报温度越界
                if !raw.is_empty() {
                    snapshot.temperature = Some(raw.parse().unwrap_or(f64::NAN));
                }
            }
            "audio_file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(|s| s.to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| FormError::from_multipart(e, "file", declared_len))?;

                if file_name.is_empty() && data.is_empty() {
                    continue;
                }
                snapshot.file = Some(AudioAsset::from_bytes(
                    file_name,
                    content_type.as_deref(),
                    data.to_vec(),
                ));
            }
            _ => {}
        }
    }

    Ok(snapshot)
}

/// 提交表单，返回 JSON
pub async fn analyze_json(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<ApiResponse<AnalyzeResponseDto>>, ApiError> {
    let fallback = state.settings().limits.max_file_size;
    let snapshot = read_form(multipart, declared_len(&headers, fallback)).await?;
    let response = state
        .analyze_handler
        .handle(AnalyzeAudio { snapshot })
        .await?;

    Ok(Json(ApiResponse::success(response.into())))
}

/// 提交表单，返回整页 HTML
///
/// 校验失败只更新状态栏；其余失败还会在结果卡片显示通用错误提示。
pub async fn analyze_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Html<String> {
    let settings = state.settings();
    let mut view = PageView {
        models: state.model_options(),
        selected_model: settings.default_model.to_string(),
        temperature: 0.0,
        max_file_size: settings.limits.max_file_size,
        status: None,
        result: None,
    };

    let declared = declared_len(&headers, settings.limits.max_file_size);
    let snapshot = match read_form(multipart, declared).await {
        Ok(snapshot) => snapshot,
        Err(FormError::TooLarge(e)) => {
            tracing::warn!(error = %e, "Analyze form exceeds body limit");
            view.status = Some(StatusMessage::error(e.to_string()));
            return Html(render_page(&view));
        }
        Err(FormError::Malformed(msg)) => {
            tracing::warn!(error = %msg, "Failed to read analyze form");
            view.status = Some(StatusMessage::error(msg));
            view.result = Some(RenderedResult::failed());
            return Html(render_page(&view));
        }
    };

    if let Some(model) = snapshot.model.as_deref().filter(|m| !m.trim().is_empty()) {
        view.selected_model = model.trim().to_string();
    }
    if let Some(t) = snapshot.temperature.filter(|t| t.is_finite()) {
        view.temperature = t;
    }

    match state.analyze_handler.handle(AnalyzeAudio { snapshot }).await {
        Ok(response) => {
            view.status = Some(response.status);
            view.result = Some(response.rendered);
        }
        Err(e) => {
            view.status = Some(e.status());
            view.result = match e {
                AnalysisError::Validation(_) | AnalysisError::AlreadyInFlight => None,
                _ => Some(RenderedResult::failed()),
            };
        }
    }

    Html(render_page(&view))
}
