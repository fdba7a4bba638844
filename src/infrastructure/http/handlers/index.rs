//! Index Handler - 表单页面

use axum::{extract::State, response::Html, Json};
use std::sync::Arc;

use crate::infrastructure::http::dto::{ApiResponse, ModelsResponse};
use crate::infrastructure::http::page::{render_page, PageView};
use crate::infrastructure::http::state::AppState;

/// 空表单
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let settings = state.settings();
    let view = PageView {
        models: state.model_options(),
        selected_model: settings.default_model.to_string(),
        temperature: 0.0,
        max_file_size: settings.limits.max_file_size,
        status: None,
        result: None,
    };
    Html(render_page(&view))
}

/// 可选模型列表
pub async fn list_models(State(state): State<Arc<AppState>>) -> Json<ApiResponse<ModelsResponse>> {
    Json(ApiResponse::success(ModelsResponse {
        models: state.model_options(),
        default_model: state.settings().default_model.to_string(),
    }))
}
