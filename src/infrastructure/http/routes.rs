//! HTTP Routes
//!
//! Endpoints:
//! - /              GET   表单页面
//! - /analyze       POST  提交表单（multipart），返回 HTML
//! - /api/analyze   POST  提交表单（multipart），返回 JSON
//! - /api/models    GET   可选模型
//! - /api/ping      GET   健康检查

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::index))
        .route("/analyze", post(handlers::analyze_page))
        .nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/models", get(handlers::list_models))
        .route("/analyze", post(handlers::analyze_json))
}
