//! Data Transfer Objects

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::application::{AnalyzeAudioResponse, RenderedResult, StatusMessage};
use crate::domain::analysis::AnalysisResult;

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

// ============================================================================
// Analyze DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct AnalyzeResponseDto {
    pub attempt_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub model: String,
    pub status: StatusMessage,
    pub result: AnalysisResult,
    pub rendered: RenderedResult,
}

impl From<AnalyzeAudioResponse> for AnalyzeResponseDto {
    fn from(r: AnalyzeAudioResponse) -> Self {
        Self {
            attempt_id: r.attempt_id,
            analyzed_at: r.analyzed_at,
            model: r.model,
            status: r.status,
            result: r.result,
            rendered: r.rendered,
        }
    }
}

// ============================================================================
// Model DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
    pub default_model: String,
}
