//! Analyze Commands - 漏水音判定命令

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::application::renderer::{RenderedResult, StatusMessage};
use crate::domain::analysis::{AnalysisResult, FormSnapshot};

/// 提交音频判定命令
#[derive(Debug, Clone)]
pub struct AnalyzeAudio {
    pub snapshot: FormSnapshot,
}

/// 判定响应
#[derive(Debug, Clone)]
pub struct AnalyzeAudioResponse {
    pub attempt_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    /// 请求中实际使用的模型
    pub model: String,
    pub result: AnalysisResult,
    pub rendered: RenderedResult,
    pub status: StatusMessage,
}
