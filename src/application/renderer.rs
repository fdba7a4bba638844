//! Result Renderer - 结果展示模型
//!
//! 每次渲染都生成完整的新值，调用方整体替换旧内容。

use serde::Serialize;

use crate::domain::analysis::{AnalysisResult, ModelId, ValidatedRequest};

pub const PENDING_TEXT: &str = "解析中です。しばらくお待ちください...";
pub const FAILED_TEXT: &str = "エラーが発生しました。APIキーとファイル形式を確認してください。";
pub const SENDING_STATUS: &str = "Geminiへ送信中...。";
pub const COMPLETED_STATUS: &str = "判定が完了しました。";

/// 状态提示
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// 区块内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SectionBody {
    Paragraph(String),
    List(Vec<String>),
}

/// 带标签的展示区块
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub label: Option<&'static str>,
    pub body: SectionBody,
}

/// 展示附带的元数据
#[derive(Debug, Clone, PartialEq)]
pub struct ResultMetadata {
    pub file_name: String,
    pub mime_type: String,
    pub model: String,
    pub temperature: f64,
}

impl ResultMetadata {
    /// `model` 为别名解析后实际请求的模型
    pub fn from_request(request: &ValidatedRequest, model: &ModelId) -> Self {
        Self {
            file_name: request.asset.name().to_string(),
            mime_type: request.asset.mime_type().to_string(),
            model: model.to_string(),
            temperature: request.config.temperature.value(),
        }
    }

    fn lines(&self) -> Vec<String> {
        vec![
            format!("ファイル名: {}", self.file_name),
            format!("MIMEタイプ: {}", self.mime_type),
            format!("モデル: {}", self.model),
            format!("温度: {}", self.temperature),
        ]
    }
}

/// 渲染结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedResult {
    pub sections: Vec<Section>,
    pub metadata: Vec<String>,
}

impl RenderedResult {
    fn paragraph(text: &str) -> Self {
        Self {
            sections: vec![Section {
                label: None,
                body: SectionBody::Paragraph(text.to_string()),
            }],
            metadata: Vec::new(),
        }
    }

    /// 请求进行中的占位内容
    pub fn pending() -> Self {
        Self::paragraph(PENDING_TEXT)
    }

    /// 失败时的占位内容
    pub fn failed() -> Self {
        Self::paragraph(FAILED_TEXT)
    }
}

/// 渲染判定结果
pub fn render(result: &AnalysisResult, metadata: &ResultMetadata) -> RenderedResult {
    let sections = match result {
        AnalysisResult::Structured(s) => vec![
            Section {
                label: Some("判定"),
                body: SectionBody::Paragraph(format!("漏水音の可能性: {}", s.likelihood.label())),
            },
            Section {
                label: Some("理由"),
                body: SectionBody::Paragraph(s.rationale.clone()),
            },
            Section {
                label: Some("追加確認ポイント"),
                body: SectionBody::List(s.followups.clone()),
            },
        ],
        AnalysisResult::Prose { text } => vec![Section {
            label: None,
            body: SectionBody::Paragraph(text.clone()),
        }],
    };

    RenderedResult {
        sections,
        metadata: metadata.lines(),
    }
}
