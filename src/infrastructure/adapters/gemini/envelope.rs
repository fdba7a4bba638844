//! Gemini generateContent 请求/响应结构
//!
//! 请求:
//! {"generationConfig":{"temperature":0.0},
//!  "contents":[{"role":"user","parts":[{"text":"..."},{"inline_data":{"mime_type":"audio/wav","data":"<base64>"}}]}]}
//!
//! 响应只消费 candidates[0].content.parts[0].text

use serde::{Deserialize, Serialize};

use crate::application::ports::RemoteError;

#[derive(Debug, Serialize)]
pub(crate) struct GenerateContentRequest<'a> {
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
    pub contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerationConfig {
    pub temperature: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct Content<'a> {
    pub role: &'a str,
    pub parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Debug, Serialize)]
pub(crate) struct InlineData<'a> {
    pub mime_type: &'a str,
    pub data: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    /// 提示词在前，音频在后
    pub fn new(prompt: &'a str, mime_type: &'a str, data: &'a str, temperature: f64) -> Self {
        Self {
            generation_config: GenerationConfig { temperature },
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part::Text { text: prompt },
                    Part::InlineData {
                        inline_data: InlineData { mime_type, data },
                    },
                ],
            }],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// 取首个候选的首段文本，路径缺失或文本为空都算 EmptyResponse
    pub fn into_first_text(self) -> Result<String, RemoteError> {
        let candidate = match self.candidates.into_iter().next() {
            Some(candidate) => candidate,
            None => return Err(RemoteError::EmptyResponse),
        };
        let content = match candidate.content {
            Some(content) => content,
            None => return Err(RemoteError::EmptyResponse),
        };
        match content.parts.into_iter().next() {
            Some(ResponsePart { text: Some(text) }) if !text.trim().is_empty() => Ok(text),
            Some(ResponsePart { text: _ }) | None => Err(RemoteError::EmptyResponse),
        }
    }
}
