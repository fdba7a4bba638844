//! Gemini Adapter - 生成式模型客户端实现

mod envelope;
mod fake_gemini_client;
mod http_gemini_client;

pub use fake_gemini_client::{FakeGeminiClient, FakeReply, DEFAULT_FAKE_REPLY};
pub use http_gemini_client::*;
