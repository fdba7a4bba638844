//! Response Interpreter - 回答解析
//!
//! 远端模型不保证遵守 JSON 结构，解析失败时退回纯文本，从不报错。

use crate::domain::analysis::{AnalysisResult, StructuredAnalysis};

/// 解析远端回答
pub fn interpret(raw: &str) -> AnalysisResult {
    let candidate = strip_code_fence(raw.trim());

    match serde_json::from_str::<StructuredAnalysis>(candidate) {
        Ok(structured) => AnalysisResult::Structured(structured),
        Err(e) => {
            tracing::warn!(
                error = %e,
                text_len = raw.len(),
                "Response does not match the JSON schema, falling back to prose"
            );
            AnalysisResult::Prose {
                text: raw.to_string(),
            }
        }
    }
}

/// 去掉 ```json ... ``` 包裹
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return text;
    };
    // 第一行是语言标记；单行时标记与内容以空白分隔
    match body.find('\n') {
        Some(pos) => body[pos + 1..].trim(),
        None => {
            let body = body.trim();
            let tag_len = body
                .find(|c: char| !c.is_ascii_alphanumeric())
                .unwrap_or(body.len());
            body[tag_len..].trim()
        }
    }
}
