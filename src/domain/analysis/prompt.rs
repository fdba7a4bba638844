//! 固定提示词

use serde::Deserialize;

/// 提示词变体
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptVariant {
    /// 自由文本回答
    FreeText,
    /// 严格 JSON（likelihood / rationale / followups）
    #[default]
    StrictJson,
}

const FREE_TEXT_PROMPT: &str = "次の音声ファイルを解析し、漏水音（配管からの水漏れや水が流れる異常音）かどうかを判定してください。\n\n\
1) 判定結果を「漏水音の可能性: 高 / 中 / 低」で示す\n\
2) 判断理由を2〜3行で説明する\n\
3) 必要なら追加で確認すべきポイントを提案する";

const STRICT_JSON_PROMPT: &str = "次の音声ファイルを解析し、漏水音（配管からの水漏れや水が流れる異常音）かどうかを判定してください。\n\n\
回答は次のスキーマに従う JSON オブジェクトのみを出力してください。前後に説明文やコードブロックを付けないでください。\n\
{\n\
  \"likelihood\": \"高\" | \"中\" | \"低\",\n\
  \"rationale\": \"判断理由 (2〜3行)\",\n\
  \"followups\": [\"追加で確認すべきポイント\", ...]\n\
}";

/// 构建提示词
pub fn build_prompt(variant: PromptVariant) -> &'static str {
    match variant {
        PromptVariant::FreeText => FREE_TEXT_PROMPT,
        PromptVariant::StrictJson => STRICT_JSON_PROMPT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_json_is_default_and_declares_schema() {
        let prompt = build_prompt(PromptVariant::default());
        for field in ["likelihood", "rationale", "followups"] {
            assert!(prompt.contains(field), "missing {}", field);
        }
    }

    #[test]
    fn test_free_text_prompt() {
        let prompt = build_prompt(PromptVariant::FreeText);
        assert!(prompt.contains("漏水音の可能性: 高 / 中 / 低"));
        assert!(!prompt.contains("likelihood"));
    }

    #[test]
    fn test_variant_deserialize() {
        let v: PromptVariant = serde_json::from_str("\"free_text\"").unwrap();
        assert_eq!(v, PromptVariant::FreeText);
    }
}
