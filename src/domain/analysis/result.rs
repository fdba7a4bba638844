//! Analysis Context - 判定结果

use serde::{Deserialize, Deserializer, Serialize};

/// 漏水音的可能性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Likelihood {
    High,
    Medium,
    Low,
}

impl Likelihood {
    /// 解析模型返回的取值，接受英文与 高/中/低
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "high" | "高" => Some(Self::High),
            "medium" | "中" => Some(Self::Medium),
            "low" | "低" => Some(Self::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// 展示用标签
    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "高",
            Self::Medium => "中",
            Self::Low => "低",
        }
    }
}

impl<'de> Deserialize<'de> for Likelihood {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Likelihood::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown likelihood: {}", raw)))
    }
}

/// 结构化判定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredAnalysis {
    pub likelihood: Likelihood,
    pub rationale: String,
    #[serde(default)]
    pub followups: Vec<String>,
}

/// 单次解析的结果
///
/// 每次提交新建，不缓存。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisResult {
    Structured(StructuredAnalysis),
    Prose { text: String },
}

impl AnalysisResult {
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Structured(_))
    }

    pub fn followups(&self) -> &[String] {
        match self {
            Self::Structured(s) => &s.followups,
            Self::Prose { .. } => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_likelihood_parse() {
        assert_eq!(Likelihood::parse("HIGH"), Some(Likelihood::High));
        assert_eq!(Likelihood::parse(" 中 "), Some(Likelihood::Medium));
        assert_eq!(Likelihood::parse("低"), Some(Likelihood::Low));
        assert_eq!(Likelihood::parse("maybe"), None);
    }

    #[test]
    fn test_structured_deserialize() {
        let parsed: StructuredAnalysis =
            serde_json::from_str(r#"{"likelihood":"low","rationale":"quiet"}"#).unwrap();
        assert_eq!(parsed.likelihood, Likelihood::Low);
        assert!(parsed.followups.is_empty());

        let bad = serde_json::from_str::<StructuredAnalysis>(
            r#"{"likelihood":"unsure","rationale":"x","followups":[]}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_result_serializes_with_kind_tag() {
        let result = AnalysisResult::Prose {
            text: "hello".to_string(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["kind"], "prose");
        assert_eq!(json["text"], "hello");
        assert!(result.followups().is_empty());
    }
}
