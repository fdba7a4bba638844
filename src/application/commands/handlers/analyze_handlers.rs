//! Analyze Command Handlers
//!
//! 校验 → 编码 → 请求 → 解析 → 渲染，严格线性执行。

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{AnalyzeAudio, AnalyzeAudioResponse};
use crate::application::encoder::encode_audio;
use crate::application::error::AnalysisError;
use crate::application::interpreter::interpret;
use crate::application::ports::{GenerateRequest, GenerativeModelPort};
use crate::application::renderer::{render, ResultMetadata, StatusMessage, COMPLETED_STATUS};
use crate::application::trigger::SubmissionTrigger;
use crate::domain::analysis::{build_prompt, ModelId, PromptVariant, ValidationLimits};

/// 判定设置
#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    pub limits: ValidationLimits,
    pub default_model: ModelId,
    pub prompt_variant: PromptVariant,
}

/// AnalyzeAudio Handler
pub struct AnalyzeAudioHandler {
    model: Arc<dyn GenerativeModelPort>,
    trigger: Arc<SubmissionTrigger>,
    settings: AnalysisSettings,
}

impl AnalyzeAudioHandler {
    pub fn new(
        model: Arc<dyn GenerativeModelPort>,
        trigger: Arc<SubmissionTrigger>,
        settings: AnalysisSettings,
    ) -> Self {
        Self {
            model,
            trigger,
            settings,
        }
    }

    pub fn trigger(&self) -> &SubmissionTrigger {
        &self.trigger
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    pub async fn handle(&self, command: AnalyzeAudio) -> Result<AnalyzeAudioResponse, AnalysisError> {
        let attempt_id = Uuid::new_v4();

        match self.run(attempt_id, command).await {
            Ok(response) => Ok(response),
            Err(e) => {
                match &e {
                    AnalysisError::Validation(_) | AnalysisError::AlreadyInFlight => {
                        tracing::warn!(
                            attempt_id = %attempt_id,
                            kind = e.kind(),
                            error = %e,
                            "Analysis rejected"
                        );
                    }
                    _ => {
                        tracing::error!(
                            attempt_id = %attempt_id,
                            kind = e.kind(),
                            error = %e,
                            "Analysis failed"
                        );
                    }
                }
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        attempt_id: Uuid,
        command: AnalyzeAudio,
    ) -> Result<AnalyzeAudioResponse, AnalysisError> {
        // 校验先于任何 I/O
        let request = command
            .snapshot
            .validate(&self.settings.limits, &self.settings.default_model)?;

        let _guard = self
            .trigger
            .try_begin()
            .ok_or(AnalysisError::AlreadyInFlight)?;

        let resolved_model = self.model.resolve_model(&request.config.model);
        tracing::info!(
            attempt_id = %attempt_id,
            file = %request.asset.name(),
            size = request.asset.size(),
            mime_type = %request.asset.mime_type(),
            model = %resolved_model,
            temperature = request.config.temperature.value(),
            "Starting analysis"
        );

        let audio = encode_audio(&request.asset).await?;

        let text = self
            .model
            .generate(GenerateRequest {
                api_key: request.api_key.clone(),
                audio,
                mime_type: request.asset.mime_type().to_string(),
                model: request.config.model.clone(),
                temperature: request.config.temperature,
                prompt: build_prompt(self.settings.prompt_variant).to_string(),
            })
            .await?;

        let result = interpret(&text);
        let rendered = render(
            &result,
            &ResultMetadata::from_request(&request, &resolved_model),
        );

        tracing::info!(
            attempt_id = %attempt_id,
            structured = result.is_structured(),
            followups = result.followups().len(),
            "Analysis completed"
        );

        Ok(AnalyzeAudioResponse {
            attempt_id,
            analyzed_at: Utc::now(),
            model: resolved_model.to_string(),
            result,
            rendered,
            status: StatusMessage::info(COMPLETED_STATUS),
        })
    }
}
