//! Application State

use std::sync::Arc;

use crate::application::{
    AnalysisSettings, AnalyzeAudioHandler, GenerativeModelPort, SubmissionTrigger,
};

/// 应用状态
///
/// 全进程共享一个提交触发器，同一时刻只有一个解析在进行。
pub struct AppState {
    // ========== Ports ==========
    pub trigger: Arc<SubmissionTrigger>,

    // ========== Command Handlers ==========
    pub analyze_handler: AnalyzeAudioHandler,

    // ========== Form ==========
    /// 下拉框中的模型
    pub models: Vec<String>,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        model: Arc<dyn GenerativeModelPort>,
        settings: AnalysisSettings,
        models: Vec<String>,
    ) -> Self {
        let trigger = Arc::new(SubmissionTrigger::new());
        Self {
            trigger: trigger.clone(),
            analyze_handler: AnalyzeAudioHandler::new(model, trigger, settings),
            models,
        }
    }

    pub fn settings(&self) -> &AnalysisSettings {
        self.analyze_handler.settings()
    }

    /// 下拉框选项，默认模型总在其中
    pub fn model_options(&self) -> Vec<String> {
        let default_model = self.settings().default_model.to_string();
        let mut options = self.models.clone();
        if !options.contains(&default_model) {
            options.insert(0, default_model);
        }
        options
    }
}
