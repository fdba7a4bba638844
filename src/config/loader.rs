//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;
use crate::application::AnalysisSettings;
use crate::domain::analysis::{ModelId, ValidationLimits};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `ROUSUI_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `ROUSUI_SERVER__PORT=8080`
/// - `ROUSUI_GEMINI__DEFAULT_MODEL=gemini-1.5-flash`
/// - `ROUSUI_GEMINI__FAKE=true`
/// - `ROUSUI_LIMITS__MAX_FILE_SIZE=10485760`
///
/// API 密钥不在配置中，每次请求由表单提交。
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）；列表类字段由 serde default 提供
    builder = builder
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default(
            "gemini.base_url",
            "https://generativelanguage.googleapis.com/v1beta",
        )?
        .set_default("gemini.timeout_secs", 120)?
        .set_default("gemini.default_model", "gemini-1.5-pro")?
        .set_default("gemini.prompt", "strict_json")?
        .set_default("gemini.fake", false)?
        .set_default("limits.max_file_size", 20 * 1024 * 1024)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: ROUSUI_GEMINI__TIMEOUT_SECS=60
    builder = builder.add_source(
        Environment::with_prefix("ROUSUI")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.gemini.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Gemini base URL cannot be empty".to_string(),
        ));
    }

    if config.gemini.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Gemini timeout cannot be 0".to_string(),
        ));
    }

    ModelId::new(config.gemini.default_model.as_str()).map_err(|e| {
        ConfigError::ValidationError(format!(
            "Invalid default model '{}': {}",
            config.gemini.default_model, e
        ))
    })?;

    for model in &config.gemini.models {
        ModelId::new(model.as_str()).map_err(|e| {
            ConfigError::ValidationError(format!("Invalid model '{}': {}", model, e))
        })?;
    }

    for entry in &config.gemini.aliases {
        if entry.alias.trim().is_empty() || entry.target.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Model alias and target cannot be empty".to_string(),
            ));
        }
    }

    if let Some(alias) = config.gemini.alias_table().find_cycle() {
        return Err(ConfigError::ValidationError(format!(
            "Model alias '{}' forms a cycle",
            alias
        )));
    }

    if config.limits.max_file_size == 0 {
        return Err(ConfigError::ValidationError(
            "Max file size cannot be 0".to_string(),
        ));
    }

    Ok(())
}

impl AppConfig {
    /// 判定用例设置
    pub fn analysis_settings(&self) -> Result<AnalysisSettings, ConfigError> {
        let default_model = ModelId::new(self.gemini.default_model.as_str())
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        Ok(AnalysisSettings {
            limits: ValidationLimits {
                max_file_size: self.limits.max_file_size,
            },
            default_model,
            prompt_variant: self.gemini.prompt,
        })
    }
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Gemini Base URL: {}", config.gemini.base_url);
    tracing::info!("Gemini Timeout: {}s", config.gemini.timeout_secs);
    tracing::info!("Default Model: {}", config.gemini.default_model);
    tracing::info!("Models: {:?}", config.gemini.models);
    tracing::info!("Extra Aliases: {}", config.gemini.aliases.len());
    tracing::info!("Prompt: {:?}", config.gemini.prompt);
    if config.gemini.fake {
        tracing::warn!("Fake Gemini client enabled, no requests leave this process");
    }
    tracing::info!("Max File Size: {} bytes", config.limits.max_file_size);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
