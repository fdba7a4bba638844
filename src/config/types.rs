//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;

use crate::domain::analysis::{ModelAliasTable, PromptVariant, MAX_FILE_SIZE_BYTES};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// Gemini 配置
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// 输入限制
    #[serde(default)]
    pub limits: LimitsConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 一条模型别名
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelAliasEntry {
    pub alias: String,
    pub target: String,
}

/// Gemini 配置
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    /// API 基础 URL
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_gemini_timeout")]
    pub timeout_secs: u64,

    /// 表单未选择模型时使用
    #[serde(default = "default_model")]
    pub default_model: String,

    /// 表单下拉框中的模型
    #[serde(default = "default_models")]
    pub models: Vec<String>,

    /// 追加的模型别名（在内置别名之上）
    #[serde(default)]
    pub aliases: Vec<ModelAliasEntry>,

    /// 提示词变体: strict_json / free_text
    #[serde(default)]
    pub prompt: PromptVariant,

    /// 使用不联网的固定回答客户端
    #[serde(default)]
    pub fake: bool,
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_timeout() -> u64 {
    120
}

fn default_model() -> String {
    "gemini-1.5-pro".to_string()
}

fn default_models() -> Vec<String> {
    vec![
        "gemini-1.5-pro".to_string(),
        "gemini-1.5-flash".to_string(),
        "gemini-2.0-flash".to_string(),
    ]
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_gemini_base_url(),
            timeout_secs: default_gemini_timeout(),
            default_model: default_model(),
            models: default_models(),
            aliases: Vec::new(),
            prompt: PromptVariant::default(),
            fake: false,
        }
    }
}

impl GeminiConfig {
    /// 内置别名加上配置中的别名
    pub fn alias_table(&self) -> ModelAliasTable {
        self.aliases
            .iter()
            .fold(ModelAliasTable::builtin(), |table, entry| {
                table.with_alias(entry.alias.trim(), entry.target.trim())
            })
    }
}

/// 输入限制
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// 音频文件大小上限（字节），默认 20MB
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

fn default_max_file_size() -> u64 {
    MAX_FILE_SIZE_BYTES
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
