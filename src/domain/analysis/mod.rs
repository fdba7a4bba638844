//! Analysis Context - 漏水音判定限界上下文
//!
//! 职责:
//! - 表单快照与输入校验
//! - 请求参数（模型、温度）与模型别名规范化
//! - 固定提示词
//! - 判定结果模型

mod errors;
mod form;
mod model_alias;
mod prompt;
mod result;
mod value_objects;

pub use errors::ValidationError;
pub use form::{format_bytes, FormSnapshot, ValidatedRequest, ValidationLimits};
pub use model_alias::ModelAliasTable;
pub use prompt::{build_prompt, PromptVariant};
pub use result::{AnalysisResult, Likelihood, StructuredAnalysis};
pub use value_objects::{
    mime_type_for_path, ApiKey, AudioAsset, AudioSource, ModelId, RequestConfig, Temperature,
    DEFAULT_MIME_TYPE, DEFAULT_TEMPERATURE, MAX_FILE_SIZE_BYTES,
};
