//! Analysis Context - 表单快照与校验
//!
//! 业务逻辑不读取任何环境状态，所有判断都基于一次性的 `FormSnapshot`。

use super::{
    ApiKey, AudioAsset, ModelId, RequestConfig, Temperature, ValidationError, MAX_FILE_SIZE_BYTES,
};

/// 校验限制
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationLimits {
    /// 文件大小上限（字节，含边界）
    pub max_file_size: u64,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE_BYTES,
        }
    }
}

/// 表单当前值的不可变快照
#[derive(Debug, Clone, Default)]
pub struct FormSnapshot {
    pub api_key: String,
    pub file: Option<AudioAsset>,
    /// 空或缺失时使用默认模型
    pub model: Option<String>,
    /// 缺失时使用默认温度
    pub temperature: Option<f64>,
}

/// 校验通过的请求
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    pub api_key: ApiKey,
    pub asset: AudioAsset,
    pub config: RequestConfig,
}

impl FormSnapshot {
    /// 提交按钮是否可用：密钥非空且已选择文件
    pub fn can_submit(&self) -> bool {
        !self.api_key.trim().is_empty() && self.file.is_some()
    }

    /// 校验表单
    ///
    /// 依次检查密钥、文件、文件大小、温度、模型。不做任何 I/O。
    pub fn validate(
        &self,
        limits: &ValidationLimits,
        default_model: &ModelId,
    ) -> Result<ValidatedRequest, ValidationError> {
        let api_key = ApiKey::new(&self.api_key).ok_or(ValidationError::MissingApiKey)?;

        let asset = self.file.as_ref().ok_or(ValidationError::MissingFile)?;
        if asset.size() > limits.max_file_size {
            return Err(ValidationError::FileTooLarge(asset.size()));
        }

        let temperature = match self.temperature {
            Some(value) => {
                Temperature::new(value).map_err(ValidationError::TemperatureOutOfRange)?
            }
            None => Temperature::default(),
        };

        let model = match self.model.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => {
                ModelId::new(raw).map_err(|_| ValidationError::InvalidModel(raw.to_string()))?
            }
            _ => default_model.clone(),
        };

        Ok(ValidatedRequest {
            api_key,
            asset: asset.clone(),
            config: RequestConfig { model, temperature },
        })
    }
}

/// 以 MB 显示字节数，保留一位小数
pub fn format_bytes(bytes: u64) -> String {
    let mb = bytes as f64 / (1024.0 * 1024.0);
    format!("{:.1}MB", mb)
}
