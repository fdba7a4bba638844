//! Analysis Context - Value Objects

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 上传音频的大小上限（20 MiB）
pub const MAX_FILE_SIZE_BYTES: u64 = 20 * 1024 * 1024;

/// 未知 MIME 类型时的回退值
pub const DEFAULT_MIME_TYPE: &str = "audio/wav";

/// 默认采样温度
pub const DEFAULT_TEMPERATURE: f64 = 0.0;

/// API 密钥
///
/// 只在单次请求内存活，不落盘、不进日志。
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// 去除首尾空白后为空则视为缺失
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// 取出原始密钥（仅用于拼接请求）
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(****)")
    }
}

impl std::fmt::Display for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("****")
    }
}

/// 音频内容来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    /// 已在内存中的字节（表单上传）
    Memory(Vec<u8>),
    /// 磁盘文件，编码时再读取
    File(PathBuf),
}

/// 用户选择的音频文件
///
/// 不变量:
/// - mime_type 非空（缺失时回退为 audio/wav）
/// - size 为声明大小，编码时与实际内容核对
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioAsset {
    name: String,
    size: u64,
    mime_type: String,
    source: AudioSource,
}

impl AudioAsset {
    /// 从内存字节创建
    pub fn from_bytes(name: impl Into<String>, mime_type: Option<&str>, data: Vec<u8>) -> Self {
        let name = name.into();
        let mime_type = resolve_mime_type(&name, mime_type);
        Self {
            size: data.len() as u64,
            name,
            mime_type,
            source: AudioSource::Memory(data),
        }
    }

    /// 从磁盘文件创建，size 取自文件元数据
    pub fn on_disk(path: PathBuf, size: u64, mime_type: Option<&str>) -> Self {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio")
            .to_string();
        let mime_type = resolve_mime_type(&name, mime_type);
        Self {
            name,
            size,
            mime_type,
            source: AudioSource::File(path),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn source(&self) -> &AudioSource {
        &self.source
    }
}

/// 按扩展名推断音频 MIME 类型
pub fn mime_type_for_path(path: &Path) -> Option<&'static str> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("wav") => Some("audio/wav"),
        Some("mp3") => Some("audio/mpeg"),
        Some("flac") => Some("audio/flac"),
        Some("ogg") => Some("audio/ogg"),
        Some("m4a") => Some("audio/mp4"),
        Some("aac") => Some("audio/aac"),
        Some("webm") => Some("audio/webm"),
        _ => None,
    }
}

fn resolve_mime_type(name: &str, declared: Option<&str>) -> String {
    let declared = declared
        .map(str::trim)
        .filter(|m| !m.is_empty() && *m != "application/octet-stream");
    match declared {
        Some(m) => m.to_string(),
        None => mime_type_for_path(Path::new(name))
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string(),
    }
}

/// 模型标识
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(id: impl Into<String>) -> Result<Self, &'static str> {
        let id: String = id.into();
        let id = id.trim();
        if id.is_empty() {
            return Err("模型标识不能为空");
        }
        if id.contains(['/', '?', '#', ' ']) {
            return Err("模型标识包含非法字符");
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 采样温度 (0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Temperature(f64);

impl Temperature {
    /// 超出 [0.0, 1.0]（含 NaN）时原样返回该值
    pub fn new(value: f64) -> Result<Self, f64> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(value)
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for Temperature {
    fn default() -> Self {
        Self(DEFAULT_TEMPERATURE)
    }
}

impl std::fmt::Display for Temperature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 生成参数
#[derive(Debug, Clone, PartialEq)]
pub struct RequestConfig {
    pub model: ModelId,
    pub temperature: Temperature,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_trimmed_and_redacted() {
        let key = ApiKey::new("  secret-key \n").unwrap();
        assert_eq!(key.expose(), "secret-key");
        assert_eq!(format!("{:?}", key), "ApiKey(****)");
        assert!(!key.to_string().contains("secret"));
        assert!(ApiKey::new("   ").is_none());
    }

    #[test]
    fn test_mime_type_defaults_to_wav() {
        let asset = AudioAsset::from_bytes("recording", None, vec![1, 2, 3]);
        assert_eq!(asset.mime_type(), "audio/wav");
        assert_eq!(asset.size(), 3);

        let asset = AudioAsset::from_bytes("recording", Some(""), vec![]);
        assert_eq!(asset.mime_type(), "audio/wav");
    }

    #[test]
    fn test_mime_type_from_extension_and_declared() {
        let asset = AudioAsset::from_bytes("pipe.MP3", None, vec![]);
        assert_eq!(asset.mime_type(), "audio/mpeg");

        let asset = AudioAsset::from_bytes("pipe.mp3", Some("audio/x-custom"), vec![]);
        assert_eq!(asset.mime_type(), "audio/x-custom");

        let asset = AudioAsset::from_bytes("pipe.ogg", Some("application/octet-stream"), vec![]);
        assert_eq!(asset.mime_type(), "audio/ogg");
    }

    #[test]
    fn test_on_disk_asset_name() {
        let asset = AudioAsset::on_disk(PathBuf::from("/tmp/leak.flac"), 42, None);
        assert_eq!(asset.name(), "leak.flac");
        assert_eq!(asset.size(), 42);
        assert_eq!(asset.mime_type(), "audio/flac");
    }

    #[test]
    fn test_model_id_validation() {
        assert_eq!(ModelId::new(" gemini-1.5-pro ").unwrap().as_str(), "gemini-1.5-pro");
        assert!(ModelId::new("").is_err());
        assert!(ModelId::new("a/b").is_err());
        assert!(ModelId::new("x?key=1").is_err());
    }

    #[test]
    fn test_temperature_range() {
        assert!(Temperature::new(0.0).is_ok());
        assert!(Temperature::new(1.0).is_ok());
        assert!(Temperature::new(0.5).is_ok());
        assert_eq!(Temperature::new(-0.0001), Err(-0.0001));
        assert_eq!(Temperature::new(1.0001), Err(1.0001));
        assert!(Temperature::new(f64::NAN).is_err());
        assert_eq!(Temperature::default().value(), 0.0);
    }
}
