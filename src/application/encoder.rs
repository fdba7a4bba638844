//! Asset Encoder - 音频转 base64
//!
//! 发起网络请求前唯一可能等待 I/O 的步骤。

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

use crate::domain::analysis::{AudioAsset, AudioSource};

/// 编码错误
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("ファイル読み込みに失敗しました ({name}): {reason}")]
    Read { name: String, reason: String },
}

impl EncodingError {
    fn read(asset: &AudioAsset, reason: impl Into<String>) -> Self {
        Self::Read {
            name: asset.name().to_string(),
            reason: reason.into(),
        }
    }
}

/// base64 编码后的音频
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedAudio {
    data: String,
    byte_len: u64,
}

impl EncodedAudio {
    pub fn as_str(&self) -> &str {
        &self.data
    }

    /// 原始字节数
    pub fn byte_len(&self) -> u64 {
        self.byte_len
    }
}

impl std::fmt::Debug for EncodedAudio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedAudio")
            .field("byte_len", &self.byte_len)
            .field("encoded_len", &self.data.len())
            .finish()
    }
}

fn encode_bytes(bytes: &[u8]) -> EncodedAudio {
    EncodedAudio {
        data: STANDARD.encode(bytes),
        byte_len: bytes.len() as u64,
    }
}

/// 读取音频并编码为 base64
///
/// 磁盘文件的实际大小必须与声明大小一致，否则视为读取失败。
pub async fn encode_audio(asset: &AudioAsset) -> Result<EncodedAudio, EncodingError> {
    let encoded = match asset.source() {
        AudioSource::Memory(bytes) => encode_bytes(bytes),
        AudioSource::File(path) => {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|e| EncodingError::read(asset, e.to_string()))?;
            encode_bytes(&bytes)
        }
    };

    if encoded.byte_len != asset.size() {
        return Err(EncodingError::read(
            asset,
            format!(
                "size changed: expected {} bytes, read {}",
                asset.size(),
                encoded.byte_len
            ),
        ));
    }

    tracing::debug!(
        name = %asset.name(),
        bytes = encoded.byte_len,
        encoded_len = encoded.data.len(),
        "Audio encoded"
    );

    Ok(encoded)
}
