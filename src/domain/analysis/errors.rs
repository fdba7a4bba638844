//! Analysis Context - Errors

use thiserror::Error;

use super::format_bytes;

/// 表单校验错误
///
/// 消息文本直接展示给用户。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("APIキーを入力してください。")]
    MissingApiKey,

    #[error("音声ファイルを選択してください。")]
    MissingFile,

    #[error("ファイルサイズが大きすぎます ({})。", format_bytes(*.0))]
    FileTooLarge(u64),

    #[error("温度は 0.0〜1.0 の範囲で指定してください (指定値: {0})。")]
    TemperatureOutOfRange(f64),

    #[error("モデル名が不正です: {0}")]
    InvalidModel(String),
}
