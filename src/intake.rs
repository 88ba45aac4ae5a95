//! 画像取り込みモジュール
//!
//! 指定された画像ファイルを読み込み、フォーマット判定と
//! Base64エンコードを行ってAPI送信用のペイロードを作る

use crate::error::{Result, SocialSyncError};
use base64::Engine;
use std::path::Path;

/// API送信用の画像ペイロード
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub file_name: String,
    pub mime_type: String,
    pub base64: String,
}

/// 画像ファイルを読み込んでペイロード化する
pub fn load_image(path: &Path) -> Result<ImagePayload> {
    if !path.exists() {
        return Err(SocialSyncError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;

    let format = image::guess_format(&bytes)
        .map_err(|e| SocialSyncError::ImageLoad(format!("{}: {}", path.display(), e)))?;
    let mime_type = format.to_mime_type().to_string();

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(ImagePayload {
        file_name,
        mime_type,
        base64: base64::engine::general_purpose::STANDARD.encode(&bytes),
    })
}
