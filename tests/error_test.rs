//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use socialsync_rust::error::SocialSyncError;
use socialsync_rust::intake;
use std::path::Path;
use tempfile::tempdir;

/// 存在しない画像ファイルを読み込んだ場合
#[test]
fn test_load_nonexistent_image() {
    let result = intake::load_image(Path::new("/nonexistent/path/photo-12345.jpg"));
    assert!(result.is_err());

    let err = result.unwrap_err();
    assert!(matches!(err, SocialSyncError::FileNotFound(_)));
}

/// 画像として解釈できないファイルを読み込んだ場合
#[test]
fn test_load_non_image_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("data.json");
    std::fs::write(&path, "{}").unwrap();

    let result = intake::load_image(&path);
    assert!(matches!(result, Err(SocialSyncError::ImageLoad(_))));
}

/// SocialSyncErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        SocialSyncError::Config("テスト設定エラー".to_string()),
        SocialSyncError::FileNotFound("photo.jpg".to_string()),
        SocialSyncError::ImageLoad("壊れたファイル".to_string()),
        SocialSyncError::NoPlatformsConnected,
        SocialSyncError::AnalysisFailed,
        SocialSyncError::GenerationFailed,
        SocialSyncError::ApiCall("API呼び出し失敗".to_string()),
        SocialSyncError::ApiParse("不正なレスポンス".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// MissingApiKeyエラーのメッセージ確認
#[test]
fn test_missing_api_key_message() {
    let err = SocialSyncError::MissingApiKey;
    let display = format!("{}", err);

    assert!(display.contains("APIキー"));
    assert!(display.contains("socialsync config"));
}

/// NoPlatformsConnectedが復旧手順を案内すること
#[test]
fn test_no_platforms_message() {
    let display = format!("{}", SocialSyncError::NoPlatformsConnected);
    assert!(display.contains("socialsync config --connect"));
}

/// エラーのDebug実装確認
#[test]
fn test_error_debug() {
    let err = SocialSyncError::Config("テスト".to_string());
    let debug = format!("{:?}", err);

    assert!(debug.contains("Config"));
    assert!(debug.contains("テスト"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: SocialSyncError = io_err.into();

    assert!(matches!(err, SocialSyncError::Io(_)));
    let display = format!("{}", err);
    assert!(display.contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: SocialSyncError = json_err.into();

    assert!(matches!(err, SocialSyncError::JsonParse(_)));
}

/// common::Errorからの変換
#[test]
fn test_common_error_conversion() {
    let common_err = socialsync_common::Error::Parse("パースエラー".to_string());
    let err: SocialSyncError = common_err.into();

    assert!(matches!(err, SocialSyncError::Common(_)));
}

/// エラーチェーン（透過的エラー）
#[test]
fn test_error_chain_transparent() {
    let common_err = socialsync_common::Error::Config("設定エラー".to_string());
    let err: SocialSyncError = common_err.into();

    // 透過的エラーなのでメッセージがそのまま表示される
    let display = format!("{}", err);
    assert!(display.contains("設定エラー") || display.contains("Config"));
}
