use thiserror::Error;

#[derive(Error, Debug)]
pub enum SocialSyncError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`socialsync config --set-api-key YOUR_KEY` で設定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("接続済みのプラットフォームがありません。`socialsync config --connect <platform>` で接続してください")]
    NoPlatformsConnected,

    #[error("画像の解析に失敗しました。もう一度お試しください")]
    AnalysisFailed,

    #[error("コンテンツの生成に失敗しました。もう一度お試しください")]
    GenerationFailed,

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] socialsync_common::Error),
}

pub type Result<T> = std::result::Result<T, SocialSyncError>;
