//! キャンペーンの型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - Platform: 投稿先プラットフォーム
//! - GeneratedPost: プラットフォーム別の生成済み投稿
//! - MarketingCampaign: 戦略インサイト + 投稿一覧
//! - BrandConfig: ブランド設定と接続情報

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 投稿先プラットフォーム
///
/// Emailは戦略モデルのレスポンススキーマ上のみ存在する。
/// 接続設定はSNS 5種にしか作られないため、要求していない限り
/// パース時のフィルタで除外される。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Platform {
    Instagram,
    LinkedIn,
    Twitter,
    Facebook,
    TikTok,
    Email,
}

/// 接続設定を持つSNSプラットフォーム（表示順）
pub const SOCIAL_PLATFORMS: &[Platform] = &[
    Platform::Instagram,
    Platform::Facebook,
    Platform::Twitter,
    Platform::LinkedIn,
    Platform::TikTok,
];

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::LinkedIn => "LinkedIn",
            Platform::Twitter => "Twitter",
            Platform::Facebook => "Facebook",
            Platform::TikTok => "TikTok",
            Platform::Email => "Email",
        }
    }

    /// 画像生成に使うアスペクト比（固定テーブル）
    pub fn aspect_ratio(&self) -> &'static str {
        match self {
            Platform::Instagram => "1:1",
            Platform::Facebook => "4:3",
            Platform::TikTok => "9:16",
            Platform::Twitter => "16:9",
            Platform::LinkedIn => "16:9",
            _ => "1:1",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "instagram" => Ok(Platform::Instagram),
            "linkedin" => Ok(Platform::LinkedIn),
            "twitter" | "x" => Ok(Platform::Twitter),
            "facebook" => Ok(Platform::Facebook),
            "tiktok" => Ok(Platform::TikTok),
            "email" => Ok(Platform::Email),
            _ => Err(format!(
                "Unknown platform: {}. Use instagram, linkedin, twitter, facebook, tiktok or email",
                s
            )),
        }
    }
}

/// 投稿の公開ステータス
///
/// 遷移は Draft → Publishing → Published のみ。
/// Failedは表現上存在するがシミュレータでは使わない。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    #[default]
    Draft,
    Publishing,
    Published,
    Failed,
}

/// プラットフォーム別の生成済み投稿
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPost {
    pub platform: Platform,

    /// メール件名（Emailのみ）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub hashtags: Vec<String>,

    /// プラットフォーム固有の運用ヒント
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<String>,

    /// 投稿画像を生成するためのプロンプト
    #[serde(default)]
    pub image_prompt: String,

    /// 生成済み画像（Data URL）。未生成ならNone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_image_url: Option<String>,

    #[serde(default)]
    pub status: PublicationStatus,
}

/// マーケティングキャンペーン（1回の生成の結果）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketingCampaign {
    #[serde(default)]
    pub strategic_insight: String,

    #[serde(default)]
    pub posts: Vec<GeneratedPost>,
}

/// プラットフォーム接続情報
///
/// APIキーはローカル状態のみで、どこにも送信しない
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlatformCredential {
    pub is_connected: bool,
    pub auto_publish: bool,
    pub api_key: String,
}

/// ブランド設定
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandConfig {
    pub company_background: String,
    pub target_audience: String,
    pub tone_of_voice: String,
    pub content_rules: String,
    pub credentials: BTreeMap<Platform, PlatformCredential>,
}

impl Default for BrandConfig {
    fn default() -> Self {
        let credentials = SOCIAL_PLATFORMS
            .iter()
            .map(|p| (*p, PlatformCredential::default()))
            .collect();
        Self {
            company_background: String::new(),
            target_audience: String::new(),
            tone_of_voice: String::new(),
            content_rules: String::new(),
            credentials,
        }
    }
}

impl BrandConfig {
    /// 接続済みプラットフォームを表示順で返す
    pub fn connected_platforms(&self) -> Vec<Platform> {
        SOCIAL_PLATFORMS
            .iter()
            .filter(|p| {
                self.credentials
                    .get(p)
                    .map(|c| c.is_connected)
                    .unwrap_or(false)
            })
            .copied()
            .collect()
    }

    pub fn connected_count(&self) -> usize {
        self.credentials.values().filter(|c| c.is_connected).count()
    }

    pub fn credential_mut(&mut self, platform: Platform) -> &mut PlatformCredential {
        self.credentials.entry(platform).or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_serialize() {
        let json = serde_json::to_string(&Platform::TikTok).expect("シリアライズ失敗");
        assert_eq!(json, r#""TikTok""#);
    }

    #[test]
    fn test_platform_deserialize() {
        let p: Platform = serde_json::from_str(r#""LinkedIn""#).expect("デシリアライズ失敗");
        assert_eq!(p, Platform::LinkedIn);
    }

    #[test]
    fn test_platform_from_str_case_insensitive() {
        assert_eq!("INSTAGRAM".parse::<Platform>().unwrap(), Platform::Instagram);
        assert_eq!("x".parse::<Platform>().unwrap(), Platform::Twitter);
        assert!("myspace".parse::<Platform>().is_err());
    }

    #[test]
    fn test_aspect_ratio_table() {
        assert_eq!(Platform::Instagram.aspect_ratio(), "1:1");
        assert_eq!(Platform::Facebook.aspect_ratio(), "4:3");
        assert_eq!(Platform::TikTok.aspect_ratio(), "9:16");
        assert_eq!(Platform::Twitter.aspect_ratio(), "16:9");
        assert_eq!(Platform::LinkedIn.aspect_ratio(), "16:9");
        assert_eq!(Platform::Email.aspect_ratio(), "1:1");
    }

    #[test]
    fn test_status_serialize_lowercase() {
        let json = serde_json::to_string(&PublicationStatus::Publishing).unwrap();
        assert_eq!(json, r#""publishing""#);
    }

    #[test]
    fn test_status_default_is_draft() {
        assert_eq!(PublicationStatus::default(), PublicationStatus::Draft);
    }

    #[test]
    fn test_post_deserialize_minimal() {
        // 必須フィールドのみでデシリアライズできることを確認
        let json = r##"{
            "platform": "Instagram",
            "content": "New drop!",
            "hashtags": ["#coffee"],
            "imagePrompt": "a cup of iced coffee"
        }"##;

        let post: GeneratedPost = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(post.platform, Platform::Instagram);
        assert_eq!(post.content, "New drop!");
        assert_eq!(post.hashtags, vec!["#coffee"]);
        assert_eq!(post.image_prompt, "a cup of iced coffee");
        assert_eq!(post.status, PublicationStatus::Draft); // デフォルト値
        assert!(post.subject.is_none());
        assert!(post.generated_image_url.is_none());
    }

    #[test]
    fn test_post_serialize_camel_case() {
        let post = GeneratedPost {
            platform: Platform::Twitter,
            subject: None,
            content: "hello".to_string(),
            hashtags: vec!["#a".to_string()],
            tips: Some("short and punchy".to_string()),
            image_prompt: "a beach".to_string(),
            generated_image_url: None,
            status: PublicationStatus::Draft,
        };

        let json = serde_json::to_string(&post).expect("シリアライズ失敗");
        assert!(json.contains("\"imagePrompt\":\"a beach\""));
        assert!(json.contains("\"status\":\"draft\""));
        // Noneのフィールドは出力しない
        assert!(!json.contains("generatedImageUrl"));
        assert!(!json.contains("subject"));
    }

    #[test]
    fn test_campaign_roundtrip() {
        let campaign = MarketingCampaign {
            strategic_insight: "Summer angle".to_string(),
            posts: vec![GeneratedPost {
                platform: Platform::Facebook,
                subject: None,
                content: "post".to_string(),
                hashtags: vec![],
                tips: None,
                image_prompt: "p".to_string(),
                generated_image_url: Some("data:image/jpeg;base64,xx".to_string()),
                status: PublicationStatus::Published,
            }],
        };

        let json = serde_json::to_string(&campaign).expect("シリアライズ失敗");
        assert!(json.contains("\"strategicInsight\":\"Summer angle\""));

        let restored: MarketingCampaign = serde_json::from_str(&json).expect("デシリアライズ失敗");
        assert_eq!(restored.posts.len(), 1);
        assert_eq!(restored.posts[0].status, PublicationStatus::Published);
        assert_eq!(
            restored.posts[0].generated_image_url.as_deref(),
            Some("data:image/jpeg;base64,xx")
        );
    }

    #[test]
    fn test_brand_config_default_credentials() {
        let config = BrandConfig::default();
        assert_eq!(config.credentials.len(), 5);
        assert!(config.credentials.contains_key(&Platform::Instagram));
        assert!(!config.credentials.contains_key(&Platform::Email));
        assert_eq!(config.connected_count(), 0);
        assert!(config.connected_platforms().is_empty());
    }

    #[test]
    fn test_connected_platforms_display_order() {
        let mut config = BrandConfig::default();
        config.credential_mut(Platform::TikTok).is_connected = true;
        config.credential_mut(Platform::Facebook).is_connected = true;

        // BTreeMapの順序ではなく表示順で返る
        assert_eq!(
            config.connected_platforms(),
            vec![Platform::Facebook, Platform::TikTok]
        );
        assert_eq!(config.connected_count(), 2);
    }

    #[test]
    fn test_brand_config_roundtrip() {
        let mut config = BrandConfig::default();
        config.company_background = "Indie coffee roaster".to_string();
        config.credential_mut(Platform::Instagram).is_connected = true;
        config.credential_mut(Platform::Instagram).api_key = "token".to_string();

        let json = serde_json::to_string(&config).expect("シリアライズ失敗");
        assert!(json.contains("\"companyBackground\":\"Indie coffee roaster\""));
        assert!(json.contains("\"isConnected\":true"));

        let restored: BrandConfig = serde_json::from_str(&json).expect("デシリアライズ失敗");
        assert!(restored.credentials[&Platform::Instagram].is_connected);
        assert_eq!(restored.credentials[&Platform::Instagram].api_key, "token");
    }
}
