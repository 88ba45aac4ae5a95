//! キャンペーン生成パイプライン
//!
//! 画像解析 → 戦略生成 → 投稿ごとの画像生成（並列・失敗許容）

use crate::error::{Result, SocialSyncError};
use crate::gemini::GeminiClient;
use crate::intake::ImagePayload;
use socialsync_common::{campaign, BrandConfig, MarketingCampaign, Platform};
use std::sync::Arc;
use tokio::task::JoinSet;

/// 画像と指示からキャンペーンを生成する
///
/// 接続済みプラットフォームがない場合はAPIを呼ばずにエラーを返す
pub async fn generate_campaign(
    client: &GeminiClient,
    image: &ImagePayload,
    user_instructions: &str,
    brand: &BrandConfig,
) -> Result<MarketingCampaign> {
    if brand.connected_platforms().is_empty() {
        return Err(SocialSyncError::NoPlatformsConnected);
    }

    let analysis = client.analyze_image(&image.base64, &image.mime_type).await?;
    client.generate_campaign(&analysis, user_instructions, brand).await
}

/// 各投稿の画像を並列生成してキャンペーンへマージする
///
/// 個々の失敗は飲み込む。画像が付かない投稿はそのまま残る
pub async fn generate_images(client: Arc<GeminiClient>, campaign: &mut MarketingCampaign) {
    let mut tasks: JoinSet<(Platform, Option<String>)> = JoinSet::new();

    for post in &campaign.posts {
        let client = Arc::clone(&client);
        let platform = post.platform;
        let prompt = post.image_prompt.clone();

        tasks.spawn(async move {
            let url = client
                .generate_social_image(&prompt, platform.aspect_ratio())
                .await;
            (platform, url)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((platform, Some(url))) => {
                campaign::set_generated_image(campaign, platform, url);
            }
            Ok((_, None)) => {}
            Err(e) => {
                eprintln!("⚠ 画像生成タスクの失敗: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use socialsync_common::types::{GeneratedPost, PublicationStatus};

    fn post(platform: Platform) -> GeneratedPost {
        GeneratedPost {
            platform,
            subject: None,
            content: "本文".to_string(),
            hashtags: vec!["#tag".to_string()],
            tips: None,
            image_prompt: "a product shot".to_string(),
            generated_image_url: None,
            status: PublicationStatus::Draft,
        }
    }

    #[tokio::test]
    async fn test_generate_campaign_requires_connection() {
        let brand = BrandConfig::default();

        let client = GeminiClient::new("dummy-key".to_string(), false);
        let image = ImagePayload {
            file_name: "photo.png".to_string(),
            mime_type: "image/png".to_string(),
            base64: "aGVsbG8=".to_string(),
        };

        let result = generate_campaign(&client, &image, "", &brand).await;
        assert!(matches!(result, Err(SocialSyncError::NoPlatformsConnected)));
    }

    #[tokio::test]
    async fn test_generate_images_keyed_merge() {
        // 生成完了が編集後に届いても、画像フィールドだけが更新されること
        let mut campaign = MarketingCampaign {
            strategic_insight: "insight".to_string(),
            posts: vec![post(Platform::Instagram), post(Platform::Twitter)],
        };

        campaign::set_content(&mut campaign, Platform::Instagram, "編集済み本文");
        campaign::set_generated_image(
            &mut campaign,
            Platform::Instagram,
            "data:image/jpeg;base64,late".to_string(),
        );

        let instagram = &campaign.posts[0];
        assert_eq!(instagram.content, "編集済み本文");
        assert_eq!(
            instagram.generated_image_url.as_deref(),
            Some("data:image/jpeg;base64,late")
        );
        assert!(campaign.posts[1].generated_image_url.is_none());
    }
}
