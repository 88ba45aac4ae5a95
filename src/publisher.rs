//! 公開シミュレータ
//!
//! 実際のSNS APIは呼ばず、固定ディレイで公開処理を模擬する。
//! ステータス遷移は Draft → Publishing → Published のみ

use crate::error::{Result, SocialSyncError};
use socialsync_common::{campaign, MarketingCampaign, Platform, PublicationStatus};
use std::time::Duration;

/// 単体公開のディレイ
pub const SINGLE_PUBLISH_DELAY_MS: u64 = 2000;
/// 一括公開時の1投稿あたりのディレイ
pub const BULK_PUBLISH_DELAY_MS: u64 = 1500;

/// 1投稿を公開する
///
/// 下書き以外（公開中・公開済み）は対象外としてエラー
pub async fn publish_one(campaign: &mut MarketingCampaign, platform: Platform) -> Result<()> {
    let is_draft = campaign
        .posts
        .iter()
        .any(|p| p.platform == platform && p.status == PublicationStatus::Draft);
    if !is_draft {
        return Err(SocialSyncError::Config(format!(
            "{} に公開できる下書きがありません",
            platform
        )));
    }

    campaign::set_status(campaign, platform, PublicationStatus::Publishing);
    tokio::time::sleep(Duration::from_millis(SINGLE_PUBLISH_DELAY_MS)).await;
    campaign::set_status(campaign, platform, PublicationStatus::Published);
    Ok(())
}

/// 全下書きを一括公開する
///
/// 開始時点の下書きをスナップショットして一斉にPublishingへ遷移し、
/// その後1件ずつ順番にPublishedへ確定する。
/// 公開したプラットフォームの一覧を返す
pub async fn publish_all(campaign: &mut MarketingCampaign) -> Vec<Platform> {
    let drafts = campaign::mark_drafts_publishing(campaign);

    for platform in &drafts {
        tokio::time::sleep(Duration::from_millis(BULK_PUBLISH_DELAY_MS)).await;
        campaign::set_status(campaign, *platform, PublicationStatus::Published);
    }

    drafts
}

#[cfg(test)]
mod tests {
    use super::*;
    use socialsync_common::types::GeneratedPost;

    fn post(platform: Platform, status: PublicationStatus) -> GeneratedPost {
        GeneratedPost {
            platform,
            subject: None,
            content: "body".to_string(),
            hashtags: vec![],
            tips: None,
            image_prompt: "p".to_string(),
            generated_image_url: None,
            status,
        }
    }

    fn campaign_with(statuses: &[(Platform, PublicationStatus)]) -> MarketingCampaign {
        MarketingCampaign {
            strategic_insight: "insight".to_string(),
            posts: statuses.iter().map(|(p, s)| post(*p, *s)).collect(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_publish_one_transitions() {
        let mut c = campaign_with(&[
            (Platform::Instagram, PublicationStatus::Draft),
            (Platform::Twitter, PublicationStatus::Draft),
        ]);

        publish_one(&mut c, Platform::Instagram).await.unwrap();

        assert_eq!(c.posts[0].status, PublicationStatus::Published);
        // 他の投稿は下書きのまま
        assert_eq!(c.posts[1].status, PublicationStatus::Draft);
    }

    #[tokio::test(start_paused = true)]
    async fn test_publish_one_rejects_published() {
        let mut c = campaign_with(&[(Platform::Instagram, PublicationStatus::Published)]);
        let result = publish_one(&mut c, Platform::Instagram).await;
        assert!(result.is_err());
        assert_eq!(c.posts[0].status, PublicationStatus::Published);
    }

    #[tokio::test(start_paused = true)]
    async fn test_publish_one_rejects_missing_platform() {
        let mut c = campaign_with(&[(Platform::Instagram, PublicationStatus::Draft)]);
        assert!(publish_one(&mut c, Platform::TikTok).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_publish_all_only_drafts() {
        let mut c = campaign_with(&[
            (Platform::Instagram, PublicationStatus::Draft),
            (Platform::Facebook, PublicationStatus::Published),
            (Platform::Twitter, PublicationStatus::Draft),
        ]);

        let published = publish_all(&mut c).await;

        assert_eq!(published, vec![Platform::Instagram, Platform::Twitter]);
        assert_eq!(c.posts[0].status, PublicationStatus::Published);
        assert_eq!(c.posts[1].status, PublicationStatus::Published);
        assert_eq!(c.posts[2].status, PublicationStatus::Published);
    }

    #[tokio::test(start_paused = true)]
    async fn test_publish_all_empty() {
        let mut c = campaign_with(&[(Platform::Instagram, PublicationStatus::Published)]);
        let published = publish_all(&mut c).await;
        assert!(published.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_publish_delays() {
        // 一括公開は 1件あたり1500ms
        let mut c = campaign_with(&[
            (Platform::Instagram, PublicationStatus::Draft),
            (Platform::Twitter, PublicationStatus::Draft),
        ]);

        let start = tokio::time::Instant::now();
        publish_all(&mut c).await;
        assert_eq!(start.elapsed(), Duration::from_millis(BULK_PUBLISH_DELAY_MS * 2));
    }
}
