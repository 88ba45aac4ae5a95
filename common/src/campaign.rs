//! キャンペーンストア操作（CLI/WASM共通）
//!
//! キャンペーンへの変更はすべてプラットフォームをキーにした
//! 部分更新で行う。画像生成の完了が遅れて届いても、
//! 他の投稿への編集を巻き戻さないための規約をここで強制する

use crate::types::{GeneratedPost, MarketingCampaign, Platform, PublicationStatus};

/// 指定プラットフォームの投稿だけに関数を適用する
///
/// 他の投稿には一切触れない。該当投稿があればtrueを返す
pub fn update_post<F>(campaign: &mut MarketingCampaign, platform: Platform, f: F) -> bool
where
    F: FnOnce(&mut GeneratedPost),
{
    match campaign.posts.iter_mut().find(|p| p.platform == platform) {
        Some(post) => {
            f(post);
            true
        }
        None => false,
    }
}

/// キャプションを差し替える（検証なしの直接置換）
pub fn set_content(campaign: &mut MarketingCampaign, platform: Platform, content: &str) -> bool {
    update_post(campaign, platform, |p| p.content = content.to_string())
}

/// 生成済み画像を設定する
pub fn set_generated_image(
    campaign: &mut MarketingCampaign,
    platform: Platform,
    image_url: String,
) -> bool {
    update_post(campaign, platform, |p| {
        p.generated_image_url = Some(image_url)
    })
}

/// 公開ステータスを設定する
pub fn set_status(
    campaign: &mut MarketingCampaign,
    platform: Platform,
    status: PublicationStatus,
) -> bool {
    update_post(campaign, platform, |p| p.status = status)
}

/// ハッシュタグ編集テキストを再パースする
///
/// 空白・改行で分割し、#で始まるトークンだけを残す。
/// 順序は保持し、重複は除去しない
pub fn parse_hashtags(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter(|t| t.starts_with('#'))
        .map(|t| t.to_string())
        .collect()
}

/// ハッシュタグ編集を適用する
pub fn set_hashtags_from_text(
    campaign: &mut MarketingCampaign,
    platform: Platform,
    text: &str,
) -> bool {
    let tags = parse_hashtags(text);
    update_post(campaign, platform, |p| p.hashtags = tags)
}

/// 下書き状態の投稿のプラットフォーム一覧（投稿順）
pub fn draft_platforms(campaign: &MarketingCampaign) -> Vec<Platform> {
    campaign
        .posts
        .iter()
        .filter(|p| p.status == PublicationStatus::Draft)
        .map(|p| p.platform)
        .collect()
}

pub fn has_drafts(campaign: &MarketingCampaign) -> bool {
    campaign
        .posts
        .iter()
        .any(|p| p.status == PublicationStatus::Draft)
}

/// 一括公開の開始: 現在の下書きをスナップショットし、
/// それらを一斉にPublishingへ遷移させる。
/// 下書き以外の投稿には触れない
pub fn mark_drafts_publishing(campaign: &mut MarketingCampaign) -> Vec<Platform> {
    let drafts = draft_platforms(campaign);
    for platform in &drafts {
        set_status(campaign, *platform, PublicationStatus::Publishing);
    }
    drafts
}
