//! APIレスポンスパーサー
//!
//! 戦略モデルのレスポンスからJSONを抽出し、
//! MarketingCampaignとしてパースする

use crate::error::{Error, Result};
use crate::types::{MarketingCampaign, Platform, PublicationStatus};

/// APIレスポンスからJSON部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 生の {...} オブジェクト
/// 3. エラー
pub fn extract_json(response: &str) -> Result<&str> {
    // ```json ... ``` ブロックを探す
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    // 生の {...} を探す
    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if end >= start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(Error::Parse("JSONが見つかりません".into()))
}

/// 戦略レスポンスをパース
///
/// - 各投稿は個別にデシリアライズし、不正なエントリは捨てる
/// - プラットフォームが要求セット外の投稿は捨てる（モデルの過剰生成対策）
/// - 同一プラットフォームは最初の1件のみ残す
/// - ステータスはレスポンスの値に関わらずDraftに強制する
pub fn parse_campaign_response(
    response: &str,
    requested: &[Platform],
) -> Result<MarketingCampaign> {
    let json_str = extract_json(response)?;
    let value: serde_json::Value = serde_json::from_str(json_str.trim())
        .map_err(|e| Error::Parse(format!("キャンペーンJSONパースエラー: {}", e)))?;

    let strategic_insight = value
        .get("strategicInsight")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    let raw_posts = value
        .get("posts")
        .and_then(|v| v.as_array())
        .ok_or_else(|| Error::Parse("postsが配列ではありません".into()))?;

    let mut posts = Vec::new();
    let mut seen: Vec<Platform> = Vec::new();

    for raw in raw_posts {
        // 個別パース失敗は投稿単位で捨てる
        let Ok(mut post) =
            serde_json::from_value::<crate::types::GeneratedPost>(raw.clone())
        else {
            continue;
        };

        if !requested.contains(&post.platform) {
            continue;
        }
        if seen.contains(&post.platform) {
            continue;
        }

        post.status = PublicationStatus::Draft;
        seen.push(post.platform);
        posts.push(post);
    }

    Ok(MarketingCampaign {
        strategic_insight,
        posts,
    })
}
