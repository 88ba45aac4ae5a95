//! SocialSync Common Library
//!
//! CLIとWeb(WASM)で共有される型とユーティリティ

pub mod campaign;
pub mod error;
pub mod parser;
pub mod prompts;
pub mod types;

pub use campaign::{
    draft_platforms, has_drafts, mark_drafts_publishing, parse_hashtags, set_content,
    set_generated_image, set_hashtags_from_text, set_status, update_post,
};
pub use error::{Error, Result};
pub use parser::{extract_json, parse_campaign_response};
pub use prompts::{
    build_strategy_prompt, campaign_response_schema, clean_image_prompt, enhance_fallback_prompt,
    ANALYSIS_PROMPT,
};
pub use types::{
    BrandConfig, GeneratedPost, MarketingCampaign, Platform, PlatformCredential,
    PublicationStatus, SOCIAL_PLATFORMS,
};
