//! プロンプト生成モジュール
//!
//! CLIとWeb(WASM)で共有されるプロンプト生成ロジック:
//! - ANALYSIS_PROMPT: 画像解析用の固定プロンプト
//! - build_strategy_prompt: 戦略生成用プロンプト
//! - campaign_response_schema: 戦略生成のレスポンススキーマ
//! - clean_image_prompt: 画像生成プロンプトの前処理

use crate::types::{BrandConfig, Platform};
use serde_json::{json, Value};

/// 画像解析用の固定プロンプト（Step1）
pub const ANALYSIS_PROMPT: &str = "Analyze this image in extreme detail for a marketing campaign. \
Describe visual elements, mood, colors, lighting, objects, people, and any text present. \
Focus on details that would be relevant for creating engaging social media content.";

/// 戦略生成プロンプト（Step2）
///
/// 画像解析テキスト、ユーザー指示、ブランド設定から
/// 接続済みプラットフォーム分の投稿をJSONで要求する
pub fn build_strategy_prompt(
    image_analysis: &str,
    user_instructions: &str,
    brand: &BrandConfig,
    platforms: &[Platform],
) -> String {
    let platform_list = platforms
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let or_default = |value: &str, fallback: &str| -> String {
        if value.trim().is_empty() {
            fallback.to_string()
        } else {
            value.to_string()
        }
    };

    format!(
        r#"ACT AS A WORLD-CLASS CREATIVE DIRECTOR AND SOCIAL MEDIA STRATEGIST.

CONTEXT:
The user has provided an image (described below), specific instructions, and brand guidelines.
Your goal is to create a high-impact social media content package including visual direction.

IMAGE DESCRIPTION:
{image_analysis}

COMPANY BACKGROUND:
{company}

TARGET AUDIENCE:
{audience}

TONE OF VOICE:
{tone}

STRICT CONTENT GENERATION RULES:
{rules}

CAMPAIGN INSTRUCTIONS:
{user_instructions}

TASK:
Create professional social media posts ONLY for the following platforms: {platform_list}.

PLATFORM GUIDES:
- Instagram: Focus on visual storytelling, engaging captions.
- LinkedIn: Professional tone, industry insights, value-driven.
- Twitter: Punchy, thread-style if complex, viral potential.
- TikTok: Short, engaging script concept or caption for a video.
- Facebook: Community focused, engaging.
- Email: Subject line (in 'subject' field) + Body content. Warm, personal, conversion-focused. No hashtags.

REQUIREMENTS:
- Detect the language of the User Instructions/Company Info. If they are in Italian, generate the response in Italian. If English, use English.
- Provide a "Strategic Insight" explaining the overall campaign angle.
- For each requested platform, provide the content text, relevant hashtags (except Email), AND a specific "imagePrompt".
- The "imagePrompt" will be used to generate a NEW AI image for that specific post. It should describe a high-quality, photorealistic image that fits the platform's aesthetic AND keeps the visual identity/theme of the original image.
- CRITICAL: The "imagePrompt" MUST be a direct visual description (e.g. "A sunny beach with a coffee cup", NOT "Generate an image of...").

JSON SCHEMA:
Return ONLY valid JSON matching the schema below."#,
        company = or_default(&brand.company_background, "Not specified."),
        audience = or_default(&brand.target_audience, "General audience."),
        tone = or_default(&brand.tone_of_voice, "Professional but engaging."),
        rules = or_default(
            &brand.content_rules,
            "Standard professional marketing best practices."
        ),
    )
}

/// 戦略生成のレスポンススキーマ（generationConfig.responseSchemaに渡す）
pub fn campaign_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "strategicInsight": {
                "type": "STRING",
                "description": "Overall strategic direction and why this approach works."
            },
            "posts": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "platform": {
                            "type": "STRING",
                            "enum": ["Instagram", "LinkedIn", "Twitter", "Facebook", "TikTok", "Email"]
                        },
                        "subject": {
                            "type": "STRING",
                            "description": "Email Subject line (Only for Email platform)"
                        },
                        "content": {
                            "type": "STRING",
                            "description": "The post caption or email body."
                        },
                        "hashtags": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" },
                            "description": "A list of 5-15 relevant hashtags (Empty for Email)."
                        },
                        "tips": {
                            "type": "STRING",
                            "description": "Brief specific tip for this platform post."
                        },
                        "imagePrompt": {
                            "type": "STRING",
                            "description": "A detailed prompt to generate a photorealistic image for this post. It should be based on the original image theme but optimized for the platform."
                        }
                    },
                    "required": ["platform", "content", "hashtags", "imagePrompt"]
                }
            }
        },
        "required": ["strategicInsight", "posts"]
    })
}

const PROMPT_VERBS: &[&str] = &["create", "generate", "make", "draw", "render"];
const PROMPT_ARTICLES: &[&str] = &["a", "an"];
const PROMPT_NOUNS: &[&str] = &["image", "photo", "picture", "visual"];

/// 画像生成プロンプトの前処理
///
/// 画像モデルを混乱させる会話調の前置き
/// （"Create an image of ..."等）を除去する。
/// 除去対象がなければ前後の空白を削っただけの文字列を返す
pub fn clean_image_prompt(prompt: &str) -> &str {
    let trimmed = prompt.trim();

    let mut rest = trimmed;
    let Some(after_verb) = strip_word(rest, PROMPT_VERBS) else {
        return trimmed;
    };
    rest = after_verb;

    // 冠詞は任意
    if let Some(after_article) = strip_word(rest, PROMPT_ARTICLES) {
        rest = after_article;
    }

    let Some(after_noun) = strip_word(rest, PROMPT_NOUNS) else {
        return trimmed;
    };
    rest = after_noun;

    match strip_word(rest, &["of"]) {
        Some(after_of) => after_of.trim_start(),
        None => trimmed,
    }
}

/// 先頭語が候補のいずれかに一致すれば（大文字小文字無視）残りを返す
fn strip_word<'a>(text: &'a str, candidates: &[&str]) -> Option<&'a str> {
    let text = text.trim_start();
    let word_len = text.find(char::is_whitespace)?;
    let word = &text[..word_len];
    if candidates.iter().any(|c| word.eq_ignore_ascii_case(c)) {
        Some(&text[word_len..])
    } else {
        None
    }
}

/// 第3ティア（汎用マルチモーダル）用のプロンプト
///
/// アスペクト比をパラメータで渡せないため本文に織り込む
pub fn enhance_fallback_prompt(clean_prompt: &str, aspect_ratio: &str) -> String {
    format!(
        "High quality photorealistic image. Aspect ratio {}. {}",
        aspect_ratio.replace(':', " by "),
        clean_prompt
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SOCIAL_PLATFORMS;

    fn brand() -> BrandConfig {
        let mut b = BrandConfig::default();
        b.company_background = "Organic cold brew startup".to_string();
        b.tone_of_voice = "Energetic".to_string();
        b
    }

    // =============================================
    // build_strategy_prompt テスト
    // =============================================

    #[test]
    fn test_build_strategy_prompt_contains_inputs() {
        let prompt = build_strategy_prompt(
            "A glass of iced coffee on a wooden table",
            "Summer launch campaign",
            &brand(),
            &[Platform::Instagram, Platform::Twitter],
        );

        assert!(prompt.contains("A glass of iced coffee"));
        assert!(prompt.contains("Summer launch campaign"));
        assert!(prompt.contains("Organic cold brew startup"));
        assert!(prompt.contains("Energetic"));
        assert!(prompt.contains("ONLY for the following platforms: Instagram, Twitter"));
    }

    #[test]
    fn test_build_strategy_prompt_defaults_for_empty_brand() {
        let prompt = build_strategy_prompt(
            "analysis",
            "instructions",
            &BrandConfig::default(),
            SOCIAL_PLATFORMS,
        );

        assert!(prompt.contains("Not specified."));
        assert!(prompt.contains("General audience."));
        assert!(prompt.contains("Professional but engaging."));
        assert!(prompt.contains("Standard professional marketing best practices."));
    }

    #[test]
    fn test_build_strategy_prompt_requests_json_only() {
        let prompt =
            build_strategy_prompt("a", "b", &BrandConfig::default(), &[Platform::Instagram]);
        assert!(prompt.contains("Return ONLY valid JSON"));
        assert!(prompt.contains("\"imagePrompt\""));
    }

    // =============================================
    // campaign_response_schema テスト
    // =============================================

    #[test]
    fn test_schema_required_fields() {
        let schema = campaign_response_schema();
        assert_eq!(schema["required"][0], "strategicInsight");
        assert_eq!(schema["required"][1], "posts");

        let post_required = &schema["properties"]["posts"]["items"]["required"];
        let required: Vec<&str> = post_required
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(required, vec!["platform", "content", "hashtags", "imagePrompt"]);
    }

    #[test]
    fn test_schema_platform_enum() {
        let schema = campaign_response_schema();
        let enum_values =
            &schema["properties"]["posts"]["items"]["properties"]["platform"]["enum"];
        assert_eq!(enum_values.as_array().unwrap().len(), 6);
        assert!(enum_values.as_array().unwrap().contains(&json!("Email")));
    }

    // =============================================
    // clean_image_prompt テスト
    // =============================================

    #[test]
    fn test_clean_image_prompt_strips_prefix() {
        assert_eq!(
            clean_image_prompt("Create an image of a sunny beach with a coffee cup"),
            "a sunny beach with a coffee cup"
        );
        assert_eq!(
            clean_image_prompt("generate a photo of mountains at dusk"),
            "mountains at dusk"
        );
        assert_eq!(
            clean_image_prompt("Render visual of neon city"),
            "neon city"
        );
    }

    #[test]
    fn test_clean_image_prompt_case_insensitive() {
        assert_eq!(
            clean_image_prompt("DRAW AN IMAGE OF a red door"),
            "a red door"
        );
    }

    #[test]
    fn test_clean_image_prompt_no_prefix() {
        // 前置きがなければそのまま
        assert_eq!(
            clean_image_prompt("A sunny beach with a coffee cup"),
            "A sunny beach with a coffee cup"
        );
        // 名詞だけ・動詞だけでは除去しない
        assert_eq!(clean_image_prompt("image of a cat"), "image of a cat");
        assert_eq!(clean_image_prompt("create chaos"), "create chaos");
    }

    #[test]
    fn test_clean_image_prompt_trims_whitespace() {
        assert_eq!(clean_image_prompt("  plain prompt  "), "plain prompt");
    }

    // =============================================
    // enhance_fallback_prompt テスト
    // =============================================

    #[test]
    fn test_enhance_fallback_prompt() {
        let enhanced = enhance_fallback_prompt("a beach", "16:9");
        assert_eq!(
            enhanced,
            "High quality photorealistic image. Aspect ratio 16 by 9. a beach"
        );
    }
}
