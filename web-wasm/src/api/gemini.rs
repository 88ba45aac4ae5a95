//! Gemini API連携
//!
//! 解析: gemini-2.5-flash（画像 + マーケティング視点プロンプト）
//! 戦略: gemini-3-pro-preview（responseSchema + thinkingBudget）
//! 画像: imagen-4.0 → imagen-3.0 → gemini-2.5-flash-image の3段フォールバック

use gloo::console;
use serde::{Deserialize, Serialize};
use socialsync_common::{
    build_strategy_prompt, campaign_response_schema, clean_image_prompt, enhance_fallback_prompt,
    parse_campaign_response, BrandConfig, MarketingCampaign, Platform, ANALYSIS_PROMPT,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const ANALYSIS_MODEL: &str = "gemini-2.5-flash";
const STRATEGY_MODEL: &str = "gemini-3-pro-preview";
const THINKING_BUDGET: u32 = 32768;

/// 画像生成バックエンド（優先順）
const IMAGE_BACKENDS: &[(&str, bool)] = &[
    // (モデル名, :predictエンドポイントか)
    ("imagen-4.0-generate-001", true),
    ("imagen-3.0-generate-001", true),
    ("gemini-2.5-flash-image", false),
];

/// Gemini APIリクエスト
#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Default, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,

    #[serde(rename = "responseSchema", skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,

    #[serde(rename = "thinkingConfig", skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,

    #[serde(rename = "responseModalities", skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<String>>,
}

#[derive(Serialize)]
struct ThinkingConfig {
    #[serde(rename = "thinkingBudget")]
    thinking_budget: u32,
}

/// Gemini APIレスポンス
#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Default, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,

    #[serde(default, rename = "inlineData", alias = "inline_data")]
    inline_data: Option<ResponseInlineData>,
}

#[derive(Deserialize)]
struct ResponseInlineData {
    #[serde(default, rename = "mimeType", alias = "mime_type")]
    mime_type: Option<String>,
    data: String,
}

/// Imagen系モデル（:predict）リクエスト/レスポンス
#[derive(Serialize)]
struct PredictRequest {
    instances: Vec<PredictInstance>,
    parameters: PredictParameters,
}

#[derive(Serialize)]
struct PredictInstance {
    prompt: String,
}

#[derive(Serialize)]
struct PredictParameters {
    #[serde(rename = "sampleCount")]
    sample_count: u32,
    #[serde(rename = "aspectRatio")]
    aspect_ratio: String,
    #[serde(rename = "outputMimeType")]
    output_mime_type: String,
}

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
struct Prediction {
    #[serde(default, rename = "bytesBase64Encoded")]
    bytes_base64_encoded: Option<String>,
    #[serde(default, rename = "mimeType")]
    mime_type: Option<String>,
}

/// Data URLからBase64データ部分を抽出
pub fn extract_base64_from_data_url(data_url: &str) -> Option<&str> {
    data_url.split(',').nth(1)
}

/// Data URLからMIMEタイプを抽出（失敗時はimage/jpeg）
pub fn extract_mime_type_from_data_url(data_url: &str) -> &str {
    data_url
        .split(':')
        .nth(1)
        .and_then(|s| s.split(';').next())
        .unwrap_or("image/jpeg")
}

/// POST JSON → JSONのfetch呼び出し共通処理
async fn post_json(url: &str, body: &str) -> Result<JsValue, JsValue> {
    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&JsValue::from_str(body));

    let request = Request::new_with_str_and_init(url, &opts)?;
    request.headers().set("Content-Type", "application/json")?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
    let resp: Response = resp_value.dyn_into()?;

    if !resp.ok() {
        return Err(JsValue::from_str(&format!("API error: {}", resp.status())));
    }

    JsFuture::from(resp.json()?).await
}

async fn call_generate_content(
    api_key: &str,
    model: &str,
    request: &GeminiRequest,
) -> Result<GeminiResponse, JsValue> {
    let url = format!(
        "{}/models/{}:generateContent?key={}",
        API_BASE_URL, model, api_key
    );
    let body = serde_json::to_string(request).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let json = post_json(&url, &body).await?;
    serde_wasm_bindgen::from_value(json).map_err(|e| JsValue::from_str(&e.to_string()))
}

async fn call_predict(
    api_key: &str,
    model: &str,
    request: &PredictRequest,
) -> Result<PredictResponse, JsValue> {
    let url = format!("{}/models/{}:predict?key={}", API_BASE_URL, model, api_key);
    let body = serde_json::to_string(request).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let json = post_json(&url, &body).await?;
    serde_wasm_bindgen::from_value(json).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn first_text(response: &GeminiResponse) -> Option<String> {
    response
        .candidates
        .first()?
        .parts_text()
}

impl Candidate {
    fn parts_text(&self) -> Option<String> {
        self.content
            .parts
            .iter()
            .find_map(|p| p.text.clone())
    }

    fn parts_image_data_url(&self) -> Option<String> {
        self.content.parts.iter().find_map(|p| {
            p.inline_data.as_ref().map(|d| {
                format!(
                    "data:{};base64,{}",
                    d.mime_type.as_deref().unwrap_or("image/png"),
                    d.data
                )
            })
        })
    }
}

/// 画像をマーケティング視点で解析する
pub async fn analyze_image(
    api_key: &str,
    base64_data: &str,
    mime_type: &str,
) -> Result<String, JsValue> {
    let request = GeminiRequest {
        contents: vec![Content {
            parts: vec![
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: mime_type.to_string(),
                        data: base64_data.to_string(),
                    },
                },
                Part::Text {
                    text: ANALYSIS_PROMPT.to_string(),
                },
            ],
        }],
        generation_config: None,
    };

    let response = call_generate_content(api_key, ANALYSIS_MODEL, &request).await?;
    first_text(&response).ok_or_else(|| JsValue::from_str("Empty response"))
}

/// 解析結果と指示からキャンペーンを生成する
pub async fn generate_campaign(
    api_key: &str,
    image_analysis: &str,
    user_instructions: &str,
    brand: &BrandConfig,
) -> Result<MarketingCampaign, JsValue> {
    let platforms = brand.connected_platforms();
    let prompt = build_strategy_prompt(image_analysis, user_instructions, brand, &platforms);

    let request = GeminiRequest {
        contents: vec![Content {
            parts: vec![Part::Text { text: prompt }],
        }],
        generation_config: Some(GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(campaign_response_schema()),
            thinking_config: Some(ThinkingConfig {
                thinking_budget: THINKING_BUDGET,
            }),
            ..Default::default()
        }),
    };

    let response = call_generate_content(api_key, STRATEGY_MODEL, &request).await?;
    let text = first_text(&response).ok_or_else(|| JsValue::from_str("Empty response"))?;

    parse_campaign_response(&text, &platforms)
        .map_err(|e| JsValue::from_str(&format!("Campaign parse error: {}", e)))
}

/// 投稿用画像を生成する（3段フォールバック）
///
/// 成功時はData URL。全バックエンド失敗時はNone（投稿自体は成立させる）
pub async fn generate_social_image(
    api_key: &str,
    image_prompt: &str,
    platform: Platform,
) -> Option<String> {
    let prompt = clean_image_prompt(image_prompt);
    let aspect_ratio = platform.aspect_ratio();

    for (model, is_predict) in IMAGE_BACKENDS {
        let result = if *is_predict {
            try_predict_image(api_key, model, prompt, aspect_ratio).await
        } else {
            let enhanced = enhance_fallback_prompt(prompt, aspect_ratio);
            try_multimodal_image(api_key, model, &enhanced).await
        };

        match result {
            Ok(url) => return Some(url),
            Err(e) => {
                console::warn!(format!("画像生成失敗 ({}): {:?}", model, e));
            }
        }
    }

    None
}

async fn try_predict_image(
    api_key: &str,
    model: &str,
    prompt: &str,
    aspect_ratio: &str,
) -> Result<String, JsValue> {
    let request = PredictRequest {
        instances: vec![PredictInstance {
            prompt: prompt.to_string(),
        }],
        parameters: PredictParameters {
            sample_count: 1,
            aspect_ratio: aspect_ratio.to_string(),
            output_mime_type: "image/jpeg".to_string(),
        },
    };

    let response = call_predict(api_key, model, &request).await?;

    response
        .predictions
        .iter()
        .find_map(|p| {
            p.bytes_base64_encoded.as_ref().map(|bytes| {
                format!(
                    "data:{};base64,{}",
                    p.mime_type.as_deref().unwrap_or("image/jpeg"),
                    bytes
                )
            })
        })
        .ok_or_else(|| JsValue::from_str("No image in response"))
}

async fn try_multimodal_image(api_key: &str, model: &str, prompt: &str) -> Result<String, JsValue> {
    let request = GeminiRequest {
        contents: vec![Content {
            parts: vec![Part::Text {
                text: prompt.to_string(),
            }],
        }],
        generation_config: Some(GenerationConfig {
            response_modalities: Some(vec!["IMAGE".to_string()]),
            ..Default::default()
        }),
    };

    let response = call_generate_content(api_key, model, &request).await?;

    response
        .candidates
        .first()
        .and_then(|c| c.parts_image_data_url())
        .ok_or_else(|| JsValue::from_str("No image in response"))
}
