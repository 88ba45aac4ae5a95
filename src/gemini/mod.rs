//! Gemini APIクライアント
//!
//! 画像解析（gemini-2.5-flash）、キャンペーン生成（gemini-3-pro-preview）、
//! 画像生成（Imagen 4 → Imagen 3 → gemini-2.5-flash-image の3段フォールバック）

pub mod types;

use crate::error::{Result, SocialSyncError};
use socialsync_common::{
    build_strategy_prompt, campaign_response_schema, clean_image_prompt, enhance_fallback_prompt,
    parse_campaign_response, BrandConfig, MarketingCampaign, ANALYSIS_PROMPT,
};
use types::{
    Content, GeminiRequest, GeminiResponse, GenerationConfig, InlineData, Part, PredictInstance,
    PredictParameters, PredictRequest, PredictResponse, ThinkingConfig,
};

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// 画像解析用モデル
const ANALYSIS_MODEL: &str = "gemini-2.5-flash";
/// キャンペーン生成用モデル
const STRATEGY_MODEL: &str = "gemini-3-pro-preview";
/// キャンペーン生成時の思考トークン上限
const THINKING_BUDGET: u32 = 32768;

/// 画像生成バックエンドの呼び出し方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageApi {
    /// Imagen系の`:predict`エンドポイント
    Predict,
    /// マルチモーダルGeminiの`:generateContent`エンドポイント
    Multimodal,
}

/// 画像生成バックエンド（優先順）
pub struct ImageBackend {
    pub model: &'static str,
    pub api: ImageApi,
}

/// 上から順に試し、最初に成功したものを採用する
pub const IMAGE_BACKENDS: &[ImageBackend] = &[
    ImageBackend {
        model: "imagen-4.0-generate-001",
        api: ImageApi::Predict,
    },
    ImageBackend {
        model: "imagen-3.0-generate-001",
        api: ImageApi::Predict,
    },
    ImageBackend {
        model: "gemini-2.5-flash-image",
        api: ImageApi::Multimodal,
    },
];

/// バックエンドを順に試し、最初に成功した画像を返す
///
/// 全滅した場合はNone（画像生成の失敗はキャンペーン全体を止めない）
pub fn first_successful_image<F>(backends: &[ImageBackend], mut try_backend: F) -> Option<String>
where
    F: FnMut(&ImageBackend) -> std::result::Result<String, String>,
{
    backends.iter().find_map(|b| try_backend(b).ok())
}

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    verbose: bool,
}

impl GeminiClient {
    pub fn new(api_key: String, verbose: bool) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            verbose,
        }
    }

    /// アップロード画像をマーケティング視点で解析する
    pub async fn analyze_image(&self, base64: &str, mime_type: &str) -> Result<String> {
        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: mime_type.to_string(),
                            data: base64.to_string(),
                        },
                    },
                    Part::Text {
                        text: ANALYSIS_PROMPT.to_string(),
                    },
                ],
            }],
            generation_config: None,
        };

        let response = self
            .generate_content(ANALYSIS_MODEL, &request)
            .await
            .map_err(|e| {
                if self.verbose {
                    eprintln!("画像解析エラー: {}", e);
                }
                SocialSyncError::AnalysisFailed
            })?;

        response
            .first_text()
            .map(str::to_string)
            .ok_or(SocialSyncError::AnalysisFailed)
    }

    /// 解析結果と指示からキャンペーンJSONを生成する
    pub async fn generate_campaign(
        &self,
        image_analysis: &str,
        user_instructions: &str,
        brand: &BrandConfig,
    ) -> Result<MarketingCampaign> {
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

        let response = self
            .generate_content(STRATEGY_MODEL, &request)
            .await
            .map_err(|e| {
                if self.verbose {
                    eprintln!("キャンペーン生成エラー: {}", e);
                }
                SocialSyncError::GenerationFailed
            })?;

        let text = response.first_text().ok_or(SocialSyncError::GenerationFailed)?;

        parse_campaign_response(text, &platforms).map_err(|e| {
            if self.verbose {
                eprintln!("キャンペーンのパースエラー: {}", e);
            }
            SocialSyncError::GenerationFailed
        })
    }

    /// 投稿用画像を生成する（3段フォールバック）
    ///
    /// 成功時はData URL、全バックエンド失敗時はNone
    pub async fn generate_social_image(&self, image_prompt: &str, aspect_ratio: &str) -> Option<String> {
        let prompt = clean_image_prompt(image_prompt);

        for backend in IMAGE_BACKENDS {
            let result = match backend.api {
                ImageApi::Predict => self.predict_image(backend.model, prompt, aspect_ratio).await,
                ImageApi::Multimodal => {
                    let enhanced = enhance_fallback_prompt(prompt, aspect_ratio);
                    self.multimodal_image(backend.model, &enhanced).await
                }
            };

            match result {
                Ok(url) => {
                    if self.verbose {
                        println!("画像生成成功: {}", backend.model);
                    }
                    return Some(url);
                }
                Err(e) => {
                    if self.verbose {
                        eprintln!("⚠ 画像生成失敗 ({}): {}", backend.model, e);
                    }
                }
            }
        }

        None
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &GeminiRequest,
    ) -> Result<GeminiResponse> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            API_BASE_URL, model, self.api_key
        );

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| SocialSyncError::ApiCall(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(SocialSyncError::ApiCall(format!(
                "{} ({}): {}",
                model, status, text
            )));
        }

        response
            .json::<GeminiResponse>()
            .await
            .map_err(|e| SocialSyncError::ApiParse(e.to_string()))
    }

    async fn predict_image(
        &self,
        model: &str,
        prompt: &str,
        aspect_ratio: &str,
    ) -> Result<String> {
        let url = format!(
            "{}/models/{}:predict?key={}",
            API_BASE_URL, model, self.api_key
        );

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

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SocialSyncError::ApiCall(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(SocialSyncError::ApiCall(format!(
                "{} ({}): {}",
                model, status, text
            )));
        }

        let payload = response
            .json::<PredictResponse>()
            .await
            .map_err(|e| SocialSyncError::ApiParse(e.to_string()))?;

        payload
            .first_image_data_url()
            .ok_or_else(|| SocialSyncError::ApiParse(format!("{}: 画像が含まれていません", model)))
    }

    async fn multimodal_image(&self, model: &str, prompt: &str) -> Result<String> {
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

        let response = self.generate_content(model, &request).await?;

        response
            .first_image_data_url()
            .ok_or_else(|| SocialSyncError::ApiParse(format!("{}: 画像が含まれていません", model)))
    }
}
