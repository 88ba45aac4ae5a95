//! Gemini APIのリクエスト/レスポンス型

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// generateContentリクエスト
#[derive(Serialize)]
pub struct GeminiRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Default, Serialize)]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,

    #[serde(rename = "responseSchema", skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,

    #[serde(rename = "thinkingConfig", skip_serializing_if = "Option::is_none")]
    pub thinking_config: Option<ThinkingConfig>,

    #[serde(rename = "responseModalities", skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct ThinkingConfig {
    #[serde(rename = "thinkingBudget")]
    pub thinking_budget: u32,
}

/// generateContentレスポンス
#[derive(Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
pub struct Candidate {
    pub content: ResponseContent,
}

#[derive(Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Default, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,

    #[serde(default, rename = "inlineData", alias = "inline_data")]
    pub inline_data: Option<ResponseInlineData>,
}

#[derive(Deserialize)]
pub struct ResponseInlineData {
    #[serde(default, rename = "mimeType", alias = "mime_type")]
    pub mime_type: Option<String>,
    pub data: String,
}

impl GeminiResponse {
    /// 最初のテキストパートを取り出す
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .parts
            .iter()
            .find_map(|p| p.text.as_deref())
    }

    /// 最初の画像パートをData URLとして取り出す
    pub fn first_image_data_url(&self) -> Option<String> {
        self.candidates.first()?.content.parts.iter().find_map(|p| {
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

/// Imagen系モデル（:predict）リクエスト
#[derive(Serialize)]
pub struct PredictRequest {
    pub instances: Vec<PredictInstance>,
    pub parameters: PredictParameters,
}

#[derive(Serialize)]
pub struct PredictInstance {
    pub prompt: String,
}

#[derive(Serialize)]
pub struct PredictParameters {
    #[serde(rename = "sampleCount")]
    pub sample_count: u32,

    #[serde(rename = "aspectRatio")]
    pub aspect_ratio: String,

    #[serde(rename = "outputMimeType")]
    pub output_mime_type: String,
}

/// Imagen系モデル（:predict）レスポンス
#[derive(Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
pub struct Prediction {
    #[serde(default, rename = "bytesBase64Encoded")]
    pub bytes_base64_encoded: Option<String>,

    #[serde(default, rename = "mimeType")]
    pub mime_type: Option<String>,
}

impl PredictResponse {
    /// 最初の生成画像をData URLとして取り出す
    pub fn first_image_data_url(&self) -> Option<String> {
        self.predictions.iter().find_map(|p| {
            p.bytes_base64_encoded.as_ref().map(|bytes| {
                format!(
                    "data:{};base64,{}",
                    p.mime_type.as_deref().unwrap_or("image/jpeg"),
                    bytes
                )
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_request_serialize() {
        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part::Text {
                    text: "テストプロンプト".to_string(),
                }],
            }],
            generation_config: Some(GenerationConfig {
                temperature: Some(0.1),
                response_mime_type: Some("application/json".to_string()),
                ..Default::default()
            }),
        };

        let json = serde_json::to_string(&request).expect("シリアライズ失敗");
        assert!(json.contains("\"contents\""));
        assert!(json.contains("\"generationConfig\""));
        assert!(json.contains("\"responseMimeType\":\"application/json\""));
        // 未設定のフィールドは出力しない
        assert!(!json.contains("thinkingConfig"));
        assert!(!json.contains("responseModalities"));
    }

    #[test]
    fn test_part_inline_data_serialize() {
        let part = Part::InlineData {
            inline_data: InlineData {
                mime_type: "image/jpeg".to_string(),
                data: "base64data".to_string(),
            },
        };
        let json = serde_json::to_string(&part).expect("シリアライズ失敗");
        assert!(json.contains("\"inline_data\""));
        assert!(json.contains("\"mime_type\":\"image/jpeg\""));
    }

    #[test]
    fn test_thinking_config_serialize() {
        let config = GenerationConfig {
            thinking_config: Some(ThinkingConfig {
                thinking_budget: 32768,
            }),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).expect("シリアライズ失敗");
        assert!(json.contains("\"thinkingConfig\":{\"thinkingBudget\":32768}"));
    }

    #[test]
    fn test_gemini_response_text() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [{ "text": "{\"strategicInsight\": \"x\"}" }]
                }
            }]
        }"#;

        let response: GeminiResponse = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(response.first_text(), Some("{\"strategicInsight\": \"x\"}"));
        assert!(response.first_image_data_url().is_none());
    }

    #[test]
    fn test_gemini_response_image() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "here is your image" },
                        { "inlineData": { "mimeType": "image/png", "data": "abc123" } }
                    ]
                }
            }]
        }"#;

        let response: GeminiResponse = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(
            response.first_image_data_url().as_deref(),
            Some("data:image/png;base64,abc123")
        );
    }

    #[test]
    fn test_gemini_response_empty() {
        let response: GeminiResponse = serde_json::from_str("{}").expect("デシリアライズ失敗");
        assert!(response.first_text().is_none());
    }

    #[test]
    fn test_predict_request_serialize() {
        let request = PredictRequest {
            instances: vec![PredictInstance {
                prompt: "a beach".to_string(),
            }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: "16:9".to_string(),
                output_mime_type: "image/jpeg".to_string(),
            },
        };

        let json = serde_json::to_string(&request).expect("シリアライズ失敗");
        assert!(json.contains("\"sampleCount\":1"));
        assert!(json.contains("\"aspectRatio\":\"16:9\""));
        assert!(json.contains("\"outputMimeType\":\"image/jpeg\""));
    }

    #[test]
    fn test_predict_response_image() {
        let json = r#"{
            "predictions": [{ "bytesBase64Encoded": "xyz", "mimeType": "image/jpeg" }]
        }"#;

        let response: PredictResponse = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(
            response.first_image_data_url().as_deref(),
            Some("data:image/jpeg;base64,xyz")
        );
    }

    #[test]
    fn test_predict_response_no_image() {
        let response: PredictResponse =
            serde_json::from_str(r#"{"predictions": [{}]}"#).expect("デシリアライズ失敗");
        assert!(response.first_image_data_url().is_none());
    }
}
