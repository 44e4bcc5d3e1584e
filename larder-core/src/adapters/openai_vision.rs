//! OpenAI vision API client
//!
//! Sends an image to the chat completions endpoint as a base64 data URL and
//! asks the model for a strict-JSON ingredient list.

use std::time::Duration;

use base64::Engine;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::config::VisionSettings;
use crate::domain::RecognizedItem;
use crate::ports::{VisionError, VisionProvider, VisionResult};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const PROMPT: &str = "Identify the food ingredients visible in this image. \
Respond with JSON only: {\"ingredients\": [{\"name\": string, \
\"quantity\": number or null, \"confidence\": number or null}]}";

/// OpenAI-backed vision provider
pub struct OpenAiVision {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout_seconds: u64,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Model output shape: {"ingredients": [...]}
#[derive(Debug, Deserialize)]
struct IngredientsPayload {
    ingredients: Vec<RawIngredient>,
}

#[derive(Debug, Deserialize)]
struct RawIngredient {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    quantity: Option<f64>,
    #[serde(default)]
    confidence: Option<f64>,
}

impl OpenAiVision {
    /// Build a client from vision settings and the OPENAI_API_KEY env var
    pub fn from_settings(settings: &VisionSettings) -> VisionResult<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(VisionError::MissingApiKey)?;
        Self::new(&api_key, settings)
    }

    /// Build a client with an explicit API key
    pub fn new(api_key: &str, settings: &VisionSettings) -> VisionResult<Self> {
        let base_url = settings
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let parsed = Url::parse(&base_url)
            .map_err(|e| VisionError::Api(format!("invalid vision base URL: {}", e)))?;
        if parsed.scheme() != "https" && parsed.scheme() != "http" {
            return Err(VisionError::Api(format!(
                "vision base URL must be http(s), got '{}'",
                parsed.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| VisionError::Api(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: settings.model.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_seconds: settings.timeout_seconds,
        })
    }

    fn request_body(&self, image_bytes: &[u8], mime_type: &str) -> serde_json::Value {
        let b64 = base64::engine::general_purpose::STANDARD.encode(image_bytes);
        let data_url = format!("data:{};base64,{}", mime_type, b64);

        json!({
            "model": self.model,
            "response_format": { "type": "json_object" },
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": PROMPT },
                    { "type": "image_url", "image_url": { "url": data_url } }
                ]
            }]
        })
    }

    fn parse_items(raw_text: &str) -> VisionResult<Vec<RecognizedItem>> {
        let payload: IngredientsPayload = serde_json::from_str(raw_text.trim())
            .map_err(|_| VisionError::NonJsonResponse(truncate(raw_text, 200)))?;

        let items = payload
            .ingredients
            .into_iter()
            .filter_map(|raw| {
                let name = raw.name.unwrap_or_default().trim().to_string();
                if name.is_empty() {
                    return None;
                }
                Some(RecognizedItem {
                    name,
                    quantity: raw.quantity,
                    confidence: raw.confidence,
                })
            })
            .collect();

        Ok(items)
    }
}

impl VisionProvider for OpenAiVision {
    fn name(&self) -> &str {
        "openai"
    }

    fn recognize(&self, image_bytes: &[u8], mime_type: &str) -> VisionResult<Vec<RecognizedItem>> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(image_bytes, mime_type))
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    VisionError::Timeout(format!(
                        "no response after {} seconds",
                        self.timeout_seconds
                    ))
                } else {
                    VisionError::Api(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(VisionError::Api(format!(
                "HTTP {}: {}",
                status.as_u16(),
                truncate(&body, 200)
            )));
        }

        let chat: ChatResponse = response
            .json()
            .map_err(|e| VisionError::Api(format!("unreadable response: {}", e)))?;

        let raw_text = chat
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        if raw_text.trim().is_empty() {
            return Err(VisionError::NonJsonResponse("empty response".to_string()));
        }

        Self::parse_items(&raw_text)
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}
