//! Image generation client for garden design previews

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Client for an OpenAI-compatible `/images/generations` endpoint
#[derive(Clone)]
pub struct ImageGenerationClient {
    http_client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ImageGenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    url: Option<String>,
    b64_json: Option<String>,
}

impl GeneratedImage {
    /// Hosted URL, or an inline data URL when only base64 was returned
    fn into_url(self) -> Option<String> {
        self.url
            .filter(|u| !u.is_empty())
            .or_else(|| self.b64_json.map(|b64| format!("data:image/png;base64,{}", b64)))
    }
}

impl ImageGenerationClient {
    pub fn new(http_client: Client, base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    /// Generate one design image and return its URL
    pub async fn generate(&self, prompt: &str) -> AppResult<String> {
        let url = format!("{}/images/generations", self.base_url);
        let request = ImageGenerationRequest {
            model: &self.model,
            prompt,
            n: 1,
            size: "1024x1024",
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Image request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Image API returned {}: {}",
                status, body
            )));
        }

        let data: ImageGenerationResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse image response: {}", e))
        })?;

        data.data
            .into_iter()
            .next()
            .and_then(GeneratedImage::into_url)
            .ok_or_else(|| AppError::ExternalService("Image response had no image".to_string()))
    }
}
