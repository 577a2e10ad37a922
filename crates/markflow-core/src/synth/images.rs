//! Hero image generation
//!
//! Optional: the synthesizer only asks for images when an image API is
//! configured. A failed or malformed image call degrades to a neutral
//! placeholder URL and never fails the template being built.

use async_trait::async_trait;
use markflow_common::config::ImageApiConfig;
use markflow_common::{Error, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

/// Neutral placeholder used when image generation fails
pub const PLACEHOLDER_IMAGE_URL: &str = "https://placehold.co/600x300?text=Image";

/// Prompt-in/image-URL-out generation seam
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> Result<String>;

    /// Generate an image URL, degrading to the placeholder on any failure
    async fn image_or_placeholder(&self, prompt: &str) -> String {
        match self.generate_image(prompt).await {
            Ok(url) if !url.trim().is_empty() => url,
            Ok(_) => {
                warn!("Image API returned an empty URL; using placeholder");
                PLACEHOLDER_IMAGE_URL.to_string()
            }
            Err(e) => {
                warn!(error = %e, "Image generation failed; using placeholder");
                PLACEHOLDER_IMAGE_URL.to_string()
            }
        }
    }
}

/// HTTP image generator
pub struct HttpImageGenerator {
    client: Client,
    config: ImageApiConfig,
}

impl HttpImageGenerator {
    pub fn new(config: ImageApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Pull the image URL out of the response: a bare string, `{url}`, or
    /// an image-API-style `{data: [{url}]}` array
    fn extract_url(body: &str) -> Option<String> {
        match serde_json::from_str::<Value>(body).ok()? {
            Value::String(url) => Some(url),
            Value::Object(map) => {
                if let Some(url) = map.get("url").and_then(|u| u.as_str()) {
                    return Some(url.to_string());
                }
                map.get("data")
                    .and_then(|d| d.get(0))
                    .and_then(|d| d.get("url"))
                    .and_then(|u| u.as_str())
                    .map(String::from)
            }
            _ => None,
        }
    }
}

#[async_trait]
impl ImageGenerator for HttpImageGenerator {
    async fn generate_image(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/v1/images", self.config.api_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&serde_json::json!({ "prompt": prompt }))
            .send()
            .await
            .map_err(|e| Error::Generation(format!("Image request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Generation(format!("Failed to read image response: {}", e)))?;

        if !status.is_success() {
            return Err(Error::Generation(format!(
                "Image API error ({}): {}",
                status.as_u16(),
                body
            )));
        }

        Self::extract_url(&body)
            .ok_or_else(|| Error::Generation("Image response had no url field".to_string()))
    }
}
