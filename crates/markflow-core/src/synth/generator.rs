//! Text generation client
//!
//! Single-shot prompt-in/text-out call against the configured generation
//! API. The response body is not contractually guaranteed: it may be a bare
//! JSON string, an object exposing a `text` field, a completion-style
//! `choices` array, or plain text. All shapes are tolerated.

use async_trait::async_trait;
use markflow_common::config::GenerationConfig;
use markflow_common::{Error, Result};
use reqwest::Client;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// Prompt-in/text-out generation seam
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// HTTP text generator
pub struct HttpTextGenerator {
    client: Client,
    config: GenerationConfig,
}

impl HttpTextGenerator {
    /// Create a new generator from configuration
    pub fn new(config: GenerationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Pull generated text out of whatever shape the API returned
    fn extract_text(body: &str) -> String {
        match serde_json::from_str::<Value>(body) {
            Ok(Value::String(text)) => text,
            Ok(Value::Object(map)) => {
                if let Some(Value::String(text)) = map.get("text") {
                    return text.clone();
                }
                if let Some(text) = map
                    .get("choices")
                    .and_then(|c| c.get(0))
                    .and_then(|c| c.get("text"))
                    .and_then(|t| t.as_str())
                {
                    return text.to_string();
                }
                body.to_string()
            }
            _ => body.to_string(),
        }
    }
}

#[async_trait]
impl TextGenerator for HttpTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/v1/generate", self.config.api_url.trim_end_matches('/'));

        debug!(model = %self.config.model, "Sending generation request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&serde_json::json!({
                "model": self.config.model,
                "prompt": prompt,
            }))
            .send()
            .await
            .map_err(|e| Error::Generation(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Generation(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(Error::Generation(format!(
                "API error ({}): {}",
                status.as_u16(),
                body
            )));
        }

        Ok(Self::extract_text(&body))
    }
}

/// Canned generator for tests: pops queued responses, then fails
pub struct StaticGenerator {
    responses: Mutex<VecDeque<Result<String>>>,
}

impl StaticGenerator {
    /// Generator that always yields the given text
    pub fn ok(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            responses: Mutex::new(VecDeque::from([Ok(text)])),
        }
    }

    /// Generator that always fails
    pub fn failing() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
        }
    }
}

#[async_trait]
impl TextGenerator for StaticGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        let mut responses = self.responses.lock().expect("poisoned");
        match responses.pop_front() {
            Some(Ok(text)) => {
                // Keep replaying the last response for repeated calls
                responses.push_back(Ok(text.clone()));
                Ok(text)
            }
            Some(Err(e)) => Err(e),
            None => Err(Error::Generation("no canned response".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(api_url: String) -> GenerationConfig {
        GenerationConfig {
            api_url,
            api_key: "test-key".to_string(),
            model: "test-model".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_extract_text_shapes() {
        assert_eq!(HttpTextGenerator::extract_text(r#""plain""#), "plain");
        assert_eq!(
            HttpTextGenerator::extract_text(r#"{"text":"from object"}"#),
            "from object"
        );
        assert_eq!(
            HttpTextGenerator::extract_text(r#"{"choices":[{"text":"from choices"}]}"#),
            "from choices"
        );
        assert_eq!(HttpTextGenerator::extract_text("raw text"), "raw text");
    }

    #[tokio::test]
    async fn test_generate_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/generate"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": "hello"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let generator = HttpTextGenerator::new(config(server.uri())).unwrap();
        let text = generator.generate("prompt").await.unwrap();
        assert_eq!(text, "hello");
    }

    #[tokio::test]
    async fn test_generate_non_2xx_is_generation_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let generator = HttpTextGenerator::new(config(server.uri())).unwrap();
        let err = generator.generate("prompt").await.unwrap_err();
        assert_eq!(err.code(), "GENERATION_ERROR");
        assert!(err.to_string().contains("500"));
    }
}
