use super::{LLMError, LLMProvider};
use crate::config::GeminiConfig;
use crate::secrets::{scrub, SecretString};
use async_trait::async_trait;
use serde_json::json;

pub struct GeminiProvider {
    config: GeminiConfig,
    api_key: SecretString,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig, api_key: SecretString) -> Self {
        Self {
            config,
            api_key,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }
}

/// Map a non-success HTTP status to the error classification the router uses
fn classify_status(status: u16, body: String) -> LLMError {
    match status {
        429 => LLMError::RateLimitExceeded(body),
        503 => LLMError::Overloaded(body),
        400 | 404 => LLMError::InvalidRequest(body),
        401 | 403 => LLMError::AuthenticationFailed(body),
        _ => LLMError::ProviderUnavailable(format!("Gemini API error ({}): {}", status, body)),
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, model: &str, prompt: &str) -> super::Result<String> {
        let payload = json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": prompt}]
            }]
        });

        let response = self
            .client
            .post(self.url(model))
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", self.api_key.unsecure())
            .json(&payload)
            .send()
            .await
            .map_err(|e| LLMError::NetworkError(scrub(&e.to_string())))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(classify_status(status.as_u16(), scrub(&text)));
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LLMError::ParseError(e.to_string()))?;

        let candidate = data
            .get("candidates")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .ok_or_else(|| LLMError::ParseError("No candidates in response".to_string()))?;

        let content_item = candidate
            .get("content")
            .ok_or_else(|| LLMError::ParseError("No content in candidate".to_string()))?;

        let parts = content_item
            .get("parts")
            .and_then(|p| p.as_array())
            .ok_or_else(|| LLMError::ParseError("No parts in candidate content".to_string()))?;

        let mut full_text = String::new();
        for part in parts {
            if let Some(text) = part.get("text").and_then(|t| t.as_str()) {
                full_text.push_str(text);
            }
        }

        Ok(full_text)
    }
}
