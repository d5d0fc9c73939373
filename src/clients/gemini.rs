use crate::config::GeminiConfig;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, warn};

/// One failed or aborted generation attempt, classified for the retry loop.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Malformed request or rejected credentials; retrying cannot help.
    #[error("upstream rejected the request: {0}")]
    Permanent(String),

    /// Transient upstream or transport failure, including timeouts.
    #[error("upstream request failed: {0}")]
    Retryable(String),

    /// The upstream answered but the response carried no image payload.
    #[error("no image data in response")]
    MissingImage,

    /// Every attempt failed.
    #[error("image generation failed after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ContentPart>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentPart {
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: Option<String>,
    data: String,
}

/// Client for a Gemini-compatible image generation endpoint.
///
/// Each call is bounded by a per-request timeout and retried with linear
/// backoff; permanent rejections (bad request, auth) abort immediately.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    request_timeout: Duration,
    max_attempts: u32,
    retry_base_delay: Duration,
}

impl GeminiClient {
    pub fn new(client: Client, config: &GeminiConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            request_timeout: Duration::from_secs(config.request_timeout_seconds),
            max_attempts: config.max_attempts.max(1),
            retry_base_delay: Duration::from_millis(config.retry_base_delay_ms),
        }
    }

    /// Generates an image for the given prompt text, returning a
    /// `data:{mime};base64,...` URI on success.
    pub async fn generate_image(&self, prompt: &str) -> Result<String, GenerateError> {
        for attempt in 1..=self.max_attempts {
            match self.attempt(prompt).await {
                Ok(image_url) => return Ok(image_url),
                Err(e @ GenerateError::Permanent(_)) => {
                    warn!("Generation aborted on attempt {}: {}", attempt, e);
                    return Err(e);
                }
                Err(e) => {
                    warn!(
                        "Generation attempt {}/{} failed: {}",
                        attempt, self.max_attempts, e
                    );
                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.retry_base_delay * attempt).await;
                    }
                }
            }
        }

        error!(
            "All {} generation attempts failed for prompt",
            self.max_attempts
        );
        Err(GenerateError::Exhausted {
            attempts: self.max_attempts,
        })
    }

    async fn attempt(&self, prompt: &str) -> Result<String, GenerateError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseModalities": ["TEXT", "IMAGE"] },
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .timeout(self.request_timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    // The in-flight call is abandoned, not cancelled upstream.
                    GenerateError::Retryable("request timed out".to_string())
                } else {
                    GenerateError::Retryable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = format!("{status} - {body}");
            return Err(match status {
                StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    GenerateError::Permanent(message)
                }
                _ => GenerateError::Retryable(message),
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::Retryable(e.to_string()))?;

        let inline = parsed
            .candidates
            .into_iter()
            .flatten()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts)
            .into_iter()
            .flatten()
            .find_map(|p| p.inline_data)
            .ok_or(GenerateError::MissingImage)?;

        let mime_type = inline
            .mime_type
            .unwrap_or_else(|| "image/png".to_string());
        Ok(format!("data:{};base64,{}", mime_type, inline.data))
    }
}
