use crate::clients::gemini::{GeminiClient, GenerateError};
use crate::db::Store;
use crate::entities::prompts;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum GenerationServiceError {
    #[error(transparent)]
    Upstream(#[from] GenerateError),

    #[error("database error: {0}")]
    Database(#[from] anyhow::Error),
}

#[derive(Debug)]
pub struct GenerationOutcome {
    pub image_id: String,
    pub image_url: String,
}

/// Orchestrates one generation request: counts the usage, calls the upstream
/// client, and persists the result.
pub struct GenerationService {
    store: Store,
    gemini: Arc<GeminiClient>,
}

impl GenerationService {
    pub const fn new(store: Store, gemini: Arc<GeminiClient>) -> Self {
        Self { store, gemini }
    }

    /// Runs generation for an existing prompt.
    ///
    /// The usage counter is incremented before the first attempt and never
    /// rolled back: usage counts generation requests, not successes.
    pub async fn generate(
        &self,
        prompt: &prompts::Model,
    ) -> Result<GenerationOutcome, GenerationServiceError> {
        self.store.increment_prompt_usage(&prompt.id).await?;

        let image_url = self.gemini.generate_image(&prompt.prompt_text).await?;

        let saved = self
            .store
            .save_generated_image(&prompt.id, &image_url)
            .await?;

        info!("Generated image {} for prompt {}", saved.id, prompt.id);

        Ok(GenerationOutcome {
            image_id: saved.id,
            image_url: saved.image_url,
        })
    }
}
