use std::sync::Arc;

use crate::clients::gemini::GeminiClient;
use crate::config::Config;
use crate::db::{Store, seed};
use crate::services::{GenerationService, RateLimiter};

/// Build a shared HTTP client with reasonable defaults for API calls.
/// Reused across services to enable connection pooling.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent(concat!("Promptarr/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

pub struct SharedState {
    pub config: Config,

    pub store: Store,

    pub gemini: Arc<GeminiClient>,

    pub rate_limiter: Arc<RateLimiter>,

    pub generation: Arc<GenerationService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        if config.general.seed_defaults {
            seed::seed_default_prompts(&store).await?;
        }

        let http_client = build_shared_http_client(config.gemini.request_timeout_seconds)?;
        let gemini = Arc::new(GeminiClient::new(http_client, &config.gemini));

        let rate_limiter = Arc::new(RateLimiter::new(&config.rate_limit));

        let generation = Arc::new(GenerationService::new(store.clone(), gemini.clone()));

        Ok(Self {
            config,
            store,
            gemini,
            rate_limiter,
            generation,
        })
    }
}
