use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub gemini: GeminiConfig,

    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// 0 = let tokio pick.
    pub worker_threads: usize,

    /// Seed the gallery with starter prompts when the table is empty.
    pub seed_defaults: bool,

    pub max_db_connections: u32,

    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/promptarr.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 0,
            seed_defaults: true,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,

    pub port: u16,

    /// `["*"]` allows any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// Read from the `GEMINI_API_KEY` environment variable when unset here.
    #[serde(skip_serializing)]
    pub api_key: String,

    pub base_url: String,

    pub model: String,

    /// Ceiling for a single generation attempt.
    pub request_timeout_seconds: u64,

    /// Total attempts per generation call, including the first.
    pub max_attempts: u32,

    /// Backoff before retry N is `retry_base_delay_ms * N` (linear).
    pub retry_base_delay_ms: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.5-flash-image".to_string(),
            request_timeout_seconds: 60,
            max_attempts: 3,
            retry_base_delay_ms: 1000,
        }
    }
}

/// Rolling-window request quotas, keyed per client.
///
/// Generation is deliberately the strictest tier; a quota breach is answered
/// before the request reaches any handler, so it never consumes a generation
/// attempt or a usage increment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub window_seconds: u64,

    pub general_max_requests: u32,

    pub write_max_requests: u32,

    pub generation_max_requests: u32,

    /// Expired window entries are evicted on this cadence to bound memory.
    pub sweep_interval_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_seconds: 60,
            general_max_requests: 100,
            write_max_requests: 20,
            generation_max_requests: 10,
            sweep_interval_seconds: 300,
        }
    }
}

impl Config {
    /// Loads from `PROMPTARR_CONFIG` (default `config.toml`) when the file
    /// exists, falling back to defaults. `.env` is honored and the Gemini
    /// API key can always be supplied via `GEMINI_API_KEY`.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let path =
            std::env::var("PROMPTARR_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

        let mut config = if Path::new(&path).exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {path}"))?;
            let config: Self = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {path}"))?;
            info!("Loaded configuration from {}", path);
            config
        } else {
            Self::default()
        };

        if let Ok(key) = std::env::var("GEMINI_API_KEY")
            && !key.is_empty()
        {
            config.gemini.api_key = key;
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.database_path.is_empty() {
            anyhow::bail!("general.database_path must not be empty");
        }
        if self.general.max_db_connections < self.general.min_db_connections {
            anyhow::bail!("general.max_db_connections must be >= min_db_connections");
        }
        if self.gemini.max_attempts == 0 {
            anyhow::bail!("gemini.max_attempts must be at least 1");
        }
        if self.gemini.request_timeout_seconds == 0 {
            anyhow::bail!("gemini.request_timeout_seconds must be at least 1");
        }
        if self.rate_limit.window_seconds == 0 {
            anyhow::bail!("rate_limit.window_seconds must be at least 1");
        }
        Ok(())
    }
}
