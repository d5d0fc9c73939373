use crate::config::RateLimitConfig;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

/// Which quota bucket a request draws from. Generation is the strictest,
/// writes sit in the middle, everything else counts against the general tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuotaTier {
    General,
    Write,
    Generation,
}

#[derive(Debug, Clone, Copy)]
struct Quota {
    max_requests: u32,
    window: Duration,
}

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

/// Process-scoped rolling-window rate limiter.
///
/// Constructed once at startup and injected through `SharedState`; counters
/// live in a single mutex-guarded map so concurrent requests check and
/// increment atomically. Expired windows are evicted by the sweeper task.
pub struct RateLimiter {
    general: Quota,
    write: Quota,
    generation: Quota,
    buckets: Mutex<HashMap<(QuotaTier, String), Window>>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(config: &RateLimitConfig) -> Self {
        let window = Duration::from_secs(config.window_seconds);
        Self {
            general: Quota {
                max_requests: config.general_max_requests,
                window,
            },
            write: Quota {
                max_requests: config.write_max_requests,
                window,
            },
            generation: Quota {
                max_requests: config.generation_max_requests,
                window,
            },
            buckets: Mutex::new(HashMap::new()),
        }
    }

    const fn quota(&self, tier: QuotaTier) -> Quota {
        match tier {
            QuotaTier::General => self.general,
            QuotaTier::Write => self.write,
            QuotaTier::Generation => self.generation,
        }
    }

    /// Consumes one request from the client's window, or reports how long
    /// the client should wait. A denied request consumes nothing.
    pub fn check(&self, tier: QuotaTier, key: &str) -> Result<(), Duration> {
        let quota = self.quota(tier);
        let now = Instant::now();

        let mut buckets = self
            .buckets
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let window = buckets
            .entry((tier, key.to_string()))
            .or_insert(Window {
                started: now,
                count: 0,
            });

        if now.duration_since(window.started) >= quota.window {
            window.started = now;
            window.count = 0;
        }

        if window.count >= quota.max_requests {
            let elapsed = now.duration_since(window.started);
            let retry_after = quota.window.saturating_sub(elapsed);
            return Err(retry_after.max(Duration::from_secs(1)));
        }

        window.count += 1;
        Ok(())
    }

    /// Drops windows that have fully expired. Bounds memory for churny
    /// anonymous clients.
    pub fn sweep(&self) {
        let now = Instant::now();
        let mut buckets = self
            .buckets
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let before = buckets.len();
        buckets.retain(|(tier, _), window| {
            now.duration_since(window.started) < self.quota(*tier).window
        });
        let evicted = before - buckets.len();
        if evicted > 0 {
            debug!("Rate limiter swept {} expired windows", evicted);
        }
    }

    /// Spawns the periodic eviction task; aborted at shutdown.
    pub fn start_sweeper(self: Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                self.sweep();
            }
        })
    }
}
