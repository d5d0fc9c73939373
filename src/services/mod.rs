pub mod generation;
pub mod rate_limit;

pub use generation::{GenerationOutcome, GenerationService, GenerationServiceError};
pub use rate_limit::{QuotaTier, RateLimiter};
