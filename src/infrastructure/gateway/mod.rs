pub mod chat_completions;

pub use chat_completions::{ChatCompletionsGateway, MODEL};

use crate::domain::proposal::Prompt;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("gateway rate limit exceeded")]
    RateLimited,

    #[error("gateway credits exhausted")]
    InsufficientCredits,

    #[error("gateway returned status {status}")]
    Status { status: u16, body: String },

    #[error("gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("gateway response had no completion text")]
    EmptyCompletion,

    #[error("{0} is not configured")]
    MissingApiKey(&'static str),
}

/// Text generation backend.
///
/// Implementations own the translation of provider-specific failures into
/// `GatewayError`; callers never see raw provider payloads.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Run one chat completion and return the first choice's text.
    ///
    /// Single attempt, no retries.
    async fn complete(&self, prompt: &Prompt) -> Result<String, GatewayError>;
}
