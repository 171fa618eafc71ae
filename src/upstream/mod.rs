//! Upstream Module
//!
//! The external text rewriting collaborator: the `Rewriter` trait, the
//! Mistral HTTP client and the lazily initialised client wrapper.

mod lazy;
mod mistral;
mod prompt;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use lazy::{ClientState, LazyRewriter};
pub use mistral::MistralClient;
pub use prompt::tone_adjustment_prompt;

// == Upstream Error ==
/// Failures reported by a rewriter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    /// The call did not complete before its deadline
    #[error("upstream request timed out")]
    Timeout,

    /// The provider is throttling us
    #[error("upstream rate limit exceeded")]
    RateLimited,

    /// The provider answered with a 5xx status
    #[error("upstream server error: HTTP {0}")]
    Server(u16),

    /// No usable client could be constructed
    #[error("upstream client not initialized: {0}")]
    NotInitialized(String),

    /// Anything else (network failure, bad payload, 4xx)
    #[error("upstream error: {0}")]
    Other(String),
}

// == Rewrite Options ==
/// Generation parameters passed with every rewrite.
#[derive(Debug, Clone, PartialEq)]
pub struct RewriteOptions {
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: 1000,
            timeout: Duration::from_secs(30),
        }
    }
}

// == Rewriter Trait ==
/// Rewrites text so it reads in the described tone.
#[async_trait]
pub trait Rewriter: Send + Sync {
    async fn rewrite(
        &self,
        text: &str,
        tone_description: &str,
        options: &RewriteOptions,
    ) -> Result<String, UpstreamError>;

    /// Short provider name used in logs.
    fn name(&self) -> &'static str;
}
