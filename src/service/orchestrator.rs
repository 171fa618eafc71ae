//! Tone adjustment orchestration.
//!
//! Probes the cache, falls back to the rewriter on a miss and writes the
//! result back. The cache lock is never held while the rewriter runs.
//!
//! Concurrent identical misses are not coalesced: each calls the rewriter
//! and the last write wins.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::cache::{self, CacheStats, CacheStore, KeyDeriver, SharedCache};
use crate::error::{Result, ToneError};
use crate::tasks::{spawn_cleanup_task, SweepHandle};
use crate::upstream::{RewriteOptions, Rewriter, UpstreamError};

use super::tone_description;

/// Result of a tone adjustment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToneAdjustment {
    pub adjusted_text: String,
    /// True when served from the cache without an upstream call
    pub cached: bool,
}

pub struct ToneService {
    cache: SharedCache,
    keys: KeyDeriver,
    rewriter: Arc<dyn Rewriter>,
    options: RewriteOptions,
}

impl ToneService {
    pub fn new(store: CacheStore, rewriter: Arc<dyn Rewriter>, options: RewriteOptions) -> Self {
        Self {
            cache: cache::shared(store),
            keys: KeyDeriver::tone(),
            rewriter,
            options,
        }
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    pub fn keys(&self) -> &KeyDeriver {
        &self.keys
    }

    /// Rewrites `text` in the tone selected by `tone_value`.
    ///
    /// Inputs are expected to be validated already: non-empty text of at
    /// most 5000 characters and a tone value in 0..=100.
    pub async fn adjust_tone(&self, text: &str, tone_value: u8) -> Result<ToneAdjustment> {
        let key = self.keys.derive_key(text, tone_value);

        let hit = self.cache.write().await.get(&key);
        if let Some(adjusted_text) = hit {
            info!(tone_value, "Cache hit for tone adjustment");
            return Ok(ToneAdjustment {
                adjusted_text,
                cached: true,
            });
        }

        let description = tone_description(tone_value);
        let adjusted_text = self
            .call_rewriter(text, description)
            .await
            .map_err(|e| translate_failure(e, text, tone_value))?;

        self.cache.write().await.set(key, adjusted_text.clone());
        debug!(tone_value, "Stored tone adjustment in cache");

        Ok(ToneAdjustment {
            adjusted_text,
            cached: false,
        })
    }

    /// Statistics of the underlying store.
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    /// Drops every cached entry.
    pub async fn clear_cache(&self) {
        self.cache.write().await.clear();
        info!("Cache cleared");
    }

    /// Starts the background expiry sweep.
    ///
    /// Returns None when caching is disabled. The sweep runs until the
    /// handle is stopped or dropped.
    pub async fn start_sweep(&self) -> Option<SweepHandle> {
        let settings = self.cache.read().await.settings().clone();
        if !settings.enabled {
            return None;
        }
        Some(spawn_cleanup_task(self.cache.clone(), settings.sweep_interval))
    }

    async fn call_rewriter(
        &self,
        text: &str,
        description: &str,
    ) -> std::result::Result<String, UpstreamError> {
        let call = self.rewriter.rewrite(text, description, &self.options);
        // Dropping the future on timeout cancels the in-flight request
        match tokio::time::timeout(self.options.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(UpstreamError::Timeout),
        }
    }
}

impl std::fmt::Debug for ToneService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToneService")
            .field("rewriter", &self.rewriter.name())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Maps an upstream failure to the caller-facing error and logs it.
///
/// Only the size of the input is logged, never the text.
fn translate_failure(err: UpstreamError, text: &str, tone_value: u8) -> ToneError {
    let chars = text.chars().count();
    let translated = ToneError::from(err.clone());

    let kind = translated.kind();
    if translated == ToneError::UpstreamRateLimited {
        warn!(op = "adjust_tone", chars, tone_value, kind, "Upstream rate limit exceeded");
    } else {
        error!(op = "adjust_tone", chars, tone_value, kind, error = %err, "Tone adjustment failed");
    }

    translated
}
