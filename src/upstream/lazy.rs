//! Lazily initialised rewriter.
//!
//! The upstream client may fail to build (missing credentials, TLS setup).
//! `LazyRewriter` keeps the client in an explicit state and retries
//! construction once per call until it succeeds.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{error, info};

use super::{RewriteOptions, Rewriter, UpstreamError};

/// Builds the underlying client.
pub type RewriterFactory =
    Box<dyn Fn() -> Result<Arc<dyn Rewriter>, UpstreamError> + Send + Sync>;

// == Client State ==
#[derive(Clone)]
pub enum ClientState {
    /// No construction attempted yet
    Uninitialized,
    /// A working client
    Ready(Arc<dyn Rewriter>),
    /// Last construction attempt failed with this reason
    Failed(String),
}

impl ClientState {
    pub fn label(&self) -> &'static str {
        match self {
            ClientState::Uninitialized => "uninitialized",
            ClientState::Ready(_) => "ready",
            ClientState::Failed(_) => "failed",
        }
    }
}

impl fmt::Debug for ClientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientState::Ready(client) => write!(f, "Ready({})", client.name()),
            ClientState::Failed(reason) => write!(f, "Failed({reason})"),
            ClientState::Uninitialized => write!(f, "Uninitialized"),
        }
    }
}

// == Lazy Rewriter ==
pub struct LazyRewriter {
    name: &'static str,
    factory: RewriterFactory,
    state: RwLock<ClientState>,
}

impl LazyRewriter {
    pub fn new(name: &'static str, factory: RewriterFactory) -> Self {
        Self {
            name,
            factory,
            state: RwLock::new(ClientState::Uninitialized),
        }
    }

    /// Current state of the wrapped client.
    pub async fn state(&self) -> ClientState {
        self.state.read().await.clone()
    }

    /// Returns the ready client, attempting construction once if needed.
    pub async fn client(&self) -> Result<Arc<dyn Rewriter>, UpstreamError> {
        if let ClientState::Ready(client) = &*self.state.read().await {
            return Ok(client.clone());
        }

        let mut state = self.state.write().await;
        // Another task may have initialised it while we waited
        if let ClientState::Ready(client) = &*state {
            return Ok(client.clone());
        }

        match (self.factory)() {
            Ok(client) => {
                info!(provider = self.name, "Upstream client initialized successfully");
                *state = ClientState::Ready(client.clone());
                Ok(client)
            }
            Err(e) => {
                error!(provider = self.name, "Failed to initialize upstream client: {}", e);
                let reason = e.to_string();
                *state = ClientState::Failed(reason.clone());
                Err(UpstreamError::NotInitialized(reason))
            }
        }
    }
}

impl fmt::Debug for LazyRewriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyRewriter").field("name", &self.name).finish_non_exhaustive()
    }
}

#[async_trait]
impl Rewriter for LazyRewriter {
    async fn rewrite(
        &self,
        text: &str,
        tone_description: &str,
        options: &RewriteOptions,
    ) -> Result<String, UpstreamError> {
        let client = self.client().await?;
        client.rewrite(text, tone_description, options).await
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
