//! API Handlers
//!
//! HTTP request handlers for each tone service endpoint.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, Method, Uri},
    Json,
};
use tracing::{info, warn};

use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::{ApiError, ToneError};
use crate::models::{
    CacheStatsResponse, MessageResponse, StatusResponse, ToneData, ToneRequest, ToneResponse,
};
use crate::service::ToneService;
use crate::upstream::MistralClient;

use super::rate_limit::RateLimiter;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ToneService>,
    pub config: Arc<Config>,
    /// Limiter for public routes
    pub public_limiter: Arc<RateLimiter>,
    /// Limiter for admin routes
    pub admin_limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Creates a new AppState around an existing service.
    pub fn new(service: ToneService, config: Config) -> Self {
        let rate_limit = &config.rate_limit;
        let public_limiter = Arc::new(RateLimiter::new(rate_limit.max_requests, rate_limit.window));
        let admin_limiter = Arc::new(RateLimiter::new(
            rate_limit.admin_max_requests(),
            rate_limit.window,
        ));

        Self {
            service: Arc::new(service),
            config: Arc::new(config),
            public_limiter,
            admin_limiter,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// The Mistral client is built lazily; a missing API key only fails the
    /// requests that need it.
    pub fn from_config(config: Config) -> Self {
        let store = CacheStore::new(config.cache.settings());

        let rewriter = Arc::new(MistralClient::lazy(&config.mistral));
        let service = ToneService::new(store, rewriter, config.mistral.rewrite_options());
        Self::new(service, config)
    }

    fn reject(&self, error: ToneError, request_id: &str) -> ApiError {
        ApiError::new(error)
            .with_request_id(request_id)
            .expose_detail(self.config.server.is_development())
    }
}

fn request_id(headers: &HeaderMap) -> String {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Handler for POST /tone
///
/// Validates the body and rewrites the text, serving from cache when possible.
pub async fn adjust_tone_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ToneRequest>, JsonRejection>,
) -> Result<Json<ToneResponse>, ApiError> {
    let request_id = request_id(&headers);

    let Json(req) = payload.map_err(|rejection| {
        warn!(request_id = %request_id, "Rejected tone request body: {}", rejection.body_text());
        state.reject(ToneError::InvalidRequest(rejection.body_text()), &request_id)
    })?;

    let validated = req
        .validate()
        .map_err(|msg| state.reject(ToneError::InvalidRequest(msg), &request_id))?;

    info!(
        request_id = %request_id,
        chars = validated.text.chars().count(),
        tone_value = validated.tone_value,
        "Tone adjustment request received"
    );

    let adjustment = state
        .service
        .adjust_tone(&validated.text, validated.tone_value)
        .await
        .map_err(|e| state.reject(e, &request_id))?;

    info!(request_id = %request_id, cached = adjustment.cached, "Tone adjustment successful");

    Ok(Json(ToneResponse::new(
        request_id,
        ToneData {
            original_text: validated.text,
            adjusted_text: adjustment.adjusted_text,
            tone_value: validated.tone_value,
            cached: adjustment.cached,
        },
    )))
}

/// Handler for GET /tone/cache
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    Json(CacheStatsResponse::new(state.service.cache_stats().await))
}

/// Handler for DELETE /tone/cache
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    state.service.clear_cache().await;
    Json(MessageResponse::new("Cache cleared successfully"))
}

/// Handler for GET /status
pub async fn status_handler() -> Json<StatusResponse> {
    Json(StatusResponse::operational())
}

/// Fallback for unknown routes.
pub async fn not_found_handler(method: Method, uri: Uri) -> ApiError {
    ApiError::new(ToneError::NotFound(format!("Cannot {} {}", method, uri)))
}
