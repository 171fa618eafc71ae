//! API Routes
//!
//! Configures the Axum router with all tone service endpoints.

use std::time::Duration;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::warn;

use super::handlers::{
    adjust_tone_handler, cache_stats_handler, clear_cache_handler, not_found_handler,
    status_handler, AppState,
};
use super::rate_limit::enforce_rate_limit;
use crate::config::API_PREFIX;

/// Largest accepted request body.
const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /api/v1/tone` - Rewrite text in the requested tone
/// - `GET /api/v1/tone/cache` - Cache statistics
/// - `DELETE /api/v1/tone/cache` - Clear the cache
/// - `GET /api/v1/status` - Liveness check
///
/// # Middleware
/// - Request id: generated when absent and echoed in `x-request-id`
/// - CORS: restricted to the configured frontend origin
/// - Security headers, 1 MiB body limit and request tracing
/// - Rate limits: public limit on `/tone`, a higher one on cache admin routes
pub fn create_router(state: AppState) -> Router {
    let tone = Router::new()
        .route("/tone", post(adjust_tone_handler))
        .route_layer(middleware::from_fn_with_state(
            state.public_limiter.clone(),
            enforce_rate_limit,
        ));

    let admin = Router::new()
        .route(
            "/tone/cache",
            get(cache_stats_handler).delete(clear_cache_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            state.admin_limiter.clone(),
            enforce_rate_limit,
        ));

    let api = Router::new()
        .merge(tone)
        .merge(admin)
        .route("/status", get(status_handler));

    let cors = cors_layer(&state.config.server.cors_origin);

    Router::new()
        .nest(API_PREFIX, api)
        .fallback(not_found_handler)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(cors)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = match HeaderValue::from_str(origin) {
        Ok(value) => AllowOrigin::exact(value),
        Err(_) => {
            warn!(origin, "Invalid CORS origin, cross-origin requests will be refused");
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 60))
}
