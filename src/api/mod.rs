//! API Module
//!
//! HTTP handlers, rate limiting and routing for the tone service REST API.
//!
//! # Endpoints
//! - `POST /api/v1/tone` - Rewrite text in a target tone
//! - `GET /api/v1/tone/cache` - Get cache statistics
//! - `DELETE /api/v1/tone/cache` - Clear the cache
//! - `GET /api/v1/status` - Liveness check

pub mod handlers;
pub mod rate_limit;
pub mod routes;

pub use handlers::*;
pub use rate_limit::{enforce_rate_limit, RateDecision, RateLimiter};
pub use routes::create_router;
