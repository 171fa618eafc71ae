//! Tone Shift - rewrites text in a requested tone through an LLM
//!
//! Responses are cached in memory with TTL expiration and LRU eviction so
//! repeated requests never reach the upstream API.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod service;
pub mod tasks;
pub mod upstream;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::{ApiError, ToneError};
pub use service::{ToneAdjustment, ToneService};
pub use tasks::spawn_cleanup_task;
