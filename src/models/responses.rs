//! Response DTOs for the tone API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

const SUCCESS: &str = "success";

/// Payload of a tone adjustment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToneData {
    pub original_text: String,
    pub adjusted_text: String,
    pub tone_value: u8,
    pub cached: bool,
}

/// Response body for `POST /tone`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToneResponse {
    pub status: &'static str,
    pub request_id: String,
    pub data: ToneData,
}

impl ToneResponse {
    pub fn new(request_id: impl Into<String>, data: ToneData) -> Self {
        Self {
            status: SUCCESS,
            request_id: request_id.into(),
            data,
        }
    }
}

/// Response body for `GET /tone/cache`
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsResponse {
    pub status: &'static str,
    pub data: CacheStats,
}

impl CacheStatsResponse {
    pub fn new(data: CacheStats) -> Self {
        Self {
            status: SUCCESS,
            data,
        }
    }
}

/// Response body carrying only a message, e.g. `DELETE /tone/cache`
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub status: &'static str,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: SUCCESS,
            message: message.into(),
        }
    }
}

/// Response body for `GET /status`
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub message: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    pub version: &'static str,
}

impl StatusResponse {
    pub fn operational() -> Self {
        Self {
            status: SUCCESS,
            message: "API is operational".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status: &'static str,
    /// HTTP status code
    pub code: u16,
    /// Stable error kind
    pub kind: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Internal detail, development mode only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}
