//! Error types for the tone service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::upstream::UpstreamError;

// == Tone Error Enum ==
/// Failures surfaced to callers of the tone service.
///
/// Display strings are safe to show to users. Upstream details are kept in
/// `detail` and only logged or exposed in development mode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToneError {
    /// The upstream call exceeded its deadline
    #[error("AI service request timed out")]
    UpstreamTimeout,

    /// The upstream provider is throttling us
    #[error("AI service rate limit exceeded")]
    UpstreamRateLimited,

    /// The upstream provider failed or could not be reached
    #[error("AI service unavailable")]
    UpstreamUnavailable { detail: String },

    /// Any other upstream failure
    #[error("Failed to adjust text tone")]
    UpstreamUnknown { detail: String },

    /// Request failed validation
    #[error("{0}")]
    InvalidRequest(String),

    /// Caller exceeded the local rate limit
    #[error("Too many requests, please try again later")]
    TooManyRequests,

    /// No route matched
    #[error("{0}")]
    NotFound(String),
}

impl ToneError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ToneError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            ToneError::UpstreamRateLimited => StatusCode::TOO_MANY_REQUESTS,
            ToneError::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
            ToneError::UpstreamUnknown { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ToneError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ToneError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            ToneError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Stable machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ToneError::UpstreamTimeout => "upstream_timeout",
            ToneError::UpstreamRateLimited => "upstream_rate_limited",
            ToneError::UpstreamUnavailable { .. } => "upstream_unavailable",
            ToneError::UpstreamUnknown { .. } => "upstream_unknown",
            ToneError::InvalidRequest(_) => "invalid_request",
            ToneError::TooManyRequests => "rate_limited",
            ToneError::NotFound(_) => "not_found",
        }
    }

    /// Internal detail, never shown outside development mode.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ToneError::UpstreamUnavailable { detail } | ToneError::UpstreamUnknown { detail } => {
                Some(detail)
            }
            _ => None,
        }
    }
}

impl From<UpstreamError> for ToneError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Timeout => ToneError::UpstreamTimeout,
            UpstreamError::RateLimited => ToneError::UpstreamRateLimited,
            UpstreamError::Server(_) | UpstreamError::NotInitialized(_) => {
                ToneError::UpstreamUnavailable {
                    detail: err.to_string(),
                }
            }
            UpstreamError::Other(_) => ToneError::UpstreamUnknown {
                detail: err.to_string(),
            },
        }
    }
}

// == Api Error ==
/// A `ToneError` ready to be sent as an HTTP response.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub error: ToneError,
    pub request_id: Option<String>,
    /// Include `detail` in the body
    pub expose_detail: bool,
}

impl ApiError {
    pub fn new(error: ToneError) -> Self {
        Self {
            error,
            request_id: None,
            expose_detail: false,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn expose_detail(mut self, expose: bool) -> Self {
        self.expose_detail = expose;
        self
    }
}

impl From<ToneError> for ApiError {
    fn from(error: ToneError) -> Self {
        Self::new(error)
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        let detail = if self.expose_detail {
            self.error.detail().map(str::to_string)
        } else {
            None
        };

        let body = ErrorResponse {
            status: "error",
            code: status.as_u16(),
            kind: self.error.kind(),
            message: self.error.to_string(),
            request_id: self.request_id,
            detail,
        };

        (status, Json(body)).into_response()
    }
}

impl IntoResponse for ToneError {
    fn into_response(self) -> Response {
        ApiError::new(self).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the tone service.
pub type Result<T> = std::result::Result<T, ToneError>;
