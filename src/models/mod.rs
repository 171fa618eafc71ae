//! Request and Response models for the tone API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{ToneRequest, ValidatedTone, MAX_TEXT_CHARS};
pub use responses::{
    CacheStatsResponse, ErrorResponse, MessageResponse, StatusResponse, ToneData, ToneResponse,
};
