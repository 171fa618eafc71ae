//! Request DTOs for the tone API
//!
//! Defines the structure of incoming HTTP request bodies and their validation.

use serde::Deserialize;
use serde_json::Value;

use crate::service::MAX_TONE_VALUE;

/// Maximum text length in characters.
pub const MAX_TEXT_CHARS: usize = 5000;

/// Request body for `POST /tone`.
///
/// Fields are loosely typed so that missing or mistyped values produce
/// validation messages instead of deserialization failures.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToneRequest {
    /// Text to rewrite
    #[serde(default)]
    pub text: Option<Value>,
    /// Target tone, 0 (formal) to 100 (casual)
    #[serde(default)]
    pub tone_value: Option<Value>,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTone {
    pub text: String,
    pub tone_value: u8,
}

impl ToneRequest {
    /// Validates the request data.
    ///
    /// Returns every failed rule joined with ", ".
    pub fn validate(&self) -> Result<ValidatedTone, String> {
        let mut errors = Vec::new();

        let text = match &self.text {
            None | Some(Value::Null) => {
                errors.push("Text is required");
                None
            }
            Some(Value::String(s)) if s.is_empty() => {
                errors.push("Text cannot be empty");
                None
            }
            Some(Value::String(s)) if s.chars().count() > MAX_TEXT_CHARS => {
                errors.push("Text cannot exceed 5000 characters");
                None
            }
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                errors.push("Text must be a string");
                None
            }
        };

        let tone_value = match &self.tone_value {
            None | Some(Value::Null) => {
                errors.push("Tone value is required");
                None
            }
            Some(value) => {
                let parsed = parse_tone_value(value);
                if parsed.is_none() {
                    errors.push("Tone value must be between 0 and 100");
                }
                parsed
            }
        };

        match (text, tone_value) {
            (Some(text), Some(tone_value)) => Ok(ValidatedTone { text, tone_value }),
            _ => Err(errors.join(", ")),
        }
    }
}

/// Accepts integers and integer strings in `0..=100`.
fn parse_tone_value(value: &Value) -> Option<u8> {
    let n = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u8::try_from(n).ok().filter(|v| *v <= MAX_TONE_VALUE)
}
