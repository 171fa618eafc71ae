//! Service Module
//!
//! Tone adjustment on top of the cache and the upstream rewriter.

mod orchestrator;
mod tone;

pub use orchestrator::{ToneAdjustment, ToneService};
pub use tone::{tone_description, ToneBand, MAX_TONE_VALUE};
