//! ID and timestamp utilities for Origami
//!
//! Provides walker id generation and the RFC3339 timestamps stamped on step records.

use chrono::{SecondsFormat, Utc};
use rand::Rng;

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

/// Current UTC time formatted as RFC3339 with second precision.
///
/// Example: `2026-02-20T14:03:11Z`
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Generate a unique walker ID for a persona
///
/// Format: `{persona_lowercase}-{timestamp_ms}-{random_hex}`
/// Example: `herald-1738300800123-a1b2`
pub fn generate_walker_id(persona: &str) -> String {
    let random: u16 = rand::rng().random();
    format!("{}-{}-{:04x}", persona.to_lowercase(), now_ms(), random)
}
