//! Age cells
//!
//! Renderers store the creation timestamp in time columns so that rendering
//! stays deterministic; the relative age is computed at draw time.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

/// Placeholder for a missing or unreadable timestamp
pub const NA: &str = "n/a";

/// Creation timestamp of an object, normalized to RFC3339 UTC
pub fn object_age(obj: &Value) -> String {
    obj.get("metadata")
        .and_then(|m| m.get("creationTimestamp"))
        .and_then(|t| t.as_str())
        .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
        .map(|t| {
            t.with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Secs, true)
        })
        .unwrap_or_else(|| NA.to_string())
}

/// Format a time cell as a compact age relative to `now`
pub fn to_age(cell: &str, now: DateTime<Utc>) -> String {
    let Ok(ts) = DateTime::parse_from_rfc3339(cell) else {
        return NA.to_string();
    };
    let secs = now
        .signed_duration_since(ts.with_timezone(&Utc))
        .num_seconds()
        .max(0);

    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86_400 {
        format!("{}h", secs / 3600)
    } else {
        format!("{}d", secs / 86_400)
    }
}
