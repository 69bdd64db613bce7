//! Coverage summary parsing
//!
//! Reads the `json-summary` artifact written by istanbul-style reporters
//! (vitest, jest, nyc). Only the `total` block is used.

use serde::Serialize;
use serde_json::Value as JsonValue;
use std::path::Path;
use tracing::debug;

/// Total coverage percentages, rounded to two decimals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CoverageSummary {
    pub lines: Option<f64>,
    pub statements: Option<f64>,
    pub branches: Option<f64>,
    pub functions: Option<f64>,
}

impl CoverageSummary {
    /// Read and parse a summary file.
    ///
    /// Returns `None` when the file is missing, unreadable, not JSON, or has
    /// none of the four percentages.
    pub fn load(path: &Path) -> Option<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                debug!("No coverage summary at {}: {}", path.display(), e);
                return None;
            }
        };
        Self::parse(&content)
    }

    /// Parse summary JSON, tolerating absent or non-numeric fields.
    pub fn parse(content: &str) -> Option<Self> {
        let data: JsonValue = match serde_json::from_str(content) {
            Ok(data) => data,
            Err(e) => {
                debug!("Malformed coverage summary: {}", e);
                return None;
            }
        };

        let total = data.get("total");
        let pct = |key: &str| -> Option<f64> {
            let value = total?.get(key)?.get("pct")?;
            as_float(value).map(round2)
        };

        let summary = Self {
            lines: pct("lines"),
            statements: pct("statements"),
            branches: pct("branches"),
            functions: pct("functions"),
        };

        if summary == Self::default() {
            return None;
        }
        Some(summary)
    }
}

/// Numbers, and strings holding numbers
fn as_float(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
