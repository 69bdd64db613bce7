//! Code-quality signal patterns counted per source file

use regex::Regex;
use std::sync::OnceLock;

static DEBT_MARKER: OnceLock<Regex> = OnceLock::new();
static ANY_USAGE: OnceLock<Regex> = OnceLock::new();
static TS_SUPPRESSION: OnceLock<Regex> = OnceLock::new();
static ESLINT_DISABLE: OnceLock<Regex> = OnceLock::new();

/// Occurrence counts of the quality signals in one file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignalCounts {
    pub debt_markers: usize,
    pub any_usage: usize,
    pub ts_ignore: usize,
    pub eslint_disable: usize,
}

/// The four compiled patterns, shared by every collector
#[derive(Debug, Clone, Copy)]
pub struct SignalPatterns {
    debt_marker: &'static Regex,
    any_usage: &'static Regex,
    ts_suppression: &'static Regex,
    eslint_disable: &'static Regex,
}

impl SignalPatterns {
    pub fn new() -> Self {
        Self {
            debt_marker: DEBT_MARKER.get_or_init(|| {
                Regex::new(r"\b(?:TODO|FIXME|HACK|XXX)\b").expect("valid regex")
            }),
            any_usage: ANY_USAGE.get_or_init(|| Regex::new(r"\bany\b").expect("valid regex")),
            ts_suppression: TS_SUPPRESSION
                .get_or_init(|| Regex::new(r"@ts-ignore|@ts-nocheck").expect("valid regex")),
            eslint_disable: ESLINT_DISABLE
                .get_or_init(|| Regex::new(r"eslint-disable").expect("valid regex")),
        }
    }

    /// Count non-overlapping matches of every pattern in `text`.
    pub fn count(&self, text: &str) -> SignalCounts {
        SignalCounts {
            debt_markers: self.debt_marker.find_iter(text).count(),
            any_usage: self.any_usage.find_iter(text).count(),
            ts_ignore: self.ts_suppression.find_iter(text).count(),
            eslint_disable: self.eslint_disable.find_iter(text).count(),
        }
    }
}

impl Default for SignalPatterns {
    fn default() -> Self {
        Self::new()
    }
}
