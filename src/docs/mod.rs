//! Documentation signals
//!
//! Two independent measurements over the tracked documentation:
//! - alignment: share of recent code-touching commits that also touched docs
//! - freshness: how many present docs were modified recently

mod alignment;
mod freshness;

pub use alignment::{DocAlignment, DocAlignmentAnalyzer};
pub use freshness::{DocFreshness, DocFreshnessAnalyzer};
