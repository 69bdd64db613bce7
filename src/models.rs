//! Report data model
//!
//! [`HealthReport`] is everything one scoring run produced. Reporters only
//! format it; they never compute new signals.

use crate::checks::RuntimeResult;
use crate::docs::{DocAlignment, DocFreshness};
use crate::scoring::{round_to, ScoreBreakdown};
use crate::snapshot::SnapshotMetrics;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Placeholder when git cannot tell us the branch or commit
pub const UNKNOWN: &str = "unknown";

/// Where and when a report was produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepoContext {
    pub repo_path: PathBuf,
    pub branch: String,
    pub commit: String,
    pub generated_at: DateTime<Utc>,
}

impl RepoContext {
    pub fn unknown(repo_path: PathBuf, generated_at: DateTime<Utc>) -> Self {
        Self {
            repo_path,
            branch: UNKNOWN.to_string(),
            commit: UNKNOWN.to_string(),
            generated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub context: RepoContext,
    pub scores: ScoreBreakdown,
    /// Working tree snapshot
    pub current: SnapshotMetrics,
    /// `HEAD~1` snapshot, absent on the first commit or outside git
    pub previous: Option<SnapshotMetrics>,
    pub runtime: RuntimeResult,
    pub doc_alignment: DocAlignment,
    pub doc_freshness: DocFreshness,
    /// Number of tracked documentation files configured
    pub tracked_docs: usize,
    /// Age in days within which a doc counts as fresh
    pub freshness_days: f64,
}

impl HealthReport {
    /// Test files per source file, three decimals
    pub fn test_source_ratio(&self) -> f64 {
        let basis = self.current.source_files.max(1);
        round_to(self.current.test_files as f64 / basis as f64, 3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_context() {
        let ctx = RepoContext::unknown(PathBuf::from("/repo"), Utc::now());
        assert_eq!(ctx.branch, "unknown");
        assert_eq!(ctx.commit, "unknown");
    }
}
