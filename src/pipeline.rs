//! Scoring pipeline
//!
//! Collects every signal for one repository and scores it:
//!
//! 1. Snapshot of the working tree
//! 2. Snapshot of `HEAD~1`, when it resolves
//! 3. Runtime checks (type-check, unit tests, coverage)
//! 4. Documentation alignment over recent commits
//! 5. Documentation freshness
//! 6. Scores, health label and trend
//!
//! A repository without git history still scores: the previous snapshot is
//! absent, alignment is unavailable and no doc can be dated.

use crate::checks::RuntimeCheckRunner;
use crate::classify::PathClassifier;
use crate::config::ProjectConfig;
use crate::docs::{DocAlignment, DocAlignmentAnalyzer, DocFreshnessAnalyzer};
use crate::git::GitHistory;
use crate::models::{HealthReport, RepoContext};
use crate::scoring::{HealthScorer, ScoringPolicy};
use crate::snapshot::SnapshotCollector;
use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::{debug, info, warn};

/// Revision compared against the working tree
pub const PREVIOUS_REVISION: &str = "HEAD~1";

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Mark every runtime check skipped instead of running it
    pub skip_runtime_checks: bool,
    /// Recent commits inspected for doc alignment (clamped to at least 1)
    pub history_window: usize,
    /// Reference time for doc ages and the report timestamp
    pub now: DateTime<Utc>,
}

impl PipelineOptions {
    pub fn from_config(config: &ProjectConfig) -> Self {
        Self {
            skip_runtime_checks: false,
            history_window: config.history.window,
            now: Utc::now(),
        }
    }
}

/// Run every stage against `repo_root`.
///
/// `on_stage` is called with a short description before each stage starts.
pub fn run_pipeline(
    repo_root: &Path,
    config: &ProjectConfig,
    options: &PipelineOptions,
    mut on_stage: impl FnMut(&str),
) -> Result<HealthReport> {
    if !repo_root.is_dir() {
        bail!("Repository path is not a directory: {}", repo_root.display());
    }

    let policy = ScoringPolicy::STANDARD;
    let classifier = PathClassifier::new(&config.layout);
    let history = open_history(repo_root);

    on_stage("Scanning working tree");
    let collector = SnapshotCollector::new(&classifier, &config.layout);
    let current = collector.collect_current(repo_root);
    info!(
        "Current snapshot: {} source files, {} test files",
        current.source_files, current.test_files
    );

    on_stage("Scanning previous commit");
    let previous = history
        .as_ref()
        .and_then(|h| collector.collect_revision(h, PREVIOUS_REVISION));
    if previous.is_none() {
        info!("No previous revision, trend will be a first-run baseline");
    }

    on_stage("Running runtime checks");
    let runtime = RuntimeCheckRunner::new(&config.checks, repo_root).run(options.skip_runtime_checks);

    on_stage("Measuring documentation alignment");
    let doc_alignment = match &history {
        Some(h) => DocAlignmentAnalyzer::new(&classifier).analyze(h, options.history_window),
        None => DocAlignment::unavailable(),
    };

    on_stage("Measuring documentation freshness");
    let doc_freshness = DocFreshnessAnalyzer::new(&classifier, policy.freshness_days).analyze(
        repo_root,
        |doc| {
            let history = history.as_ref()?;
            match history.last_modified(doc) {
                Ok(modified) => modified,
                Err(e) => {
                    debug!("Failed to find last commit for {}: {}", doc, e);
                    None
                }
            }
        },
        options.now,
    );

    on_stage("Scoring");
    let tracked_docs = classifier.tracked_docs().len();
    let scores = HealthScorer::new(&policy, tracked_docs).calculate(
        &current,
        previous.as_ref(),
        &runtime,
        &doc_alignment,
        &doc_freshness,
    );

    let context = match history.as_ref().and_then(|h| h.head_info()) {
        Some(head) => RepoContext {
            repo_path: repo_root.to_path_buf(),
            branch: head.branch,
            commit: head.short_commit,
            generated_at: options.now,
        },
        None => RepoContext::unknown(repo_root.to_path_buf(), options.now),
    };

    Ok(HealthReport {
        context,
        scores,
        current,
        previous,
        runtime,
        doc_alignment,
        doc_freshness,
        tracked_docs,
        freshness_days: policy.freshness_days,
    })
}

fn open_history(repo_root: &Path) -> Option<GitHistory> {
    if !GitHistory::is_git_repo(repo_root) {
        warn!(
            "{} is not a git repository; history-based signals are unavailable",
            repo_root.display()
        );
        return None;
    }
    match GitHistory::open(repo_root) {
        Ok(history) => Some(history),
        Err(e) => {
            warn!("{:#}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::CheckStatus;
    use crate::git::test_repo::commit_files;
    use crate::scoring::Trend;
    use tempfile::tempdir;

    fn options() -> PipelineOptions {
        PipelineOptions {
            skip_runtime_checks: true,
            history_window: 40,
            now: Utc::now(),
        }
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let dir = tempdir().expect("tempdir");
        let missing = dir.path().join("nope");
        let err = run_pipeline(&missing, &ProjectConfig::default(), &options(), |_| {})
            .expect_err("should fail");
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_non_git_directory_still_scores() {
        let dir = tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("app/src")).expect("mkdir");
        std::fs::write(dir.path().join("app/src/index.ts"), "export {}\n").expect("write");
        std::fs::write(dir.path().join("README.md"), "# hi\n").expect("write");

        let report = run_pipeline(dir.path(), &ProjectConfig::default(), &options(), |_| {})
            .expect("pipeline");

        assert_eq!(report.current.source_files, 1);
        assert!(report.previous.is_none());
        assert_eq!(report.scores.trend, Trend::FirstRunBaseline);
        assert_eq!(report.doc_alignment, DocAlignment::unavailable());
        assert_eq!(report.doc_freshness.present_docs, 1);
        assert!(report.doc_freshness.days_old.is_empty());
        assert_eq!(report.context.branch, "unknown");
        assert_eq!(report.runtime.type_check.status, CheckStatus::Skipped);
    }

    #[test]
    fn test_two_commits_produce_a_trend() {
        let dir = tempdir().expect("tempdir");
        let repo = git2::Repository::init(dir.path()).expect("init");
        let now = Utc::now().timestamp();
        commit_files(
            &repo,
            &[
                ("app/src/a.ts", "// @ts-ignore\nconst a: any = 1;\n"),
                ("README.md", "# readme\n"),
            ],
            "first",
            now - 3600,
        )
        .expect("commit");
        commit_files(
            &repo,
            &[("app/src/a.ts", "export const a = 1;\n"), ("app/src/a.test.ts", "test()\n")],
            "clean up",
            now - 60,
        )
        .expect("commit");

        let mut stages = Vec::new();
        let report = run_pipeline(dir.path(), &ProjectConfig::default(), &options(), |s| {
            stages.push(s.to_string())
        })
        .expect("pipeline");

        assert_eq!(stages.len(), 6);
        let previous = report.previous.expect("previous snapshot");
        assert_eq!(previous.ts_ignore, 1);
        assert_eq!(report.current.ts_ignore, 0);
        assert_eq!(report.current.test_files, 1);
        assert_eq!(report.scores.trend, Trend::Improved);
        assert!(report.scores.trend_delta.is_some_and(|d| d > 1.0));

        assert_eq!(report.doc_alignment.code_commits, 2);
        assert_eq!(report.doc_alignment.docs_commits, 1);
        assert_eq!(report.doc_freshness.fresh_docs, 1);
        assert_ne!(report.context.commit, "unknown");
    }
}
