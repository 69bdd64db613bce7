//! Documentation alignment: how often docs move together with code.

use crate::classify::PathClassifier;
use crate::git::{CommitInfo, GitHistory};
use crate::scoring::round_to;
use serde::Serialize;
use tracing::{debug, warn};

/// Code-touching and doc-touching commits in the recent window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DocAlignment {
    pub code_commits: usize,
    pub docs_commits: usize,
    /// `docs_commits / code_commits`, or 1.0 with no code commits
    pub ratio: f64,
}

impl DocAlignment {
    /// Result used when the commit history cannot be read
    pub fn unavailable() -> Self {
        Self {
            code_commits: 0,
            docs_commits: 0,
            ratio: 0.0,
        }
    }
}

pub struct DocAlignmentAnalyzer<'a> {
    classifier: &'a PathClassifier,
}

impl<'a> DocAlignmentAnalyzer<'a> {
    pub fn new(classifier: &'a PathClassifier) -> Self {
        Self { classifier }
    }

    /// Walk the `window` most recent commits of `history`.
    pub fn analyze(&self, history: &GitHistory, window: usize) -> DocAlignment {
        match history.get_recent_commits(window.max(1)) {
            Ok(commits) => self.analyze_commits(&commits),
            Err(e) => {
                warn!("Failed to read commit history: {}", e);
                DocAlignment::unavailable()
            }
        }
    }

    /// Count commits touching code and commits touching docs.
    ///
    /// A commit counts once per category however many files it changes.
    pub fn analyze_commits(&self, commits: &[CommitInfo]) -> DocAlignment {
        let mut code_commits = 0;
        let mut docs_commits = 0;

        for commit in commits.iter().filter(|c| !c.files_changed.is_empty()) {
            let files = &commit.files_changed;
            if files.iter().any(|p| self.classifier.is_code_rooted(p)) {
                code_commits += 1;
            }
            if files.iter().any(|p| self.classifier.is_doc(p)) {
                docs_commits += 1;
            }
        }

        let ratio = if code_commits == 0 {
            1.0
        } else {
            docs_commits as f64 / code_commits as f64
        };
        debug!(
            "Doc alignment over {} commits: {} code, {} docs",
            commits.len(),
            code_commits,
            docs_commits
        );

        DocAlignment {
            code_commits,
            docs_commits,
            ratio: round_to(ratio, 3),
        }
    }
}
