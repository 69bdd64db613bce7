//! Snapshot collection
//!
//! A snapshot is the set of code-hygiene counters for one revision of the
//! repository: the current working tree, or a historical commit read through
//! git. Both are produced by the same per-file fold so they can be compared
//! directly by the trend classifier.

mod signals;

pub use signals::{SignalCounts, SignalPatterns};

use crate::classify::{PathClassifier, PathKind};
use crate::config::LayoutConfig;
use crate::git::GitHistory;
use ignore::WalkBuilder;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, warn};

/// Source files above this many lines count as large
pub const LARGE_FILE_LINES: usize = 400;

/// Counters accumulated over one revision
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SnapshotMetrics {
    pub source_files: usize,
    pub test_files: usize,
    /// Non-blank lines across source files
    pub source_loc: usize,
    pub debt_markers: usize,
    pub any_usage: usize,
    pub ts_ignore: usize,
    pub eslint_disable: usize,
    pub large_files: usize,
    /// Tracked documentation files present in this revision
    pub doc_files_present: usize,
}

/// Folds file contents into [`SnapshotMetrics`].
#[derive(Debug)]
pub struct SnapshotCollector<'a> {
    classifier: &'a PathClassifier,
    patterns: SignalPatterns,
    scan_roots: Vec<String>,
    doc_prefixes: Vec<String>,
}

impl<'a> SnapshotCollector<'a> {
    pub fn new(classifier: &'a PathClassifier, layout: &LayoutConfig) -> Self {
        Self {
            classifier,
            patterns: SignalPatterns::new(),
            scan_roots: layout.scan_roots.clone(),
            doc_prefixes: layout.doc_prefixes.clone(),
        }
    }

    /// Fold every path, reading its content through `reader`.
    ///
    /// Content the reader cannot produce counts as empty.
    pub fn collect<I, S, F>(&self, paths: I, mut reader: F) -> SnapshotMetrics
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnMut(&str) -> Option<String>,
    {
        let mut metrics = SnapshotMetrics::default();
        for path in paths {
            let path = path.as_ref();
            let text = reader(path).unwrap_or_default();
            self.fold(&mut metrics, path, &text);
        }
        metrics
    }

    /// Add one file's contribution to `metrics`.
    pub fn fold(&self, metrics: &mut SnapshotMetrics, path: &str, text: &str) {
        match self.classifier.classify(path) {
            PathKind::Source => {
                metrics.source_files += 1;
                metrics.source_loc += text.lines().filter(|line| !line.trim().is_empty()).count();

                let counts = self.patterns.count(text);
                metrics.debt_markers += counts.debt_markers;
                metrics.any_usage += counts.any_usage;
                metrics.ts_ignore += counts.ts_ignore;
                metrics.eslint_disable += counts.eslint_disable;

                if text.lines().count() > LARGE_FILE_LINES {
                    metrics.large_files += 1;
                }
            }
            PathKind::Test if self.classifier.has_source_extension(path) => metrics.test_files += 1,
            _ => {}
        }

        if self.classifier.is_tracked_doc(path) {
            metrics.doc_files_present += 1;
        }
    }

    /// Snapshot of the working tree under `repo_root`.
    ///
    /// Walks the scan roots keeping every source-extension file, including
    /// hidden and gitignored ones, then adds every tracked doc that exists
    /// on disk.
    pub fn collect_current(&self, repo_root: &Path) -> SnapshotMetrics {
        let paths = self.current_paths(repo_root);
        debug!("Current snapshot covers {} files", paths.len());
        self.collect(&paths, |path| read_lossy(&repo_root.join(path)))
    }

    /// Snapshot of `revision`, or `None` if the revision does not resolve.
    pub fn collect_revision(&self, history: &GitHistory, revision: &str) -> Option<SnapshotMetrics> {
        let tree = history.revision(revision)?;

        let mut pathspecs = self.scan_roots.clone();
        pathspecs.extend(self.doc_prefixes.iter().cloned());
        pathspecs.extend(self.classifier.tracked_docs().iter().cloned());

        let paths = match tree.list_paths(&pathspecs) {
            Ok(paths) => paths,
            Err(e) => {
                warn!("Failed to list files at {}: {}", revision, e);
                return None;
            }
        };

        let mut metrics = SnapshotMetrics::default();
        let mut folded = 0usize;
        for path in &paths {
            if !self.classifier.is_tracked_doc(path) && !self.classifier.has_source_extension(path) {
                continue;
            }
            let Some(text) = tree.read(path) else {
                debug!("Skipping unreadable blob {} at {}", path, revision);
                continue;
            };
            self.fold(&mut metrics, path, &text);
            folded += 1;
        }
        debug!("Snapshot of {} covers {} files", revision, folded);

        Some(metrics)
    }

    fn current_paths(&self, repo_root: &Path) -> Vec<String> {
        let mut paths = Vec::new();

        for root in &self.scan_roots {
            let dir = repo_root.join(root);
            if !dir.is_dir() {
                continue;
            }

            // Every file under the root, ignored or not
            let walker = WalkBuilder::new(&dir)
                .standard_filters(false)
                .hidden(false)
                .build();

            let mut found: Vec<String> = walker
                .filter_map(|e| e.ok())
                .filter(|e| e.path().is_file())
                .filter_map(|e| relative_posix(repo_root, e.path()))
                .filter(|path| self.classifier.has_source_extension(path))
                .collect();
            found.sort();
            paths.extend(found);
        }

        for doc in self.classifier.tracked_docs() {
            if repo_root.join(doc).is_file() {
                paths.push(doc.clone());
            }
        }

        paths
    }
}

fn relative_posix(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Some(parts.join("/"))
}

fn read_lossy(path: &Path) -> Option<String> {
    match std::fs::read(path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            debug!("Failed to read {}: {}", path.display(), e);
            None
        }
    }
}
