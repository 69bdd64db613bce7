//! Documentation freshness: age of each tracked doc since its last commit.

use crate::classify::PathClassifier;
use crate::scoring::round_to;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocFreshness {
    /// Tracked docs present in the working tree
    pub present_docs: usize,
    /// Present docs modified within the freshness window
    pub fresh_docs: usize,
    /// `fresh_docs / present_docs`, or 1.0 with nothing present
    pub fresh_ratio: f64,
    /// Age in days per doc with a resolvable last commit
    pub days_old: BTreeMap<String, f64>,
}

pub struct DocFreshnessAnalyzer<'a> {
    classifier: &'a PathClassifier,
    freshness_days: f64,
}

impl<'a> DocFreshnessAnalyzer<'a> {
    pub fn new(classifier: &'a PathClassifier, freshness_days: f64) -> Self {
        Self {
            classifier,
            freshness_days,
        }
    }

    /// Age every tracked doc that exists under `repo_root`.
    ///
    /// `last_modified` returns the time of the latest commit touching a path;
    /// a doc it cannot date is present but neither aged nor fresh.
    pub fn analyze<F>(&self, repo_root: &Path, mut last_modified: F, now: DateTime<Utc>) -> DocFreshness
    where
        F: FnMut(&str) -> Option<DateTime<Utc>>,
    {
        let mut present_docs = 0;
        let mut fresh_docs = 0;
        let mut days_old = BTreeMap::new();

        for doc in self.classifier.tracked_docs() {
            if !repo_root.join(doc).exists() {
                continue;
            }
            present_docs += 1;

            let Some(modified) = last_modified(doc) else {
                debug!("No commit found for {}", doc);
                continue;
            };
            let age = (now - modified).num_seconds() as f64 / SECONDS_PER_DAY;
            days_old.insert(doc.clone(), round_to(age, 1));
            if age <= self.freshness_days {
                fresh_docs += 1;
            }
        }

        let fresh_ratio = if present_docs == 0 {
            1.0
        } else {
            fresh_docs as f64 / present_docs as f64
        };

        DocFreshness {
            present_docs,
            fresh_docs,
            fresh_ratio: round_to(fresh_ratio, 3),
            days_old,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use chrono::Duration;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn write_docs(root: &Path, docs: &[&str]) {
        for doc in docs {
            let path = root.join(doc);
            std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
            std::fs::write(path, "doc").expect("write");
        }
    }

    #[test]
    fn test_fresh_and_stale_docs() {
        let dir = tempdir().expect("tempdir");
        write_docs(dir.path(), &["README.md", "AGENTS.md", "docs/Architecture.md"]);

        let now = Utc::now();
        let ages: HashMap<&str, DateTime<Utc>> = HashMap::from([
            ("README.md", now - Duration::days(10)),
            ("AGENTS.md", now - Duration::days(200)),
        ]);

        let classifier = PathClassifier::new(&LayoutConfig::default());
        let result = DocFreshnessAnalyzer::new(&classifier, 120.0)
            .analyze(dir.path(), |doc| ages.get(doc).copied(), now);

        assert_eq!(result.present_docs, 3);
        assert_eq!(result.fresh_docs, 1);
        assert_eq!(result.fresh_ratio, 0.333);
        assert_eq!(result.days_old.get("README.md"), Some(&10.0));
        assert_eq!(result.days_old.get("AGENTS.md"), Some(&200.0));
        // Undated doc has no age entry
        assert!(!result.days_old.contains_key("docs/Architecture.md"));
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let dir = tempdir().expect("tempdir");
        write_docs(dir.path(), &["README.md"]);

        let now = Utc::now();
        let classifier = PathClassifier::new(&LayoutConfig::default());
        let result = DocFreshnessAnalyzer::new(&classifier, 120.0)
            .analyze(dir.path(), |_| Some(now - Duration::days(120)), now);

        assert_eq!(result.fresh_docs, 1);
        assert_eq!(result.fresh_ratio, 1.0);
    }

    #[test]
    fn test_nothing_present_is_fully_fresh() {
        let dir = tempdir().expect("tempdir");
        let classifier = PathClassifier::new(&LayoutConfig::default());
        let result = DocFreshnessAnalyzer::new(&classifier, 120.0)
            .analyze(dir.path(), |_| None, Utc::now());

        assert_eq!(result.present_docs, 0);
        assert_eq!(result.fresh_ratio, 1.0);
        assert!(result.days_old.is_empty());
    }

    #[test]
    fn test_days_rounded_to_one_decimal() {
        let dir = tempdir().expect("tempdir");
        write_docs(dir.path(), &["README.md"]);

        let now = Utc::now();
        let classifier = PathClassifier::new(&LayoutConfig::default());
        let result = DocFreshnessAnalyzer::new(&classifier, 120.0)
            .analyze(dir.path(), |_| Some(now - Duration::hours(36)), now);

        assert_eq!(result.days_old.get("README.md"), Some(&1.5));
    }
}
