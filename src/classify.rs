//! Path classification
//!
//! Decides whether a repository-relative path is source code, a test,
//! tracked documentation, or something else. Classification is purely
//! lexical: it never touches the filesystem.

use crate::config::LayoutConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Directory segment that marks co-located tests
const TESTS_SEGMENT: &str = "/__tests__/";

/// Kind of file a path refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    Source,
    Test,
    Doc,
    Other,
}

impl std::fmt::Display for PathKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathKind::Source => write!(f, "source"),
            PathKind::Test => write!(f, "test"),
            PathKind::Doc => write!(f, "doc"),
            PathKind::Other => write!(f, "other"),
        }
    }
}

/// Classifies repository-relative, `/`-separated paths.
#[derive(Debug, Clone)]
pub struct PathClassifier {
    code_prefixes: Vec<String>,
    test_prefixes: Vec<String>,
    doc_prefixes: Vec<String>,
    tracked_docs: Vec<String>,
    tracked_set: HashSet<String>,
    source_extensions: HashSet<String>,
}

impl PathClassifier {
    pub fn new(layout: &LayoutConfig) -> Self {
        Self {
            code_prefixes: layout.code_prefixes.clone(),
            test_prefixes: layout.test_prefixes.clone(),
            doc_prefixes: layout.doc_prefixes.clone(),
            tracked_docs: layout.tracked_docs.clone(),
            tracked_set: layout.tracked_docs.iter().cloned().collect(),
            source_extensions: layout
                .source_extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .collect(),
        }
    }

    /// Classify a path. Source takes precedence over doc, test over doc.
    pub fn classify(&self, path: &str) -> PathKind {
        if self.is_source(path) {
            PathKind::Source
        } else if self.is_test(path) {
            PathKind::Test
        } else if self.is_doc(path) {
            PathKind::Doc
        } else {
            PathKind::Other
        }
    }

    /// Code-rooted, source extension, and not a test
    pub fn is_source(&self, path: &str) -> bool {
        self.is_code_rooted(path) && self.has_source_extension(path) && !self.is_test(path)
    }

    pub fn is_test(&self, path: &str) -> bool {
        if starts_with_any(path, &self.test_prefixes) {
            return true;
        }
        if path.contains(TESTS_SEGMENT) {
            return true;
        }
        self.has_test_file_name(path)
    }

    /// Tracked documentation, or anything under a doc prefix
    pub fn is_doc(&self, path: &str) -> bool {
        self.is_tracked_doc(path) || starts_with_any(path, &self.doc_prefixes)
    }

    pub fn is_tracked_doc(&self, path: &str) -> bool {
        self.tracked_set.contains(path)
    }

    /// Under a code prefix, regardless of extension
    pub fn is_code_rooted(&self, path: &str) -> bool {
        starts_with_any(path, &self.code_prefixes)
    }

    pub fn has_source_extension(&self, path: &str) -> bool {
        extension(path).is_some_and(|ext| self.source_extensions.contains(ext))
    }

    /// Tracked docs in configuration order
    pub fn tracked_docs(&self) -> &[String] {
        &self.tracked_docs
    }

    /// `name.test.ts`, `name.spec.jsx`, ...
    fn has_test_file_name(&self, path: &str) -> bool {
        let Some(ext) = extension(path) else {
            return false;
        };
        if !self.source_extensions.contains(ext) {
            return false;
        }
        let file_name = path.rsplit('/').next().unwrap_or(path);
        let Some(stem) = file_name.strip_suffix(ext).and_then(|s| s.strip_suffix('.')) else {
            return false;
        };
        stem.ends_with(".test") || stem.ends_with(".spec")
    }
}

fn starts_with_any(path: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
}

fn extension(path: &str) -> Option<&str> {
    Path::new(path).extension().and_then(|e| e.to_str())
}
