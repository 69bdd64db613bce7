//! Project-level configuration support
//!
//! Loads per-project configuration from `ihs.toml` or `.ihsrc.json` in the
//! repository root.
//!
//! # Configuration Format
//!
//! ```toml
//! # ihs.toml
//!
//! [layout]
//! code_prefixes = ["app/src/", "app/supabase/functions/"]
//! test_prefixes = ["app/cypress/", "app/src/test/"]
//! doc_prefixes = ["docs/"]
//! tracked_docs = ["AGENTS.md", "README.md", "docs/Architecture.md"]
//! source_extensions = ["ts", "tsx", "js", "jsx"]
//! scan_roots = ["app/src", "app/supabase/functions", "app/cypress"]
//!
//! [checks]
//! working_dir = "app"
//! type_check = ["npm", "run", "type-check"]
//! timeout_secs = 2400
//!
//! [history]
//! window = 40
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Preferred config file name at the repository root
pub const CONFIG_FILE_NAME: &str = "ihs.toml";

const JSON_CONFIG_FILE_NAME: &str = ".ihsrc.json";

/// Errors raised while reading a project config file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML in {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Project-level configuration loaded from ihs.toml or .ihsrc.json
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct ProjectConfig {
    /// Where code, tests and docs live
    #[serde(default)]
    pub layout: LayoutConfig,

    /// External verification commands
    #[serde(default)]
    pub checks: ChecksConfig,

    /// Commit history settings
    #[serde(default)]
    pub history: HistoryConfig,
}

/// Repository layout used by path classification and snapshot collection
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LayoutConfig {
    /// Prefixes under which files count as source code
    #[serde(default = "default_code_prefixes")]
    pub code_prefixes: Vec<String>,

    /// Prefixes under which every file counts as a test
    #[serde(default = "default_test_prefixes")]
    pub test_prefixes: Vec<String>,

    /// Prefixes under which every file counts as documentation
    #[serde(default = "default_doc_prefixes")]
    pub doc_prefixes: Vec<String>,

    /// Documentation files whose presence and freshness are scored
    #[serde(default = "default_tracked_docs")]
    pub tracked_docs: Vec<String>,

    /// Source file extensions, without the leading dot
    #[serde(default = "default_source_extensions")]
    pub source_extensions: Vec<String>,

    /// Directories walked when collecting the current snapshot
    #[serde(default = "default_scan_roots")]
    pub scan_roots: Vec<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            code_prefixes: default_code_prefixes(),
            test_prefixes: default_test_prefixes(),
            doc_prefixes: default_doc_prefixes(),
            tracked_docs: default_tracked_docs(),
            source_extensions: default_source_extensions(),
            scan_roots: default_scan_roots(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_code_prefixes() -> Vec<String> {
    strings(&["app/src/", "app/supabase/functions/"])
}
fn default_test_prefixes() -> Vec<String> {
    strings(&["app/cypress/", "app/src/test/"])
}
fn default_doc_prefixes() -> Vec<String> {
    strings(&["docs/"])
}
fn default_tracked_docs() -> Vec<String> {
    strings(&[
        "AGENTS.md",
        "README.md",
        "docs/Architecture.md",
        "docs/Epics.yaml",
        "app/README.md",
        "app/supabase/SUPABASE_COOKBOOK.md",
    ])
}
fn default_source_extensions() -> Vec<String> {
    strings(&["ts", "tsx", "js", "jsx"])
}
fn default_scan_roots() -> Vec<String> {
    strings(&["app/src", "app/supabase/functions", "app/cypress"])
}

/// Runtime check commands, each given as an argv array
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ChecksConfig {
    /// Directory (relative to the repo root) the commands run in
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,

    #[serde(default = "default_type_check")]
    pub type_check: Vec<String>,

    #[serde(default = "default_unit_test")]
    pub unit_test: Vec<String>,

    #[serde(default = "default_coverage")]
    pub coverage: Vec<String>,

    /// Coverage summary artifact, relative to `working_dir`
    #[serde(default = "default_coverage_summary")]
    pub coverage_summary: PathBuf,

    /// Per-check timeout in seconds (0 = no timeout)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            working_dir: default_working_dir(),
            type_check: default_type_check(),
            unit_test: default_unit_test(),
            coverage: default_coverage(),
            coverage_summary: default_coverage_summary(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_working_dir() -> PathBuf {
    PathBuf::from("app")
}
fn default_type_check() -> Vec<String> {
    strings(&["npm", "run", "type-check"])
}
fn default_unit_test() -> Vec<String> {
    strings(&["npm", "run", "test"])
}
fn default_coverage() -> Vec<String> {
    strings(&["npm", "run", "coverage", "--", "--coverage.reporter=json-summary"])
}
fn default_coverage_summary() -> PathBuf {
    PathBuf::from("coverage/coverage-summary.json")
}
fn default_timeout_secs() -> u64 {
    2400
}

/// Commit history settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HistoryConfig {
    /// Number of recent commits inspected for documentation alignment
    #[serde(default = "default_history_window")]
    pub window: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            window: default_history_window(),
        }
    }
}

fn default_history_window() -> usize {
    40
}

/// Template written by `ihs init`
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# IHS (IDE Harness Score) configuration
# Scoring weights are fixed; only the project layout is configurable.

[layout]
# Files under these prefixes with a source extension count as source code
code_prefixes = ["app/src/", "app/supabase/functions/"]
# Everything under these prefixes counts as a test
test_prefixes = ["app/cypress/", "app/src/test/"]
# Everything under these prefixes counts as documentation
doc_prefixes = ["docs/"]
# Documentation whose presence and freshness is scored
tracked_docs = [
    "AGENTS.md",
    "README.md",
    "docs/Architecture.md",
    "docs/Epics.yaml",
    "app/README.md",
    "app/supabase/SUPABASE_COOKBOOK.md",
]
source_extensions = ["ts", "tsx", "js", "jsx"]
# Directories walked for the current snapshot
scan_roots = ["app/src", "app/supabase/functions", "app/cypress"]

[checks]
working_dir = "app"
type_check = ["npm", "run", "type-check"]
unit_test = ["npm", "run", "test"]
coverage = ["npm", "run", "coverage", "--", "--coverage.reporter=json-summary"]
# Relative to working_dir
coverage_summary = "coverage/coverage-summary.json"
timeout_secs = 2400

[history]
# Recent commits inspected for docs alignment
window = 40
"#;

/// Load project configuration from the repository root.
///
/// Searches for configuration files in this order:
/// 1. `ihs.toml`
/// 2. `.ihsrc.json`
///
/// Returns default configuration if no config file is found or the file
/// found cannot be parsed.
pub fn load_project_config(repo_path: &Path) -> ProjectConfig {
    let toml_path = repo_path.join(CONFIG_FILE_NAME);
    if toml_path.exists() {
        match load_toml_config(&toml_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", toml_path.display());
                return config;
            }
            Err(e) => warn!("{}", e),
        }
    }

    let json_path = repo_path.join(JSON_CONFIG_FILE_NAME);
    if json_path.exists() {
        match load_json_config(&json_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", json_path.display());
                return config;
            }
            Err(e) => warn!("{}", e),
        }
    }

    debug!("No project config found, using defaults");
    ProjectConfig::default()
}

fn read_config(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Load configuration from a TOML file
fn load_toml_config(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = read_config(path)?;
    toml::from_str(&content).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

/// Load configuration from a JSON file
fn load_json_config(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = read_config(path)?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

impl ChecksConfig {
    /// Absolute directory the runtime checks run in
    pub fn checks_dir(&self, repo_root: &Path) -> PathBuf {
        repo_root.join(&self.working_dir)
    }

    /// Absolute path of the coverage summary artifact
    pub fn coverage_summary_path(&self, repo_root: &Path) -> PathBuf {
        self.checks_dir(repo_root).join(&self.coverage_summary)
    }
}
