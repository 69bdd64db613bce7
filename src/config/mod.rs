//! Configuration module for IHS
//!
//! This module handles:
//! - Project layout (code, test and documentation roots)
//! - Tracked documentation files
//! - Runtime check commands and timeouts
//! - History window for documentation alignment
//!
//! Scoring weights are intentionally not part of the project config; they live
//! in [`crate::scoring::ScoringPolicy`] so scores stay comparable across runs.

mod project_config;

pub use project_config::{
    load_project_config,
    ChecksConfig,
    ConfigError,
    HistoryConfig,
    LayoutConfig,
    ProjectConfig,
    CONFIG_FILE_NAME,
    DEFAULT_CONFIG_TEMPLATE,
};
