//! IHS (IDE Harness Score) - repository health scoring
//!
//! Scores a repository on three dimensions:
//! - Code corrosion: debt markers, type-system escapes and oversized files
//! - Testing signal: test/source ratio plus type-check, unit test and coverage runs
//! - Documentation alignment: presence, co-change with code and freshness of tracked docs
//!
//! The working tree is compared against `HEAD~1` to classify the trend.
//! [`pipeline::run_pipeline`] drives a full run; [`reporters`] renders the result.

pub mod checks;
pub mod classify;
pub mod config;
pub mod docs;
pub mod git;
pub mod models;
pub mod pipeline;
pub mod reporters;
pub mod scoring;
pub mod snapshot;
