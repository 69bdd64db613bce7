//! Runtime verification checks
//!
//! Runs the project's type-check, unit-test and coverage commands one after
//! another and records how each went. A failing or hanging command fails only
//! its own check; nothing here aborts the pipeline.

mod coverage;
mod process;

pub use coverage::CoverageSummary;
pub use process::{run_command, tail_lines, CommandResult};

use crate::config::ChecksConfig;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// The three runtime checks, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    TypeCheck,
    UnitTest,
    Coverage,
}

impl CheckKind {
    pub const ALL: [CheckKind; 3] = [CheckKind::TypeCheck, CheckKind::UnitTest, CheckKind::Coverage];
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckKind::TypeCheck => write!(f, "type_check"),
            CheckKind::UnitTest => write!(f, "unit_test"),
            CheckKind::Coverage => write!(f, "coverage"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::Pass => write!(f, "pass"),
            CheckStatus::Fail => write!(f, "fail"),
            CheckStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// Status of one check plus the command that produced it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckOutcome {
    pub status: CheckStatus,
    /// Absent when the check was skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<CommandResult>,
}

impl CheckOutcome {
    pub fn skipped() -> Self {
        Self {
            status: CheckStatus::Skipped,
            result: None,
        }
    }

    pub fn from_result(result: CommandResult) -> Self {
        let status = if result.passed() {
            CheckStatus::Pass
        } else {
            CheckStatus::Fail
        };
        Self {
            status,
            result: Some(result),
        }
    }
}

/// Outcomes of all runtime checks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuntimeResult {
    pub type_check: CheckOutcome,
    pub unit_test: CheckOutcome,
    pub coverage_check: CheckOutcome,
    /// Parsed coverage summary, when the artifact was usable
    pub coverage: Option<CoverageSummary>,
}

impl RuntimeResult {
    pub fn skipped() -> Self {
        Self {
            type_check: CheckOutcome::skipped(),
            unit_test: CheckOutcome::skipped(),
            coverage_check: CheckOutcome::skipped(),
            coverage: None,
        }
    }

    pub fn outcome(&self, kind: CheckKind) -> &CheckOutcome {
        match kind {
            CheckKind::TypeCheck => &self.type_check,
            CheckKind::UnitTest => &self.unit_test,
            CheckKind::Coverage => &self.coverage_check,
        }
    }

    /// Line coverage percentage used for scoring
    pub fn coverage_pct(&self) -> Option<f64> {
        self.coverage.and_then(|c| c.lines)
    }
}

/// Runs the configured check commands in sequence.
#[derive(Debug, Clone)]
pub struct RuntimeCheckRunner {
    working_dir: PathBuf,
    coverage_summary: PathBuf,
    commands: [(CheckKind, Vec<String>); 3],
    timeout_secs: u64,
}

impl RuntimeCheckRunner {
    pub fn new(config: &ChecksConfig, repo_root: &Path) -> Self {
        Self {
            working_dir: config.checks_dir(repo_root),
            coverage_summary: config.coverage_summary_path(repo_root),
            commands: [
                (CheckKind::TypeCheck, config.type_check.clone()),
                (CheckKind::UnitTest, config.unit_test.clone()),
                (CheckKind::Coverage, config.coverage.clone()),
            ],
            timeout_secs: config.timeout_secs,
        }
    }

    /// Override the per-check timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Run every check, or none when `skip` is set.
    pub fn run(&self, skip: bool) -> RuntimeResult {
        if skip {
            info!("Runtime checks skipped");
            return RuntimeResult::skipped();
        }

        // A stale artifact must not be mistaken for this run's coverage
        if self.coverage_summary.exists() {
            if let Err(e) = std::fs::remove_file(&self.coverage_summary) {
                warn!(
                    "Failed to remove stale coverage summary {}: {}",
                    self.coverage_summary.display(),
                    e
                );
            }
        }

        let [type_check, unit_test, coverage_check] = self
            .commands
            .each_ref()
            .map(|(kind, argv)| self.run_check(*kind, argv));

        RuntimeResult {
            type_check,
            unit_test,
            coverage_check,
            coverage: CoverageSummary::load(&self.coverage_summary),
        }
    }

    fn run_check(&self, kind: CheckKind, argv: &[String]) -> CheckOutcome {
        info!("Running {} check: {}", kind, argv.join(" "));
        let result = if self.working_dir.is_dir() {
            run_command(argv, &self.working_dir, self.timeout_secs)
        } else {
            CommandResult::not_run(
                argv,
                &self.working_dir,
                format!("Working directory {} does not exist", self.working_dir.display()),
            )
        };
        let outcome = CheckOutcome::from_result(result);
        debug!("{} check: {}", kind, outcome.status);
        outcome
    }
}
