//! Score command - run the pipeline and emit the report

use anyhow::{Context, Result};
use console::style;
use ihs::config::load_project_config;
use ihs::git::GitHistory;
use ihs::pipeline::{run_pipeline, PipelineOptions};
use ihs::reporters::{self, OutputFormat};
use ihs::scoring::Verdict;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Default markdown report file at the repository root
const MARKDOWN_REPORT_NAME: &str = "IHS.md";

pub(super) struct ScoreArgs<'a> {
    pub format: &'a str,
    pub output: Option<&'a Path>,
    pub skip_runtime_checks: bool,
    pub history_window: Option<usize>,
    pub fail_on_bad: bool,
}

/// Run the score command
pub(super) fn run(path: &Path, args: ScoreArgs<'_>) -> Result<ExitCode> {
    let format = OutputFormat::from_str(args.format)?;
    let repo_root = resolve_repo_root(path)?;
    info!("Scoring {}", repo_root.display());

    let config = load_project_config(&repo_root);
    let mut options = PipelineOptions::from_config(&config);
    options.skip_runtime_checks = args.skip_runtime_checks;
    if let Some(window) = args.history_window {
        options.history_window = window;
    }

    // Keep stdout clean for machine-readable output
    let spinner = if format == OutputFormat::Json {
        ProgressBar::hidden()
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(create_spinner_style());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    };

    let report = run_pipeline(&repo_root, &config, &options, |stage| {
        spinner.set_message(format!("{}...", stage));
    });
    spinner.finish_and_clear();
    let report = report?;

    let output = reporters::report_with_format(&report, format)?;

    match output_path(&repo_root, format, args.output) {
        Some(out_path) => {
            write_report(&out_path, format, &output)?;
            eprintln!(
                "{} Report written to: {}",
                style("✓").green(),
                style(out_path.display()).cyan()
            );
        }
        None => println!("{}", output),
    }

    if args.fail_on_bad && report.scores.verdict == Verdict::Bad {
        debug!("Verdict is bad, exiting with code 1");
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

/// Canonical repository root: the git working directory when `path` is
/// inside a repository, otherwise `path` itself.
fn resolve_repo_root(path: &Path) -> Result<PathBuf> {
    let path = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;
    if !path.is_dir() {
        anyhow::bail!("Path is not a directory: {}", path.display());
    }

    if GitHistory::is_git_repo(&path) {
        let history = GitHistory::open(&path)?;
        if let Ok(root) = history.repo_root() {
            return root
                .canonicalize()
                .with_context(|| format!("Failed to resolve {}", root.display()));
        }
    }
    Ok(path)
}

/// Where the report goes: `None` means stdout.
fn output_path(repo_root: &Path, format: OutputFormat, output: Option<&Path>) -> Option<PathBuf> {
    match output {
        Some(p) if p.is_absolute() => Some(p.to_path_buf()),
        Some(p) => Some(repo_root.join(p)),
        None if format == OutputFormat::Markdown => Some(repo_root.join(MARKDOWN_REPORT_NAME)),
        None => None,
    }
}

fn write_report(out_path: &Path, format: OutputFormat, output: &str) -> Result<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    // Terminal colors make no sense in a file
    let content = match format {
        OutputFormat::Text => console::strip_ansi_codes(output).into_owned(),
        _ => output.to_string(),
    };
    std::fs::write(out_path, content)
        .with_context(|| format!("Failed to write report to {}", out_path.display()))
}

/// Create spinner progress style
fn create_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} {msg}")
        .expect("valid template")
}
