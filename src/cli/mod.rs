//! CLI command definitions and handlers

mod init;
mod score;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Parse and validate the history window (at least 1 commit)
fn parse_window(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("history window must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

/// IHS - IDE Harness Score
#[derive(Parser, Debug)]
#[command(name = "ihs")]
#[command(
    version,
    about = "Repository health scoring: code corrosion, testing signal and documentation alignment",
    long_about = "IHS scores a repository from 0 to 100 by combining code hygiene counters, \
runtime checks (type-check, unit tests, coverage) and how well tracked documentation \
keeps up with code changes. The working tree is compared against HEAD~1 to classify \
the trend.\n\n\
Run without a subcommand to score the current directory:\n  \
ihs .",
    after_help = "\
Examples:
  ihs .                                     Score current directory
  ihs score . --skip-runtime-checks         Static signals only
  ihs score . --format json                 JSON output for scripting
  ihs score . --format md                   Write IHS.md at the repo root
  ihs score . --fail-on-bad                 Exit code 1 on a bad verdict (CI mode)
  ihs init                                  Write a default ihs.toml"
)]
pub struct Cli {
    /// Path to repository (default: current directory)
    #[arg(global = true, default_value = ".")]
    pub path: PathBuf,

    /// Log level when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize an ihs.toml config file with the default layout
    Init,

    /// Score repository health (default command)
    #[command(after_help = "\
Examples:
  ihs score .                                   Text report on stdout
  ihs score . --format json -o ihs.json         JSON report written to a file
  ihs score . --format markdown                 Markdown report written to IHS.md
  ihs score . --history-window 100              Wider doc alignment window")]
    Score {
        /// Output format: text, json, markdown (or md)
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json", "markdown", "md"])]
        format: String,

        /// Output file path, relative to the repository root (default: stdout, or IHS.md for markdown)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Skip type-check, unit test and coverage commands
        #[arg(long)]
        skip_runtime_checks: bool,

        /// Recent commits inspected for documentation alignment (default: from ihs.toml)
        #[arg(long, value_parser = parse_window)]
        history_window: Option<usize>,

        /// Exit with code 1 when the verdict is bad
        #[arg(long)]
        fail_on_bad: bool,
    },
}

/// Run the CLI
pub fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Some(Commands::Init) => {
            init::run(&cli.path)?;
            Ok(ExitCode::SUCCESS)
        }

        Some(Commands::Score {
            format,
            output,
            skip_runtime_checks,
            history_window,
            fail_on_bad,
        }) => score::run(
            &cli.path,
            score::ScoreArgs {
                format: &format,
                output: output.as_deref(),
                skip_runtime_checks,
                history_window,
                fail_on_bad,
            },
        ),

        None => score::run(
            &cli.path,
            score::ScoreArgs {
                format: "text",
                output: None,
                skip_runtime_checks: false,
                history_window: None,
                fail_on_bad: false,
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_score() {
        let cli = Cli::try_parse_from(["ihs"]).expect("parse");
        assert!(cli.command.is_none());
        assert_eq!(cli.path, PathBuf::from("."));
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_score_flags() {
        let cli = Cli::try_parse_from([
            "ihs",
            "score",
            "/repo",
            "--format",
            "md",
            "-o",
            "out/report.md",
            "--skip-runtime-checks",
            "--history-window",
            "12",
            "--fail-on-bad",
        ])
        .expect("parse");
        assert_eq!(cli.path, PathBuf::from("/repo"));
        match cli.command {
            Some(Commands::Score {
                format,
                output,
                skip_runtime_checks,
                history_window,
                fail_on_bad,
            }) => {
                assert_eq!(format, "md");
                assert_eq!(output, Some(PathBuf::from("out/report.md")));
                assert!(skip_runtime_checks);
                assert_eq!(history_window, Some(12));
                assert!(fail_on_bad);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_zero_window_and_unknown_format() {
        assert!(Cli::try_parse_from(["ihs", "score", "--history-window", "0"]).is_err());
        assert!(Cli::try_parse_from(["ihs", "score", "--format", "sarif"]).is_err());
    }
}
