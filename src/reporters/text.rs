//! Text (terminal) reporter with colors and formatting

use super::OUTPUT_TAIL_LINES;
use crate::checks::{tail_lines, CheckKind, CheckStatus};
use crate::models::HealthReport;
use crate::scoring::{HealthLabel, HealthScorer, ScoringPolicy, Trend};
use anyhow::Result;

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

fn health_color(health: HealthLabel) -> &'static str {
    match health {
        HealthLabel::Excellent => "\x1b[32m",  // Green
        HealthLabel::Controlled => "\x1b[92m", // Light green
        HealthLabel::Warning => "\x1b[33m",    // Yellow
        HealthLabel::HighRisk => "\x1b[31m",   // Red
    }
}

fn trend_marker(trend: Trend) -> &'static str {
    match trend {
        Trend::Improved => "\x1b[32m▲",
        Trend::Worsened => "\x1b[31m▼",
        Trend::Flat => "\x1b[90m=",
        Trend::FirstRunBaseline => "\x1b[90m•",
    }
}

fn status_color(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "\x1b[32m",
        CheckStatus::Fail => "\x1b[31m",
        CheckStatus::Skipped => "\x1b[90m",
    }
}

/// Render report as formatted terminal output
pub fn render(report: &HealthReport) -> Result<String> {
    let s = &report.scores;
    let ctx = &report.context;
    let mut out = String::new();

    // Header
    let health_c = health_color(s.health);
    out.push_str(&format!("\n{BOLD}IHS Health Report{RESET}\n"));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "{DIM}{} @ {}  {}{RESET}\n",
        ctx.branch,
        ctx.commit,
        ctx.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!(
        "Score: {BOLD}{:.1}/100{RESET}  Health: {health_c}{BOLD}{}{RESET} ({})  ",
        s.overall, s.health, s.verdict
    ));
    out.push_str(&format!("Trend: {}{RESET} {}", trend_marker(s.trend), s.trend));
    if let Some(delta) = s.trend_delta {
        out.push_str(&format!(" ({:+.1})", delta));
    }
    out.push_str("\n\n");

    // Dimension scores (compact)
    let policy = ScoringPolicy::STANDARD;
    let scorer = HealthScorer::new(&policy, report.tracked_docs);
    out.push_str(&format!("{BOLD}SCORES{RESET}\n"));
    out.push_str(&format!(
        "  Corrosion: {}  Testing: {}  Documentation: {}\n",
        format_score(&scorer, s.corrosion),
        format_score(&scorer, s.testing),
        format_score(&scorer, s.documentation)
    ));
    match s.static_previous {
        Some(prev) => out.push_str(&format!(
            "  {DIM}Static: {:.1} (previous {:.1}){RESET}\n\n",
            s.static_current, prev
        )),
        None => out.push_str(&format!(
            "  {DIM}Static: {:.1} (baseline){RESET}\n\n",
            s.static_current
        )),
    }

    // Code hygiene
    let c = &report.current;
    out.push_str(&format!("{BOLD}CODE{RESET}\n"));
    out.push_str(&format!(
        "  Source files: {}  LOC: {}  Large files: {}\n",
        c.source_files, c.source_loc, c.large_files
    ));
    out.push_str(&format!(
        "  Debt markers: {}  any: {}  @ts-ignore: {}  eslint-disable: {}\n\n",
        c.debt_markers, c.any_usage, c.ts_ignore, c.eslint_disable
    ));

    // Runtime checks
    out.push_str(&format!("{BOLD}CHECKS{RESET}\n"));
    out.push_str(&format!(
        "  Test files: {}  Test/source ratio: {}\n",
        c.test_files,
        report.test_source_ratio()
    ));
    for kind in CheckKind::ALL {
        let outcome = report.runtime.outcome(kind);
        let status_c = status_color(outcome.status);
        let timing = outcome
            .result
            .as_ref()
            .map(|r| format!("  {DIM}{:.1}s{RESET}", r.duration_secs))
            .unwrap_or_default();
        out.push_str(&format!(
            "  {:<12} {status_c}{:<8}{RESET}{}\n",
            kind.to_string(),
            outcome.status.to_string(),
            timing
        ));
    }
    match report.runtime.coverage_pct() {
        Some(pct) => out.push_str(&format!("  Line coverage: {}%\n", pct)),
        None => out.push_str(&format!("  {DIM}Line coverage: unavailable{RESET}\n")),
    }
    out.push('\n');

    // Failed check output
    for kind in CheckKind::ALL {
        let outcome = report.runtime.outcome(kind);
        let Some(result) = outcome.result.as_ref().filter(|_| outcome.status == CheckStatus::Fail)
        else {
            continue;
        };
        let tail = if result.stderr.is_empty() {
            &result.stdout
        } else {
            &result.stderr
        };
        if tail.is_empty() {
            continue;
        }
        out.push_str(&format!("{DIM}  {} output:{RESET}\n", kind));
        for line in tail_lines(tail, OUTPUT_TAIL_LINES).lines() {
            out.push_str(&format!("{DIM}    {}{RESET}\n", line));
        }
        out.push('\n');
    }

    // Documentation
    let a = &report.doc_alignment;
    let f = &report.doc_freshness;
    out.push_str(&format!("{BOLD}DOCS{RESET}\n"));
    out.push_str(&format!(
        "  Present: {}/{}  Alignment: {}/{} ({})  Fresh: {}/{}\n",
        c.doc_files_present,
        report.tracked_docs,
        a.docs_commits,
        a.code_commits,
        a.ratio,
        f.fresh_docs,
        f.present_docs
    ));
    for (doc, days) in &f.days_old {
        let stale = *days > report.freshness_days;
        let marker = if stale { "\x1b[33m" } else { DIM };
        out.push_str(&format!("  {marker}{:<40} {:>7.1} days{RESET}\n", doc, days));
    }
    out.push('\n');

    Ok(out)
}

/// Score colored by the health band it falls in
fn format_score(scorer: &HealthScorer<'_>, score: f64) -> String {
    let color = health_color(scorer.health_label(score));
    format!("{color}{:.1}{RESET}", score)
}
