//! Markdown reporter
//!
//! Produces the `IHS.md` health report: overview and verdict, one section per
//! scoring dimension, prioritized next actions and the raw data snapshot.

use super::OUTPUT_TAIL_LINES;
use crate::checks::{tail_lines, CheckKind, CheckOutcome, CheckStatus};
use crate::models::HealthReport;
use crate::scoring::ScoringPolicy;
use anyhow::Result;

/// Render report as Markdown
pub fn render(report: &HealthReport) -> Result<String> {
    let mut md = String::new();

    md.push_str(&render_header(report));
    md.push('\n');
    md.push_str(&render_overview(report));
    md.push('\n');
    md.push_str(&render_corrosion(report));
    md.push('\n');
    md.push_str(&render_testing(report));
    md.push('\n');
    md.push_str(&render_documentation(report));
    md.push('\n');
    md.push_str(&render_verdict(report));
    md.push('\n');
    md.push_str(&render_next_actions());
    md.push('\n');
    md.push_str(&render_raw_data(report)?);

    Ok(md)
}

fn render_header(report: &HealthReport) -> String {
    let ctx = &report.context;
    format!(
        r#"# IHS Repository Health Report

- Generated: {}
- Branch: `{}`
- Commit: `{}`
- Framework: IHS (IDE Harness Score)
"#,
        ctx.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        ctx.branch,
        ctx.commit
    )
}

fn render_overview(report: &HealthReport) -> String {
    let s = &report.scores;
    let w = &ScoringPolicy::STANDARD.overall;
    let mut md = String::from("## 1) Overview\n\n");

    md.push_str(&format!("- **IHS score**: **{:.1}/100**\n", s.overall));
    md.push_str(&format!("- **Health**: **{} ({})**\n", s.health, s.verdict));
    md.push_str(&format!("- **Trend (vs HEAD~1)**: **{}**\n", s.trend));
    match (s.static_previous, s.trend_delta) {
        (Some(previous), Some(delta)) => md.push_str(&format!(
            "- Static score: current `{:.1}` vs previous `{:.1}` (Δ `{:.1}`)\n",
            s.static_current, previous, delta
        )),
        _ => md.push_str("- Static score: no previous commit available, this run is the baseline.\n"),
    }

    md.push_str("\n| Dimension | Score | Weight |\n");
    md.push_str("| --- | ---: | ---: |\n");
    md.push_str(&format!("| Code corrosion | {:.1} | {}% |\n", s.corrosion, percent(w.corrosion)));
    md.push_str(&format!("| Testing signal | {:.1} | {}% |\n", s.testing, percent(w.testing)));
    md.push_str(&format!(
        "| Documentation alignment | {:.1} | {}% |\n",
        s.documentation,
        percent(w.documentation)
    ));
    md
}

fn render_corrosion(report: &HealthReport) -> String {
    let c = &report.current;
    format!(
        r#"## 2) Code Corrosion

- Source files: `{}`
- Non-blank source lines: `{}`
- Debt markers (TODO/FIXME/HACK/XXX): `{}`
- `any` usages: `{}`
- `@ts-ignore` / `@ts-nocheck`: `{}`
- `eslint-disable`: `{}`
- Large files (>{} lines): `{}`
"#,
        c.source_files,
        c.source_loc,
        c.debt_markers,
        c.any_usage,
        c.ts_ignore,
        c.eslint_disable,
        crate::snapshot::LARGE_FILE_LINES,
        c.large_files
    )
}

fn render_testing(report: &HealthReport) -> String {
    let mut md = String::from("## 3) Testing Signal\n\n");
    md.push_str(&format!("- Test files: `{}`\n", report.current.test_files));
    md.push_str(&format!("- Test/source ratio: `{}`\n", report.test_source_ratio()));

    let coverage = report
        .runtime
        .coverage
        .map(|c| {
            [
                ("lines", c.lines),
                ("statements", c.statements),
                ("branches", c.branches),
                ("functions", c.functions),
            ]
            .iter()
            .filter_map(|(name, pct)| pct.map(|p| format!("{}={}%", name, p)))
            .collect::<Vec<_>>()
            .join(", ")
        })
        .unwrap_or_else(|| "unavailable".to_string());
    md.push_str(&format!("- Coverage summary: {}\n", coverage));

    md.push_str("\n| Check | Command | Result | Duration (s) |\n");
    md.push_str("| --- | --- | --- | ---: |\n");
    for kind in CheckKind::ALL {
        let outcome = report.runtime.outcome(kind);
        let (command, duration) = match &outcome.result {
            Some(r) => (format!("`{}`", r.command), format!("{:.2}", r.duration_secs)),
            None => ("-".to_string(), "-".to_string()),
        };
        md.push_str(&format!(
            "| {} | {} | `{}` | {} |\n",
            check_title(kind),
            command,
            outcome.status,
            duration
        ));
    }

    for kind in CheckKind::ALL {
        let outcome = report.runtime.outcome(kind);
        if outcome.status == CheckStatus::Fail {
            md.push_str(&render_failure_output(kind, outcome));
        }
    }
    md
}

fn render_failure_output(kind: CheckKind, outcome: &CheckOutcome) -> String {
    let Some(result) = &outcome.result else {
        return String::new();
    };
    let mut md = format!("\n### {} output\n", check_title(kind));
    if result.timed_out {
        md.push_str("\nThe command timed out and was killed.\n");
    }
    for (stream, text) in [("stdout", &result.stdout), ("stderr", &result.stderr)] {
        if text.is_empty() {
            continue;
        }
        md.push_str(&format!(
            "\n{} (last {} lines):\n\n```text\n{}\n```\n",
            stream,
            OUTPUT_TAIL_LINES,
            tail_lines(text, OUTPUT_TAIL_LINES)
        ));
    }
    md
}

fn render_documentation(report: &HealthReport) -> String {
    let a = &report.doc_alignment;
    let f = &report.doc_freshness;
    let mut md = String::from("## 4) Documentation Alignment\n\n");

    md.push_str(&format!(
        "- Tracked docs present: `{}/{}`\n",
        report.current.doc_files_present, report.tracked_docs
    ));
    md.push_str(&format!(
        "- Recent commit alignment: `{}/{}` = `{}`\n",
        a.docs_commits, a.code_commits, a.ratio
    ));
    md.push_str(&format!(
        "- Freshness (<= {} days): `{}/{}`\n",
        report.freshness_days, f.fresh_docs, f.present_docs
    ));

    if !f.days_old.is_empty() {
        md.push_str("\n| Document | Days since last commit |\n");
        md.push_str("| --- | ---: |\n");
        for (doc, days) in &f.days_old {
            md.push_str(&format!("| `{}` | {:.1} |\n", doc, days));
        }
    }
    md
}

fn render_verdict(report: &HealthReport) -> String {
    let s = &report.scores;
    let policy = ScoringPolicy::STANDARD;
    format!(
        r#"## 5) Technical Debt Verdict

- Verdict: **{}**
- Trend: **{}**
- Rule: the verdict is good when the overall score is >= {}, otherwise bad; the trend compares static scores against HEAD~1.
"#,
        s.verdict, s.trend, policy.good_verdict
    )
}

fn render_next_actions() -> String {
    let target = ScoringPolicy::STANDARD.target_test_ratio;
    format!(
        r#"## 6) Next Actions

1. Reduce `any` and `eslint-disable`: confine type-system escapes to boundary layers.
2. Raise the test/source ratio to >= {}, covering core services first.
3. Update `docs/` and `AGENTS.md` alongside core code changes to lift doc alignment to >= 0.8.
4. Keep type-check, unit tests and coverage as a continuous gate.
"#,
        target
    )
}

fn render_raw_data(report: &HealthReport) -> Result<String> {
    Ok(format!(
        "## 7) Raw Data\n\n```json\n{}\n```\n",
        super::json::render(report)?
    ))
}

fn check_title(kind: CheckKind) -> &'static str {
    match kind {
        CheckKind::TypeCheck => "Type Check",
        CheckKind::UnitTest => "Unit Test",
        CheckKind::Coverage => "Coverage",
    }
}

fn percent(weight: f64) -> i64 {
    (weight * 100.0).round() as i64
}
