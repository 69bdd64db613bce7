//! JSON reporter
//!
//! Outputs the full HealthReport as pretty-printed JSON.
//! Useful for CI gates, piping to jq, or tracking scores over time.

use crate::models::HealthReport;
use anyhow::Result;

/// Render report as JSON
pub fn render(report: &HealthReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_json_render_valid() {
        let report = test_report();
        let json_str = render(&report).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");

        assert_eq!(parsed["scores"]["overall"], 72.4);
        assert_eq!(parsed["scores"]["health"], "controlled");
        assert_eq!(parsed["scores"]["verdict"], "good");
        assert_eq!(parsed["scores"]["trend"], "improved");
        assert_eq!(parsed["current"]["source_files"], 120);
        assert_eq!(parsed["runtime"]["unit_test"]["status"], "fail");
        assert_eq!(parsed["runtime"]["coverage"]["lines"], 64.2);
        assert_eq!(parsed["doc_freshness"]["days_old"]["README.md"], 3.5);
        assert_eq!(parsed["context"]["branch"], "main");
    }

    #[test]
    fn test_json_first_run_baseline() {
        let mut report = test_report();
        report.previous = None;
        report.scores.static_previous = None;
        report.scores.trend_delta = None;
        report.scores.trend = crate::scoring::Trend::FirstRunBaseline;

        let parsed: serde_json::Value =
            serde_json::from_str(&render(&report).expect("render JSON")).expect("parse JSON");
        assert!(parsed["previous"].is_null());
        assert!(parsed["scores"]["trend_delta"].is_null());
        assert_eq!(parsed["scores"]["trend"], "first-run baseline");
    }

    #[test]
    fn test_skipped_checks_have_no_command() {
        let mut report = test_report();
        report.runtime = crate::checks::RuntimeResult::skipped();

        let parsed: serde_json::Value =
            serde_json::from_str(&render(&report).expect("render JSON")).expect("parse JSON");
        assert_eq!(parsed["runtime"]["type_check"]["status"], "skipped");
        assert!(parsed["runtime"]["type_check"].get("result").is_none());
        assert!(parsed["runtime"]["coverage"].is_null());
    }
}
