//! Health scorer
//!
//! Pure functions from collected signals to scores. Every score is clamped to
//! `[0, 100]` and rounded to one decimal before it is combined further.

use super::policy::ScoringPolicy;
use super::round_to;
use crate::checks::{CheckKind, CheckStatus, RuntimeResult};
use crate::docs::{DocAlignment, DocFreshness};
use crate::snapshot::SnapshotMetrics;
use serde::Serialize;
use tracing::{debug, info};

/// Clamp to `[0, 100]`, rounding in-range values to one decimal
pub fn clamp_score(value: f64) -> f64 {
    if value < 0.0 {
        0.0
    } else if value > 100.0 {
        100.0
    } else {
        round_to(value, 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HealthLabel {
    Excellent,
    Controlled,
    Warning,
    HighRisk,
}

impl std::fmt::Display for HealthLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthLabel::Excellent => write!(f, "excellent"),
            HealthLabel::Controlled => write!(f, "controlled"),
            HealthLabel::Warning => write!(f, "warning"),
            HealthLabel::HighRisk => write!(f, "high-risk"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Good,
    Bad,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Good => write!(f, "good"),
            Verdict::Bad => write!(f, "bad"),
        }
    }
}

/// Direction of the static score against the previous commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    #[serde(rename = "improved")]
    Improved,
    #[serde(rename = "worsened")]
    Worsened,
    #[serde(rename = "flat")]
    Flat,
    /// No previous revision to compare with
    #[serde(rename = "first-run baseline")]
    FirstRunBaseline,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Improved => write!(f, "improved"),
            Trend::Worsened => write!(f, "worsened"),
            Trend::Flat => write!(f, "flat"),
            Trend::FirstRunBaseline => write!(f, "first-run baseline"),
        }
    }
}

/// All scores for one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub overall: f64,
    pub corrosion: f64,
    pub testing: f64,
    pub documentation: f64,
    /// Test-to-source ratio sub-score
    pub test_ratio: f64,
    /// Static score of the working tree
    pub static_current: f64,
    /// Static score of the previous commit, if it resolved
    pub static_previous: Option<f64>,
    /// `static_current - static_previous`, one decimal
    pub trend_delta: Option<f64>,
    pub health: HealthLabel,
    pub verdict: Verdict,
    pub trend: Trend,
}

/// Scores snapshots against a [`ScoringPolicy`].
#[derive(Debug, Clone, Copy)]
pub struct HealthScorer<'a> {
    policy: &'a ScoringPolicy,
    /// Number of tracked documentation files configured
    tracked_docs: usize,
}

impl<'a> HealthScorer<'a> {
    pub fn new(policy: &'a ScoringPolicy, tracked_docs: usize) -> Self {
        Self {
            policy,
            tracked_docs,
        }
    }

    /// Calculate every score
    pub fn calculate(
        &self,
        current: &SnapshotMetrics,
        previous: Option<&SnapshotMetrics>,
        runtime: &RuntimeResult,
        alignment: &DocAlignment,
        freshness: &DocFreshness,
    ) -> ScoreBreakdown {
        let corrosion = self.corrosion(current);
        let test_ratio = self.test_ratio(current);
        let testing = self.testing(current, runtime);
        let documentation = self.documentation(current, alignment, freshness);
        let overall = self.overall(corrosion, testing, documentation);

        let static_current = self.static_trend(current);
        let static_previous = previous.map(|p| self.static_trend(p));
        let delta = static_previous.map(|prev| static_current - prev);
        let trend = self.trend(delta);

        debug!(
            "Scores: corrosion={:.1}, testing={:.1}, documentation={:.1}, test_ratio={:.1}",
            corrosion, testing, documentation, test_ratio
        );
        debug!(
            "Static trend: current={:.1}, previous={:?}",
            static_current, static_previous
        );

        let health = self.health_label(overall);
        let verdict = self.verdict(overall);
        info!("Overall score {:.1} ({}, {}), trend {}", overall, health, verdict, trend);

        ScoreBreakdown {
            overall,
            corrosion,
            testing,
            documentation,
            test_ratio,
            static_current,
            static_previous,
            trend_delta: delta.map(|d| round_to(d, 1)),
            health,
            verdict,
            trend,
        }
    }

    /// Code hygiene: 100 minus capped per-100-file penalties; 0 with no source
    pub fn corrosion(&self, snapshot: &SnapshotMetrics) -> f64 {
        let basis = snapshot.source_files;
        if basis == 0 {
            return 0.0;
        }

        let p = &self.policy.corrosion;
        let penalty = p.debt_markers.apply(snapshot.debt_markers, basis)
            + p.any_usage.apply(snapshot.any_usage, basis)
            + p.ts_ignore.apply(snapshot.ts_ignore, basis)
            + p.eslint_disable.apply(snapshot.eslint_disable, basis)
            + p.large_files.apply(snapshot.large_files, basis);

        clamp_score(100.0 - penalty)
    }

    /// Test files per source file, scaled so the target ratio scores 100
    pub fn test_ratio(&self, snapshot: &SnapshotMetrics) -> f64 {
        if snapshot.source_files == 0 {
            return 0.0;
        }
        let ratio = snapshot.test_files as f64 / snapshot.source_files as f64;
        clamp_score((ratio / self.policy.target_test_ratio * 100.0).min(100.0))
    }

    pub fn testing(&self, snapshot: &SnapshotMetrics, runtime: &RuntimeResult) -> f64 {
        let weights = &self.policy.testing;

        let status_total: f64 = CheckKind::ALL
            .iter()
            .map(|kind| self.status_score(runtime.outcome(*kind).status))
            .sum();
        let status_score = status_total / CheckKind::ALL.len() as f64;

        clamp_score(
            weights.test_ratio * self.test_ratio(snapshot)
                + weights.runtime_status * status_score
                + weights.coverage * self.coverage_score(runtime),
        )
    }

    /// Parsed line coverage when the coverage check passed, else a fallback
    pub fn coverage_score(&self, runtime: &RuntimeResult) -> f64 {
        let fallbacks = &self.policy.coverage_fallbacks;
        match runtime.coverage_check.status {
            CheckStatus::Pass => runtime
                .coverage_pct()
                .unwrap_or(fallbacks.passed_without_summary),
            CheckStatus::Skipped => fallbacks.skipped,
            CheckStatus::Fail => fallbacks.failed,
        }
    }

    pub fn documentation(
        &self,
        snapshot: &SnapshotMetrics,
        alignment: &DocAlignment,
        freshness: &DocFreshness,
    ) -> f64 {
        let weights = &self.policy.documentation;
        let alignment_score = (alignment.ratio * 100.0).min(100.0);
        let freshness_score = freshness.fresh_ratio * 100.0;

        clamp_score(
            weights.presence * self.presence(snapshot)
                + weights.alignment * alignment_score
                + weights.freshness * freshness_score,
        )
    }

    pub fn overall(&self, corrosion: f64, testing: f64, documentation: f64) -> f64 {
        let weights = &self.policy.overall;
        clamp_score(
            weights.corrosion * corrosion
                + weights.testing * testing
                + weights.documentation * documentation,
        )
    }

    /// Revision-comparable score needing no runtime checks or history
    pub fn static_trend(&self, snapshot: &SnapshotMetrics) -> f64 {
        let weights = &self.policy.static_trend;
        clamp_score(
            weights.corrosion * self.corrosion(snapshot)
                + weights.test_ratio * self.test_ratio(snapshot)
                + weights.presence * self.presence(snapshot),
        )
    }

    /// Percentage of tracked docs present; 0 when none are tracked
    pub fn presence(&self, snapshot: &SnapshotMetrics) -> f64 {
        if self.tracked_docs == 0 {
            return 0.0;
        }
        snapshot.doc_files_present as f64 / self.tracked_docs as f64 * 100.0
    }

    pub fn health_label(&self, overall: f64) -> HealthLabel {
        let t = &self.policy.health;
        if overall >= t.excellent {
            HealthLabel::Excellent
        } else if overall >= t.controlled {
            HealthLabel::Controlled
        } else if overall >= t.warning {
            HealthLabel::Warning
        } else {
            HealthLabel::HighRisk
        }
    }

    pub fn verdict(&self, overall: f64) -> Verdict {
        if overall >= self.policy.good_verdict {
            Verdict::Good
        } else {
            Verdict::Bad
        }
    }

    /// Classify a static-score delta; `None` means no previous revision
    pub fn trend(&self, delta: Option<f64>) -> Trend {
        let Some(delta) = delta else {
            return Trend::FirstRunBaseline;
        };
        if delta > self.policy.trend_threshold {
            Trend::Improved
        } else if delta < -self.policy.trend_threshold {
            Trend::Worsened
        } else {
            Trend::Flat
        }
    }

    fn status_score(&self, status: CheckStatus) -> f64 {
        let scores = &self.policy.status_scores;
        match status {
            CheckStatus::Pass => scores.pass,
            CheckStatus::Skipped => scores.skipped,
            CheckStatus::Fail => scores.fail,
        }
    }
}
