//! Fixed scoring policy
//!
//! Every weight, cap and threshold used by the scorer. The values are not
//! configurable per project so that scores from different runs and different
//! repositories remain comparable.

/// Penalty for one defect counter, applied to its rate per 100 source files
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penalty {
    /// Points deducted per occurrence per 100 source files
    pub weight: f64,
    /// Maximum points this counter can deduct
    pub cap: f64,
}

impl Penalty {
    /// Points deducted for `count` occurrences across `source_files` files
    pub fn apply(&self, count: usize, source_files: usize) -> f64 {
        let per_100 = count as f64 / source_files as f64 * 100.0;
        (per_100 * self.weight).min(self.cap)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrosionPenalties {
    pub debt_markers: Penalty,
    pub any_usage: Penalty,
    pub ts_ignore: Penalty,
    pub eslint_disable: Penalty,
    pub large_files: Penalty,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestingWeights {
    pub test_ratio: f64,
    pub runtime_status: f64,
    pub coverage: f64,
}

/// Score contributed by each check status
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusScores {
    pub pass: f64,
    pub skipped: f64,
    pub fail: f64,
}

/// Coverage score when no parsed line percentage is used
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageFallbacks {
    /// Coverage passed but produced no usable summary
    pub passed_without_summary: f64,
    pub skipped: f64,
    pub failed: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentationWeights {
    pub presence: f64,
    pub alignment: f64,
    pub freshness: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverallWeights {
    pub corrosion: f64,
    pub testing: f64,
    pub documentation: f64,
}

/// Weights of the revision-comparable static score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticTrendWeights {
    pub corrosion: f64,
    pub test_ratio: f64,
    pub presence: f64,
}

/// Lower bounds (inclusive) of each health label
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthThresholds {
    pub excellent: f64,
    pub controlled: f64,
    pub warning: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringPolicy {
    pub corrosion: CorrosionPenalties,
    /// Test-to-source ratio that earns the full test-ratio score
    pub target_test_ratio: f64,
    pub testing: TestingWeights,
    pub status_scores: StatusScores,
    pub coverage_fallbacks: CoverageFallbacks,
    pub documentation: DocumentationWeights,
    pub overall: OverallWeights,
    pub static_trend: StaticTrendWeights,
    pub health: HealthThresholds,
    /// Overall score at or above which the verdict is good
    pub good_verdict: f64,
    /// Static-score change beyond which the trend is not flat
    pub trend_threshold: f64,
    /// Docs modified within this many days are fresh
    pub freshness_days: f64,
}

impl ScoringPolicy {
    pub const STANDARD: ScoringPolicy = ScoringPolicy {
        corrosion: CorrosionPenalties {
            debt_markers: Penalty { weight: 0.55, cap: 28.0 },
            any_usage: Penalty { weight: 0.35, cap: 22.0 },
            ts_ignore: Penalty { weight: 1.4, cap: 20.0 },
            eslint_disable: Penalty { weight: 0.35, cap: 12.0 },
            large_files: Penalty { weight: 0.7, cap: 18.0 },
        },
        target_test_ratio: 0.35,
        testing: TestingWeights {
            test_ratio: 0.40,
            runtime_status: 0.35,
            coverage: 0.25,
        },
        status_scores: StatusScores {
            pass: 100.0,
            skipped: 50.0,
            fail: 0.0,
        },
        coverage_fallbacks: CoverageFallbacks {
            passed_without_summary: 75.0,
            skipped: 50.0,
            failed: 0.0,
        },
        documentation: DocumentationWeights {
            presence: 0.45,
            alignment: 0.35,
            freshness: 0.20,
        },
        overall: OverallWeights {
            corrosion: 0.40,
            testing: 0.35,
            documentation: 0.25,
        },
        static_trend: StaticTrendWeights {
            corrosion: 0.55,
            test_ratio: 0.30,
            presence: 0.15,
        },
        health: HealthThresholds {
            excellent: 85.0,
            controlled: 70.0,
            warning: 55.0,
        },
        good_verdict: 70.0,
        trend_threshold: 1.0,
        freshness_days: 120.0,
    };
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self::STANDARD
    }
}
