//! Repository Health Scoring
//!
//! Turns snapshot counters, runtime check outcomes and documentation signals
//! into four scores, a health label and a trend against the previous commit.
//!
//! # Scoring Formula
//!
//! ```text
//! Corrosion     = 100 - Σ min(cap, rate_per_100_files × weight)
//! Testing       = 0.40 × TestRatio + 0.35 × CheckStatus + 0.25 × Coverage
//! Documentation = 0.45 × Presence + 0.35 × Alignment + 0.20 × Freshness
//! Overall       = 0.40 × Corrosion + 0.35 × Testing + 0.25 × Documentation
//!
//! Static        = 0.55 × Corrosion + 0.30 × TestRatio + 0.15 × Presence
//! ```
//!
//! # Corrosion Penalties (per 100 source files)
//!
//! - Debt markers (TODO/FIXME/HACK/XXX): 0.55 each, capped at 28
//! - `any` usage: 0.35 each, capped at 22
//! - `@ts-ignore` / `@ts-nocheck`: 1.4 each, capped at 20
//! - `eslint-disable`: 0.35 each, capped at 12
//! - Files over 400 lines: 0.7 each, capped at 18
//!
//! # Labels
//!
//! | Overall | Health     | Verdict |
//! |---------|------------|---------|
//! | ≥ 85    | excellent  | good    |
//! | ≥ 70    | controlled | good    |
//! | ≥ 55    | warning    | bad     |
//! | < 55    | high-risk  | bad     |
//!
//! The trend compares the static score of the working tree with that of
//! `HEAD~1`: a change above +1 is an improvement, below -1 a regression.

mod health_scorer;
mod policy;

pub use health_scorer::{clamp_score, HealthLabel, HealthScorer, ScoreBreakdown, Trend, Verdict};
pub use policy::{Penalty, ScoringPolicy};

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
