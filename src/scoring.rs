// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Fare Regulator Simulation Suite - Scoring Engine

//! Turns a completed three-year term into the final score.
//!
//! ```text
//! score = round(w_sat * (avg_sat/100)^2 * 100
//!             + w_profit * clamp(50 + 50 * avg_profit / benchmark, 0, 100)
//!             + w_strat * (adherence + 3) / 6 * 100)
//! ```
//!
//! The input is a fixed-size array, so a term with fewer or more than three
//! results cannot be scored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::ScenarioCatalog;
use crate::config::{EngineConfig, ScoringPolicy};
use crate::money::{from_decimal, to_decimal};
use crate::types::{FinalScoreReport, IdealAction, SubScores, Year, YearAdherence, YearResult};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("result for year {0} has no scenario in the catalog")]
    UnknownYear(Year),
}

// ---------------------------------------------------------------------------
// ScoreCard
// ---------------------------------------------------------------------------

/// Numeric half of a final report; narration is attached afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreCard {
    pub score: u8,
    pub avg_profit: f64,
    pub avg_satisfaction: f64,
    pub avg_ridership: f64,
    pub strategic_adherence_count: i8,
    pub sub_scores: SubScores,
    pub adherence: [YearAdherence; 3],
}

impl ScoreCard {
    /// One-line summary of fare moves against each year's ideal action.
    pub fn strategic_summary(&self) -> String {
        let matched = self.adherence.iter().filter(|a| a.matched).count();
        let detail: Vec<String> = self
            .adherence
            .iter()
            .map(|a| {
                format!(
                    "{}: {} needed, fare moved {:+.2} ({})",
                    a.year,
                    a.ideal_action,
                    a.fare_delta,
                    if a.matched { "on strategy" } else { "off strategy" }
                )
            })
            .collect();
        format!("{} of 3 fare moves matched conditions. {}.", matched, detail.join("; "))
    }

    /// Attach narration and the scored results.
    pub fn into_report(self, results: [YearResult; 3], final_report: String, title: Option<String>) -> FinalScoreReport {
        FinalScoreReport {
            score: self.score,
            avg_profit: self.avg_profit,
            avg_satisfaction: self.avg_satisfaction,
            avg_ridership: self.avg_ridership,
            strategic_adherence_count: self.strategic_adherence_count,
            sub_scores: self.sub_scores,
            adherence: self.adherence,
            title,
            final_report,
            results,
        }
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Score a completed term.
///
/// `config.initial_fare` is the reference for the first year's fare move.
pub fn score_term(results: &[YearResult; 3], config: &EngineConfig) -> Result<ScoreCard, ScoringError> {
    let policy = &config.scoring;
    let avg_profit = mean(results.iter().map(|r| r.profit));
    let avg_satisfaction = mean(results.iter().map(|r| r.satisfaction));
    let avg_ridership = mean(results.iter().map(|r| r.ridership));

    let adherence = judge_adherence(results, config.initial_fare, &config.catalog, policy)?;
    let strategic_adherence_count: i8 = adherence.iter().map(YearAdherence::contribution).sum();

    let sub_scores = SubScores {
        satisfaction: satisfaction_score(avg_satisfaction),
        profit: profit_score(avg_profit, policy),
        strategic: strategic_score(strategic_adherence_count),
    };
    let score = weighted_score(&sub_scores, policy);

    info!(
        target: "fare.scoring",
        score,
        avg_profit,
        avg_satisfaction,
        avg_ridership,
        adherence = strategic_adherence_count,
        "term scored"
    );

    Ok(ScoreCard {
        score,
        avg_profit,
        avg_satisfaction,
        avg_ridership,
        strategic_adherence_count,
        sub_scores,
        adherence,
    })
}

/// Compare each year's fare move with that year's ideal action.
pub fn judge_adherence(
    results: &[YearResult; 3],
    initial_fare: f64,
    catalog: &ScenarioCatalog,
    policy: &ScoringPolicy,
) -> Result<[YearAdherence; 3], ScoringError> {
    let mut previous = initial_fare;
    let mut verdicts = [YearAdherence {
        year: 0,
        ideal_action: IdealAction::Maintain,
        fare_delta: 0.0,
        matched: false,
    }; 3];
    for (slot, result) in verdicts.iter_mut().zip(results.iter()) {
        let scenario = catalog.get(result.year).ok_or(ScoringError::UnknownYear(result.year))?;
        let fare_delta = fare_move(previous, result.fare);
        *slot = YearAdherence {
            year: result.year,
            ideal_action: scenario.ideal_action,
            fare_delta: from_decimal(fare_delta),
            matched: adheres(scenario.ideal_action, fare_delta, policy),
        };
        previous = result.fare;
    }
    Ok(verdicts)
}

/// Signed fare move between two committed fares, in exact decimal.
///
/// Fares sit on a cent grid, but their f64 difference does not: `1.25 - 1.20`
/// is slightly above `0.05`. Tolerances are compared against this value.
pub fn fare_move(previous: f64, fare: f64) -> Decimal {
    (to_decimal(fare) - to_decimal(previous)).round_dp(FARE_MOVE_DP)
}

const FARE_MOVE_DP: u32 = 9;

/// Whether a fare move counts as following `action`.
pub fn adheres(action: IdealAction, fare_delta: Decimal, policy: &ScoringPolicy) -> bool {
    let epsilon = to_decimal(policy.change_epsilon);
    match action {
        IdealAction::Decrease => fare_delta < -epsilon,
        IdealAction::Maintain => fare_delta.abs() <= to_decimal(policy.maintain_tolerance),
        IdealAction::SlightIncrease => {
            fare_delta > epsilon && fare_delta < to_decimal(policy.slight_increase_band)
        }
    }
}

/// Convex reward: `(avg/100)^2 * 100`.
pub fn satisfaction_score(avg_satisfaction: f64) -> f64 {
    let ratio = num_traits::clamp(avg_satisfaction, 0.0, 100.0) / 100.0;
    ratio * ratio * 100.0
}

/// Linear around a 50-point midpoint at zero profit; 100 at the benchmark.
pub fn profit_score(avg_profit: f64, policy: &ScoringPolicy) -> f64 {
    let raw = 50.0 + 50.0 * avg_profit / policy.profit_benchmark;
    if raw.is_nan() {
        return 0.0;
    }
    num_traits::clamp(raw, 0.0, 100.0)
}

/// Map an adherence count in -3..=3 onto 0..=100.
pub fn strategic_score(adherence_count: i8) -> f64 {
    let count = adherence_count.clamp(-3, 3) as f64;
    (count + 3.0) / 6.0 * 100.0
}

pub fn weighted_score(sub: &SubScores, policy: &ScoringPolicy) -> u8 {
    let total = sub.satisfaction * policy.satisfaction_weight
        + sub.profit * policy.profit_weight
        + sub.strategic * policy.strategic_weight;
    num_traits::clamp(total.round(), 0.0, 100.0) as u8
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}

// ===========================================================================
// Tests
// ===========================================================================
