// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Fare Regulator Simulation Suite - Type Definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar year key used throughout the catalog.
pub type Year = u16;

// ─── Ideal Action ────────────────────────────────────────────────────────────

/// The policy-correct fare move for a scenario year.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IdealAction {
    Decrease,
    Maintain,
    SlightIncrease,
}

impl IdealAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Decrease => "decrease",
            Self::Maintain => "maintain",
            Self::SlightIncrease => "slight increase",
        }
    }
}

impl fmt::Display for IdealAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ─── Scenario ────────────────────────────────────────────────────────────────

/// Static economic context attached to one calendar year.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub year: Year,
    /// Narrative seed text; also the briefing fallback.
    pub description: String,
    /// Magnitude of the symmetric ridership perturbation.
    pub volatility: f64,
    /// Magnitude of the (upward-biased) operating-cost perturbation.
    pub cost_modifier: f64,
    pub ideal_action: IdealAction,
}

// ─── Year Metrics ────────────────────────────────────────────────────────────

/// Numeric outcome of one committed fare, before narration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct YearMetrics {
    pub ridership: f64,
    pub total_revenue: f64,
    pub costs: f64,
    pub profit: f64,
    pub satisfaction: f64,
    /// True when the free-fare rule short-circuited the demand curve.
    #[serde(default)]
    pub free_fare: bool,
}

// ─── YearResult ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearResult {
    pub year: Year,
    pub fare: f64,
    pub total_revenue: f64,
    pub costs: f64,
    pub ridership: f64,
    pub profit: f64,
    pub satisfaction: f64,
    pub outcome_message: String,
}

impl YearResult {
    pub fn from_metrics(year: Year, fare: f64, metrics: &YearMetrics, outcome_message: String) -> Self {
        Self {
            year,
            fare,
            total_revenue: metrics.total_revenue,
            costs: metrics.costs,
            ridership: metrics.ridership,
            profit: metrics.profit,
            satisfaction: metrics.satisfaction,
            outcome_message,
        }
    }
}

// ─── Strategic Adherence ─────────────────────────────────────────────────────

/// Verdict for one year's fare move against that year's ideal action.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct YearAdherence {
    pub year: Year,
    pub ideal_action: IdealAction,
    pub fare_delta: f64,
    pub matched: bool,
}

impl YearAdherence {
    /// +1 for a match, -1 otherwise.
    pub fn contribution(&self) -> i8 {
        if self.matched { 1 } else { -1 }
    }
}

// ─── Sub Scores ──────────────────────────────────────────────────────────────

/// The three pre-clamped components of the final score, each in [0, 100].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SubScores {
    pub satisfaction: f64,
    pub profit: f64,
    pub strategic: f64,
}

// ─── FinalScoreReport ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinalScoreReport {
    pub score: u8,
    pub avg_profit: f64,
    pub avg_satisfaction: f64,
    pub avg_ridership: f64,
    pub strategic_adherence_count: i8,
    pub sub_scores: SubScores,
    pub adherence: [YearAdherence; 3],
    #[serde(default)]
    pub title: Option<String>,
    pub final_report: String,
    pub results: [YearResult; 3],
}

impl FinalScoreReport {
    pub fn term_years(&self) -> [Year; 3] {
        [self.results[0].year, self.results[1].year, self.results[2].year]
    }
}

// ─── Satisfaction Band ───────────────────────────────────────────────────────

/// Dashboard-style classification of a 0..100 value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SatisfactionBand {
    Poor,
    Fair,
    Good,
}

impl SatisfactionBand {
    pub fn classify(value: f64) -> Self {
        if value < 40.0 {
            Self::Poor
        } else if value < 75.0 {
            Self::Fair
        } else {
            Self::Good
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Poor => "poor",
            Self::Fair => "fair",
            Self::Good => "good",
        }
    }
}
