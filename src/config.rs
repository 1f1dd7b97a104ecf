// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Fare Regulator Simulation Suite - Engine Configuration

//! Startup configuration surface handed to the engine by the host.
//!
//! Every tunable constant of the demand curve, the satisfaction curve and the
//! scoring policy lives here with its default. A configuration is validated
//! once, before any term can start, and is never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

use crate::catalog::ScenarioCatalog;
use crate::types::Year;

/// Minimum number of catalog years needed to draw one term.
pub const TERM_LENGTH: usize = 3;

const WEIGHT_TOLERANCE: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Malformed or incomplete configuration. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("catalog has {0} years, a term needs at least 3")]
    TooFewYears(usize),

    #[error("year {0} appears more than once in the catalog")]
    DuplicateYear(Year),

    #[error("scenario {year} is invalid: {reason}")]
    InvalidScenario { year: Year, reason: &'static str },

    #[error("parameter `{name}` is out of range: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("fare bounds are inconsistent: min {min}, initial {initial}, max {max}")]
    InvalidFareBounds { min: f64, initial: f64, max: f64 },

    #[error("score weights must be non-negative and sum to 1 (sum = {0})")]
    InvalidWeights(f64),

    #[error("configuration could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// EconomicParameters
// ---------------------------------------------------------------------------

/// Process-wide demand and cost constants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EconomicParameters {
    /// Riders per year at the reference fare.
    pub base_ridership: f64,
    /// Demand response to fare changes (negative).
    pub elasticity: f64,
    /// Reference fare of the demand curve.
    pub base_fare: f64,
    /// Operating cost before the scenario cost factor.
    pub operational_cost: f64,
}

impl Default for EconomicParameters {
    fn default() -> Self {
        Self {
            base_ridership: 1_000_000.0,
            elasticity: -0.3,
            base_fare: 1.20,
            operational_cost: 700_000.0,
        }
    }
}

// ---------------------------------------------------------------------------
// SatisfactionCurve
// ---------------------------------------------------------------------------

/// Baseline curve plus fare-change penalty/bonus.
///
/// `base = 100 - penalty_scale * max(0, fare - reference_fare)^penalty_exponent`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SatisfactionCurve {
    pub reference_fare: f64,
    pub penalty_scale: f64,
    /// Must lie strictly between 1 and 2.
    pub penalty_exponent: f64,
    /// Points lost per unit of fare increase.
    pub increase_penalty: f64,
    /// Scales how much scenario volatility amplifies increase penalties.
    pub volatility_multiplier: f64,
    /// Points gained per unit of fare decrease.
    pub decrease_bonus: f64,
}

impl Default for SatisfactionCurve {
    fn default() -> Self {
        Self {
            reference_fare: 1.00,
            penalty_scale: 40.0,
            penalty_exponent: 1.5,
            increase_penalty: 60.0,
            volatility_multiplier: 1.5,
            decrease_bonus: 25.0,
        }
    }
}

// ---------------------------------------------------------------------------
// FreeFareRule
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FreeFareRule {
    pub enabled: bool,
    /// Fares strictly below this are treated as free.
    pub threshold: f64,
    /// Multiplier applied to zero-fare demand.
    pub ridership_uplift: f64,
}

impl Default for FreeFareRule {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 0.01,
            ridership_uplift: 1.25,
        }
    }
}

// ---------------------------------------------------------------------------
// ScoringPolicy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringPolicy {
    /// Average profit that earns a full profit score.
    pub profit_benchmark: f64,
    pub satisfaction_weight: f64,
    pub profit_weight: f64,
    pub strategic_weight: f64,
    /// A move smaller than this is not a decrease or an increase.
    pub change_epsilon: f64,
    /// Largest absolute move still counted as "maintain".
    pub maintain_tolerance: f64,
    /// Upper (exclusive) edge of a "slight" increase.
    pub slight_increase_band: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            profit_benchmark: 400_000.0,
            satisfaction_weight: 0.4,
            profit_weight: 0.3,
            strategic_weight: 0.3,
            change_epsilon: 0.01,
            maintain_tolerance: 0.05,
            slight_increase_band: 0.25,
        }
    }
}

impl ScoringPolicy {
    pub fn weight_sum(&self) -> f64 {
        self.satisfaction_weight + self.profit_weight + self.strategic_weight
    }
}

// ---------------------------------------------------------------------------
// FareResetPolicy
// ---------------------------------------------------------------------------

/// What the pending fare becomes after a year is committed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FareResetPolicy {
    /// Start the next year from the fare just committed.
    #[default]
    CarryOver,
    /// Start every year from the configured initial fare.
    ResetToInitial,
}

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Fare in force before the first year of a term.
    pub initial_fare: f64,
    pub min_fare: f64,
    pub max_fare: f64,
    /// Granularity of the fare control.
    pub fare_step: f64,
    pub economics: EconomicParameters,
    pub satisfaction: SatisfactionCurve,
    pub free_fare: FreeFareRule,
    pub scoring: ScoringPolicy,
    pub fare_reset: FareResetPolicy,
    /// Ask the collaborator for a short title after the final report.
    pub request_title: bool,
    /// Longest wait on one collaborator call before its fallback is used.
    pub narrative_timeout_ms: u64,
    pub catalog: ScenarioCatalog,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_fare: 1.20,
            min_fare: 0.0,
            max_fare: 2.50,
            fare_step: 0.01,
            economics: EconomicParameters::default(),
            satisfaction: SatisfactionCurve::default(),
            free_fare: FreeFareRule::default(),
            scoring: ScoringPolicy::default(),
            fare_reset: FareResetPolicy::default(),
            request_title: true,
            narrative_timeout_ms: 15_000,
            catalog: ScenarioCatalog::standard(),
        }
    }
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON document over the defaults and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Clamp a fare into the configured bounds.
    pub fn clamp_fare(&self, fare: f64) -> f64 {
        num_traits::clamp(fare, self.min_fare, self.max_fare)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_fares()?;
        self.validate_economics()?;
        self.validate_satisfaction()?;
        self.validate_free_fare()?;
        self.validate_scoring()?;
        if self.narrative_timeout_ms == 0 {
            return Err(ConfigError::InvalidParameter { name: "narrative_timeout_ms", value: 0.0 });
        }
        self.validate_catalog()
    }

    pub fn narrative_timeout(&self) -> Duration {
        Duration::from_millis(self.narrative_timeout_ms)
    }

    fn validate_fares(&self) -> Result<(), ConfigError> {
        let (min, initial, max) = (self.min_fare, self.initial_fare, self.max_fare);
        let finite = min.is_finite() && initial.is_finite() && max.is_finite();
        if !finite || min < 0.0 || min > initial || initial > max {
            return Err(ConfigError::InvalidFareBounds { min, initial, max });
        }
        positive("fare_step", self.fare_step)
    }

    fn validate_economics(&self) -> Result<(), ConfigError> {
        let e = &self.economics;
        positive("base_ridership", e.base_ridership)?;
        positive("base_fare", e.base_fare)?;
        non_negative("operational_cost", e.operational_cost)?;
        if !(e.elasticity.is_finite() && e.elasticity < 0.0) {
            return Err(ConfigError::InvalidParameter { name: "elasticity", value: e.elasticity });
        }
        Ok(())
    }

    fn validate_satisfaction(&self) -> Result<(), ConfigError> {
        let s = &self.satisfaction;
        non_negative("reference_fare", s.reference_fare)?;
        non_negative("penalty_scale", s.penalty_scale)?;
        non_negative("increase_penalty", s.increase_penalty)?;
        non_negative("volatility_multiplier", s.volatility_multiplier)?;
        non_negative("decrease_bonus", s.decrease_bonus)?;
        let p = s.penalty_exponent;
        if !(p > 1.0 && p < 2.0) {
            return Err(ConfigError::InvalidParameter { name: "penalty_exponent", value: p });
        }
        Ok(())
    }

    fn validate_free_fare(&self) -> Result<(), ConfigError> {
        non_negative("free_fare.threshold", self.free_fare.threshold)?;
        non_negative("free_fare.ridership_uplift", self.free_fare.ridership_uplift)
    }

    fn validate_scoring(&self) -> Result<(), ConfigError> {
        let s = &self.scoring;
        positive("profit_benchmark", s.profit_benchmark)?;
        non_negative("change_epsilon", s.change_epsilon)?;
        non_negative("maintain_tolerance", s.maintain_tolerance)?;
        if !(s.slight_increase_band.is_finite() && s.slight_increase_band > s.change_epsilon) {
            return Err(ConfigError::InvalidParameter {
                name: "slight_increase_band",
                value: s.slight_increase_band,
            });
        }
        let weights = [s.satisfaction_weight, s.profit_weight, s.strategic_weight];
        let sum = s.weight_sum();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) || (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(ConfigError::InvalidWeights(sum));
        }
        Ok(())
    }

    fn validate_catalog(&self) -> Result<(), ConfigError> {
        if self.catalog.len() < TERM_LENGTH {
            return Err(ConfigError::TooFewYears(self.catalog.len()));
        }
        let mut seen = HashSet::new();
        for scenario in self.catalog.iter() {
            if !seen.insert(scenario.year) {
                return Err(ConfigError::DuplicateYear(scenario.year));
            }
            let year = scenario.year;
            if scenario.description.trim().is_empty() {
                return Err(ConfigError::InvalidScenario { year, reason: "empty description" });
            }
            if !(scenario.volatility.is_finite() && scenario.volatility >= 0.0) {
                return Err(ConfigError::InvalidScenario { year, reason: "volatility must be >= 0" });
            }
            if !(scenario.cost_modifier.is_finite() && scenario.cost_modifier >= 0.0) {
                return Err(ConfigError::InvalidScenario { year, reason: "cost modifier must be >= 0" });
            }
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}

// ===========================================================================
// Tests
// ===========================================================================
