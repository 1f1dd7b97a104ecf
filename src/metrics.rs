// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Fare Regulator Simulation Suite - Metrics Calculator

//! Maps one committed fare to the year's ridership, revenue, cost, profit
//! and public satisfaction.
//!
//! The only impurity is the pair of uniform draws that perturb ridership and
//! operating cost; they come from an injected [`RandomSource`], so a fixed
//! seed reproduces every outcome. [`outcome_with_draw`] is the pure core.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{EngineConfig, SatisfactionCurve};
use crate::random::RandomSource;
use crate::types::{Scenario, Year, YearMetrics};

/// Centre of the ridership draw: `U - 0.5` is symmetric.
const VOLATILITY_CENTRE: f64 = 0.5;
/// Offset of the cost draw: `V - 0.2` skews costs upward.
const COST_BIAS: f64 = 0.2;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricsError {
    #[error("year {0} is not in the scenario catalog")]
    UnknownYear(Year),

    #[error("fare must be a finite, non-negative amount (got {0})")]
    InvalidFare(f64),
}

// ---------------------------------------------------------------------------
// Volatility draw
// ---------------------------------------------------------------------------

/// The two random multipliers applied to one year.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct VolatilityDraw {
    pub volatility_factor: f64,
    pub cost_factor: f64,
}

impl VolatilityDraw {
    /// Consume exactly two samples: ridership first, cost second.
    pub fn sample<R: RandomSource + ?Sized>(scenario: &Scenario, rng: &mut R) -> Self {
        let u = rng.next_unit();
        let v = rng.next_unit();
        Self {
            volatility_factor: 1.0 + (u - VOLATILITY_CENTRE) * scenario.volatility,
            cost_factor: 1.0 + (v - COST_BIAS) * scenario.cost_modifier,
        }
    }

    pub fn neutral() -> Self {
        Self { volatility_factor: 1.0, cost_factor: 1.0 }
    }
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

/// Compute the outcome of committing `fare` in `year`.
///
/// `previous_fare` is the fare committed the year before, or the configured
/// initial fare for the first year of a term.
///
/// # Errors
///
/// [`MetricsError::UnknownYear`] if `year` is not in the catalog,
/// [`MetricsError::InvalidFare`] for a negative or non-finite fare. No
/// randomness is consumed when an error is returned.
pub fn compute_year_outcome<R: RandomSource + ?Sized>(
    config: &EngineConfig,
    fare: f64,
    year: Year,
    previous_fare: f64,
    rng: &mut R,
) -> Result<YearMetrics, MetricsError> {
    let scenario = config.catalog.get(year).ok_or(MetricsError::UnknownYear(year))?;
    if !fare.is_finite() || fare < 0.0 {
        return Err(MetricsError::InvalidFare(fare));
    }
    let draw = VolatilityDraw::sample(scenario, rng);
    let metrics = outcome_with_draw(config, scenario, fare, previous_fare, draw);
    debug!(
        target: "fare.metrics",
        year,
        fare,
        previous_fare,
        volatility_factor = draw.volatility_factor,
        cost_factor = draw.cost_factor,
        ridership = metrics.ridership,
        profit = metrics.profit,
        satisfaction = metrics.satisfaction,
        "year outcome computed"
    );
    Ok(metrics)
}

/// Deterministic core of the calculator for a known draw.
pub fn outcome_with_draw(
    config: &EngineConfig,
    scenario: &Scenario,
    fare: f64,
    previous_fare: f64,
    draw: VolatilityDraw,
) -> YearMetrics {
    let econ = &config.economics;
    let costs = econ.operational_cost * draw.cost_factor;

    if config.free_fare.enabled && fare < config.free_fare.threshold {
        // Zero-fare demand (the curve at fare 0) lifted by the fixed uplift.
        let zero_fare_demand = econ.base_ridership * (1.0 - econ.elasticity);
        let ridership = (zero_fare_demand * config.free_fare.ridership_uplift * draw.volatility_factor).max(0.0);
        return YearMetrics {
            ridership,
            total_revenue: 0.0,
            costs,
            profit: -costs,
            satisfaction: 100.0,
            free_fare: true,
        };
    }

    let demand_shift = 1.0 + econ.elasticity * (fare - econ.base_fare) / econ.base_fare;
    let ridership = (econ.base_ridership * demand_shift * draw.volatility_factor).max(0.0);
    let total_revenue = fare * ridership;

    YearMetrics {
        ridership,
        total_revenue,
        costs,
        profit: total_revenue - costs,
        satisfaction: satisfaction(&config.satisfaction, scenario, fare, previous_fare),
        free_fare: false,
    }
}

/// Baseline curve plus fare-change impact, clamped to `[0, 100]`.
pub fn satisfaction(curve: &SatisfactionCurve, scenario: &Scenario, fare: f64, previous_fare: f64) -> f64 {
    let overshoot = (fare - curve.reference_fare).max(0.0);
    let base = 100.0 - curve.penalty_scale * overshoot.powf(curve.penalty_exponent);
    let impact = fare_change_impact(curve, scenario, fare - previous_fare);
    let value = base + impact;
    if value.is_nan() {
        return 0.0;
    }
    num_traits::clamp(value, 0.0, 100.0)
}

/// Increases cost more in volatile years; decreases earn a smaller bonus.
pub fn fare_change_impact(curve: &SatisfactionCurve, scenario: &Scenario, fare_delta: f64) -> f64 {
    if fare_delta > 0.0 {
        -(fare_delta * curve.increase_penalty) * (1.0 + scenario.volatility * curve.volatility_multiplier)
    } else if fare_delta < 0.0 {
        fare_delta.abs() * curve.decrease_bonus
    } else {
        0.0
    }
}

// ===========================================================================
// Tests
// ===========================================================================
