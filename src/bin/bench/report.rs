// Benchmark Report Types
// Structured output for offline comparison of fare strategies

use fare_engine::{EngineConfig, Year};
use serde::Serialize;

// ─── Statistics (per-metric Monte Carlo aggregation) ────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub mean: f64,
    pub std_dev: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub min: f64,
    pub max: f64,
    pub n: usize,
}

impl Stats {
    pub fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self { mean: 0.0, std_dev: 0.0, ci_lower: 0.0, ci_upper: 0.0, min: 0.0, max: 0.0, n: 0 };
        }
        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };
        let std_dev = variance.sqrt();
        let half_width = 1.96 * std_dev / (n as f64).sqrt();
        Self {
            mean,
            std_dev,
            ci_lower: mean - half_width,
            ci_upper: mean + half_width,
            min: samples.iter().cloned().fold(f64::INFINITY, f64::min),
            max: samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            n,
        }
    }

    pub fn half_width(&self) -> f64 {
        (self.ci_upper - self.ci_lower) / 2.0
    }
}

// ─── Single-Run Result ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct BenchResult {
    pub strategy: String,
    pub seed: u64,
    pub years: [Year; 3],
    pub fares: [f64; 3],
    pub score: u8,
    pub title: Option<String>,
    pub avg_profit: f64,
    pub avg_satisfaction: f64,
    pub avg_ridership: f64,
    pub strategic_adherence_count: i8,
    pub satisfaction_score: f64,
    pub profit_score: f64,
    pub strategic_score: f64,
    pub elapsed_us: u128,
}

// ─── Monte Carlo Report (per-strategy aggregation) ──────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct MonteCarloReport {
    pub strategy_name: String,
    pub label: String,
    pub category: String,
    pub n_runs: usize,
    pub score: Stats,
    pub avg_profit: Stats,
    pub avg_satisfaction: Stats,
    pub avg_ridership: Stats,
    pub adherence: Stats,
    pub elapsed_us: Stats,
    pub individual_runs: Vec<BenchResult>,
}

// ─── Policy Validation Summary ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct PolicyValidation {
    /// Following the ideal action outscores holding the fare.
    pub ideal_beats_hold: bool,
    /// Following the ideal action outscores moving against it.
    pub ideal_beats_contrarian: bool,
    /// Free travel never turns a profit.
    pub free_fare_loses_money: bool,
    /// Every run's score stayed inside 0..=100.
    pub scores_in_range: bool,
}

impl PolicyValidation {
    pub fn all_pass(&self) -> bool {
        self.ideal_beats_hold && self.ideal_beats_contrarian && self.free_fare_loses_money && self.scores_in_range
    }
}

// ─── Top-Level Report ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BenchReport {
    pub timestamp: String,
    pub version: &'static str,
    pub prng: &'static str,
    pub n_runs_per_strategy: usize,
    pub base_seed: u64,
    pub config: EngineConfig,
    pub policy_validation: PolicyValidation,
    pub strategies: Vec<MonteCarloReport>,
}
