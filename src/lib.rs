// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Fare Regulator Simulation Suite ("The Fare Desk")

pub mod types;
pub mod catalog;
pub mod config;
pub mod money;
pub mod random;
pub mod metrics;
pub mod scoring;
pub mod narrative;
pub mod term;
#[cfg(not(target_arch = "wasm32"))]
pub mod session;
pub mod simulation;

pub use types::*;
pub use catalog::ScenarioCatalog;
pub use config::{ConfigError, EngineConfig, FareResetPolicy};
pub use metrics::{compute_year_outcome, MetricsError};
pub use narrative::{NarrativeCollaborator, NarrativeError, NarrativeRequest, NarrativeTicket, OfflineNarrator};
pub use scoring::{score_term, ScoreCard, ScoringError};
#[cfg(not(target_arch = "wasm32"))]
pub use session::TermSession;
pub use simulation::FareSimulation;
pub use term::{Advance, TermEngine, TermError, TermPhase, TermSnapshot};

use serde::Serialize;
use wasm_bindgen::prelude::*;

fn to_js<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

fn js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[wasm_bindgen]
impl FareSimulation {
    /// Default configuration; the host supplies the seed.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Result<FareSimulation, JsValue> {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        FareSimulation::with_engine_config(EngineConfig::default(), seed).map_err(js_err)
    }

    /// Defaults overridden by a (possibly partial) JSON document.
    pub fn with_config(json: &str, seed: u64) -> Result<FareSimulation, JsValue> {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        FareSimulation::from_json_config(json, seed).map_err(js_err)
    }

    pub fn start_term(&mut self) -> Result<JsValue, JsValue> {
        self.start_term_core().map(|t| to_js(&t)).map_err(js_err)
    }

    /// Returns the stored fare after clamping and snapping.
    pub fn set_fare(&mut self, fare: f64) -> Result<f64, JsValue> {
        self.engine.set_pending_fare(fare).map_err(js_err)
    }

    pub fn confirm_fare(&mut self) -> Result<JsValue, JsValue> {
        self.confirm_fare_core().map(|t| to_js(&t)).map_err(js_err)
    }

    pub fn resolve_narrative(&mut self, ticket_id: u64, text: String) -> Result<JsValue, JsValue> {
        self.resolve_core(ticket_id, text).map(|s| to_js(&s)).map_err(js_err)
    }

    pub fn fail_narrative(&mut self, ticket_id: u64, reason: String) -> Result<JsValue, JsValue> {
        self.fail_core(ticket_id, reason).map(|s| to_js(&s)).map_err(js_err)
    }

    pub fn abandon_term(&mut self) {
        self.engine.abandon_term();
    }

    pub fn snapshot(&self) -> JsValue {
        to_js(&self.engine.snapshot())
    }

    pub fn report(&self) -> JsValue {
        match self.engine.report() {
            Some(report) => to_js(report),
            None => JsValue::NULL,
        }
    }

    pub fn history(&self) -> JsValue {
        to_js(&self.engine.history())
    }

    pub fn config(&self) -> JsValue {
        to_js(self.engine.config())
    }
}
