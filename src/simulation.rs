// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Fare Regulator Simulation Suite - Simulation Core

use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::EngineConfig;
use crate::narrative::{NarrativeError, NarrativeTicket};
use crate::random::seeded;
use crate::term::{Advance, TermEngine, TermError};

// ─── FareSimulation struct ───────────────────────────────────────────────────

/// Host-facing term engine. The host renders tickets, asks its own text
/// service for the narrative, and feeds the answer back.
#[wasm_bindgen]
pub struct FareSimulation {
    pub(crate) engine: TermEngine<ChaCha8Rng>,
}

/// A ticket flattened for the host: the prompt to send and the text to show
/// if the service fails.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TicketView {
    pub id: u64,
    pub kind: &'static str,
    pub prompt: String,
    pub fallback: String,
}

impl From<&NarrativeTicket> for TicketView {
    fn from(ticket: &NarrativeTicket) -> Self {
        Self {
            id: ticket.id,
            kind: ticket.request.kind(),
            prompt: ticket.request.prompt(),
            fallback: ticket.request.fallback(),
        }
    }
}

/// Result of feeding a narrative response back in.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "next", rename_all = "snake_case")]
pub enum StepView {
    Narrate { ticket: TicketView },
    AwaitingFare { index: usize, year: u16 },
    Complete { score: u8 },
    Discarded,
}

impl From<Advance> for StepView {
    fn from(advance: Advance) -> Self {
        match advance {
            Advance::Narrate(ticket) => Self::Narrate { ticket: TicketView::from(&ticket) },
            Advance::AwaitingFare { index, year } => Self::AwaitingFare { index, year },
            Advance::Complete { score } => Self::Complete { score },
            Advance::Discarded => Self::Discarded,
        }
    }
}

// ─── Internal Logic (Testable, pure Rust) ────────────────────────────────────

impl FareSimulation {
    pub fn with_engine_config(config: EngineConfig, seed: u64) -> Result<Self, TermError> {
        Ok(Self { engine: TermEngine::new(config, seeded(seed))? })
    }

    pub fn from_json_config(json: &str, seed: u64) -> Result<Self, TermError> {
        Self::with_engine_config(EngineConfig::from_json(json)?, seed)
    }

    pub fn engine(&self) -> &TermEngine<ChaCha8Rng> {
        &self.engine
    }

    pub fn start_term_core(&mut self) -> Result<TicketView, TermError> {
        self.engine.start_term().map(|t| TicketView::from(&t))
    }

    pub fn confirm_fare_core(&mut self) -> Result<TicketView, TermError> {
        self.engine.confirm_fare().map(|t| TicketView::from(&t))
    }

    pub fn resolve_core(&mut self, ticket_id: u64, text: String) -> Result<StepView, TermError> {
        self.engine.resolve_narrative(ticket_id, Ok(text)).map(StepView::from)
    }

    pub fn fail_core(&mut self, ticket_id: u64, reason: String) -> Result<StepView, TermError> {
        let err = if reason.eq_ignore_ascii_case("timeout") {
            NarrativeError::Timeout
        } else {
            NarrativeError::Service(reason)
        };
        self.engine.resolve_narrative(ticket_id, Err(err)).map(StepView::from)
    }
}
