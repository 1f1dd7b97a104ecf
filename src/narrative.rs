// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Fare Regulator Simulation Suite - Narrative Protocol

//! Narrative text requests and the collaborator seam.
//!
//! The term engine never calls a text generator itself. It hands out a
//! [`NarrativeTicket`] describing what it needs and waits for the host to
//! resolve it. Every request knows how to render a prompt for a text model
//! and how to produce a deterministic fallback when the model fails.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::money::{format_currency, format_fare, format_riders};
use crate::types::{SatisfactionBand, Scenario, Year, YearMetrics};

const UNCERTAIN_BRIEFING: &str = "Economic conditions are uncertain. Proceed with caution.";

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NarrativeError {
    #[error("narrative service failed: {0}")]
    Service(String),
    #[error("narrative service timed out")]
    Timeout,
    #[error("narrative service does not support this request")]
    Unsupported,
    #[error("narrative service returned empty text")]
    Empty,
}

// ─── Requests ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NarrativeRequest {
    Briefing {
        year: Year,
        description: String,
    },
    YearAnalysis {
        year: Year,
        fare: f64,
        previous_fare: f64,
        metrics: YearMetrics,
        scenario: Scenario,
    },
    FinalReport {
        score: u8,
        years: [Year; 3],
        avg_profit: f64,
        avg_satisfaction: f64,
        avg_ridership: f64,
        strategic_summary: String,
    },
    Title {
        score: u8,
        avg_profit: f64,
        avg_satisfaction: f64,
    },
}

impl NarrativeRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Briefing { .. } => "briefing",
            Self::YearAnalysis { .. } => "year_analysis",
            Self::FinalReport { .. } => "final_report",
            Self::Title { .. } => "title",
        }
    }

    /// Prompt text for hosts that wire a language model.
    pub fn prompt(&self) -> String {
        match self {
            Self::Briefing { year, description } => format!(
                "You run mission control for a transit fare regulation simulation. \
                 Write a one-sentence, telegram-style intelligence briefing for the year {}. \
                 Center it on this economic event: \"{}\". At most 15 words.",
                year, description
            ),
            Self::YearAnalysis { year, fare, previous_fare, metrics, scenario } => format!(
                "You are the analysis console of a transit fare regulation simulation. \
                 In {} the fare moved from {} to {}. Outcome: profit {}, ridership {}, \
                 public satisfaction {:.1}%. Key event: \"{}\". \
                 Give a one-sentence performance readout, at most 20 words, terse and clinical.",
                year,
                format_fare(*previous_fare),
                format_fare(*fare),
                format_currency(metrics.profit),
                format_riders(metrics.ridership),
                metrics.satisfaction,
                scenario.description
            ),
            Self::FinalReport { score, years, avg_profit, avg_satisfaction, avg_ridership, strategic_summary } => {
                format!(
                    "You are the senior economic advisor of a transit fare regulation simulation. \
                     The fare regulator has finished a three-year term covering {}, {} and {}.\n\
                     - Final score: {}/100\n\
                     - Average annual profit: {}\n\
                     - Average public satisfaction: {:.1}%\n\
                     - Average annual ridership: {}\n\
                     - Strategy: {}\n\
                     Write a 3-4 sentence performance review in the voice of a mission-control AI. \
                     Assess the strategy and end with a closing remark.",
                    years[0],
                    years[1],
                    years[2],
                    score,
                    format_currency(*avg_profit),
                    avg_satisfaction,
                    format_riders(*avg_ridership),
                    strategic_summary
                )
            }
            Self::Title { score, avg_profit, avg_satisfaction } => format!(
                "A fare regulator finished a term with score {}/100, average profit {} \
                 and average satisfaction {:.1}%. Award them a short honorific title, at most 5 words.",
                score,
                format_currency(*avg_profit),
                avg_satisfaction
            ),
        }
    }

    /// Deterministic text used whenever the collaborator fails.
    pub fn fallback(&self) -> String {
        match self {
            Self::Briefing { description, .. } => {
                if description.trim().is_empty() {
                    UNCERTAIN_BRIEFING.to_string()
                } else {
                    description.clone()
                }
            }
            Self::YearAnalysis { year, fare, metrics, .. } => {
                let fare_note = if metrics.free_fare {
                    "free travel".to_string()
                } else {
                    format!("a fare of {}", format_fare(*fare))
                };
                format!(
                    "Performance data analyzed. {} closed with {}: profit {}, {} riders, satisfaction {:.1}% ({}).",
                    year,
                    fare_note,
                    format_currency(metrics.profit),
                    format_riders(metrics.ridership),
                    metrics.satisfaction,
                    SatisfactionBand::classify(metrics.satisfaction).label()
                )
            }
            Self::FinalReport { score, .. } => final_report_fallback(*score),
            Self::Title { score, .. } => score_title(*score).to_string(),
        }
    }
}

fn final_report_fallback(score: u8) -> String {
    format!(
        "Your term is complete. Final score: {}/100. Performance metrics indicate a {} result. \
         Further analysis is required.",
        score,
        assessment(score)
    )
}

fn assessment(score: u8) -> &'static str {
    match score {
        75..=u8::MAX => "strong",
        50..=74 => "mixed",
        _ => "weak",
    }
}

/// Honorific for a final score.
pub fn score_title(score: u8) -> &'static str {
    match score {
        90..=u8::MAX => "Visionary Transit Architect",
        75..=89 => "Steady Hand at the Fare Desk",
        60..=74 => "Capable Regulator",
        40..=59 => "Embattled Administrator",
        _ => "Derailed Director",
    }
}

// ─── Tickets ─────────────────────────────────────────────────────────────────

/// An outstanding request. Only the most recently issued ticket is honored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NarrativeTicket {
    pub id: u64,
    pub request: NarrativeRequest,
}

/// Turn a collaborator outcome into display text, substituting the fallback
/// for failures and blank answers.
pub fn settle(request: &NarrativeRequest, outcome: Result<String, NarrativeError>) -> String {
    let outcome = outcome.and_then(|text| {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            Err(NarrativeError::Empty)
        } else {
            Ok(trimmed.to_string())
        }
    });
    match outcome {
        Ok(text) => text,
        Err(err) => {
            warn!(target: "fare.narrative", kind = request.kind(), error = %err, "narrative fallback used");
            request.fallback()
        }
    }
}

// ─── Collaborator ────────────────────────────────────────────────────────────

/// External text generator. Implementations may call a remote model.
#[allow(async_fn_in_trait)]
pub trait NarrativeCollaborator {
    async fn generate_briefing(&self, year: Year, description: &str) -> Result<String, NarrativeError>;

    async fn generate_year_analysis(
        &self,
        year: Year,
        fare: f64,
        previous_fare: f64,
        metrics: &YearMetrics,
        scenario: &Scenario,
    ) -> Result<String, NarrativeError>;

    async fn generate_final_report(
        &self,
        score: u8,
        avg_profit: f64,
        avg_satisfaction: f64,
        strategic_summary: &str,
    ) -> Result<String, NarrativeError>;

    async fn generate_title(&self, _score: u8, _avg_profit: f64, _avg_satisfaction: f64) -> Result<String, NarrativeError> {
        Err(NarrativeError::Unsupported)
    }
}

/// Route a request to the matching collaborator call.
pub async fn dispatch<N: NarrativeCollaborator>(
    narrator: &N,
    request: &NarrativeRequest,
) -> Result<String, NarrativeError> {
    match request {
        NarrativeRequest::Briefing { year, description } => narrator.generate_briefing(*year, description).await,
        NarrativeRequest::YearAnalysis { year, fare, previous_fare, metrics, scenario } => {
            narrator
                .generate_year_analysis(*year, *fare, *previous_fare, metrics, scenario)
                .await
        }
        NarrativeRequest::FinalReport { score, avg_profit, avg_satisfaction, strategic_summary, .. } => {
            narrator
                .generate_final_report(*score, *avg_profit, *avg_satisfaction, strategic_summary)
                .await
        }
        NarrativeRequest::Title { score, avg_profit, avg_satisfaction } => {
            narrator.generate_title(*score, *avg_profit, *avg_satisfaction).await
        }
    }
}

/// Collaborator that answers every request with its fallback text.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineNarrator;

impl NarrativeCollaborator for OfflineNarrator {
    async fn generate_briefing(&self, year: Year, description: &str) -> Result<String, NarrativeError> {
        Ok(NarrativeRequest::Briefing { year, description: description.to_string() }.fallback())
    }

    async fn generate_year_analysis(
        &self,
        year: Year,
        fare: f64,
        previous_fare: f64,
        metrics: &YearMetrics,
        scenario: &Scenario,
    ) -> Result<String, NarrativeError> {
        let request = NarrativeRequest::YearAnalysis {
            year,
            fare,
            previous_fare,
            metrics: *metrics,
            scenario: scenario.clone(),
        };
        Ok(request.fallback())
    }

    async fn generate_final_report(
        &self,
        score: u8,
        _avg_profit: f64,
        _avg_satisfaction: f64,
        _strategic_summary: &str,
    ) -> Result<String, NarrativeError> {
        Ok(final_report_fallback(score))
    }

    async fn generate_title(&self, score: u8, _avg_profit: f64, _avg_satisfaction: f64) -> Result<String, NarrativeError> {
        Ok(score_title(score).to_string())
    }
}
