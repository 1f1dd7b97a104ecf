// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Fare Regulator Simulation Suite - Session Driver

//! Async driver that pairs a [`TermEngine`] with a [`NarrativeCollaborator`].
//!
//! Each operation runs the ticket protocol to completion, so a caller only
//! ever sees the machine waiting on the player or a finished term. Holding
//! `&mut self` across the awaits keeps commits serialized.
//!
//! Every collaborator call is bounded by `EngineConfig::narrative_timeout_ms`.
//! An expired call resolves its ticket as [`NarrativeError::Timeout`], which
//! the engine replaces with the fallback text. Needs a Tokio runtime with the
//! time driver enabled.

use tokio::time::timeout;

use crate::config::{ConfigError, EngineConfig};
use crate::narrative::{dispatch, NarrativeCollaborator, NarrativeError, NarrativeTicket};
use crate::random::RandomSource;
use crate::term::{Advance, TermEngine, TermError, TermSnapshot};
use crate::types::{FinalScoreReport, Year};

pub struct TermSession<N, R> {
    engine: TermEngine<R>,
    narrator: N,
}

impl<N: NarrativeCollaborator, R: RandomSource> TermSession<N, R> {
    pub fn new(config: EngineConfig, rng: R, narrator: N) -> Result<Self, ConfigError> {
        Ok(Self { engine: TermEngine::new(config, rng)?, narrator })
    }

    pub fn engine(&self) -> &TermEngine<R> {
        &self.engine
    }

    /// Begin a term and wait for the first briefing.
    pub async fn start_term(&mut self) -> Result<Advance, TermError> {
        let ticket = self.engine.start_term()?;
        self.drive(ticket).await
    }

    pub fn set_pending_fare(&mut self, fare: f64) -> Result<f64, TermError> {
        self.engine.set_pending_fare(fare)
    }

    /// Commit the pending fare and run narration until the next year opens
    /// or the term completes.
    pub async fn confirm_fare(&mut self) -> Result<Advance, TermError> {
        let ticket = self.engine.confirm_fare()?;
        self.drive(ticket).await
    }

    pub fn abandon_term(&mut self) {
        self.engine.abandon_term();
    }

    pub fn snapshot(&self) -> TermSnapshot {
        self.engine.snapshot()
    }

    pub fn report(&self) -> Option<&FinalScoreReport> {
        self.engine.report()
    }

    pub fn history(&self) -> &[FinalScoreReport] {
        self.engine.history()
    }

    async fn drive(&mut self, mut ticket: NarrativeTicket) -> Result<Advance, TermError> {
        let limit = self.engine.config().narrative_timeout();
        loop {
            let outcome = timeout(limit, dispatch(&self.narrator, &ticket.request))
                .await
                .unwrap_or(Err(NarrativeError::Timeout));
            match self.engine.resolve_narrative(ticket.id, outcome)? {
                Advance::Narrate(next) => ticket = next,
                settled => return Ok(settled),
            }
        }
    }

    /// Play a whole term with a fare chosen per year by `choose`.
    ///
    /// `choose` receives the year index, the scenario year and the fare
    /// committed the year before.
    pub async fn play_term<F>(&mut self, mut choose: F) -> Result<&FinalScoreReport, TermError>
    where
        F: FnMut(usize, Year, f64) -> f64,
    {
        let mut advance = self.start_term().await?;
        loop {
            match advance {
                Advance::AwaitingFare { index, year } => {
                    let previous = self
                        .engine
                        .term()
                        .and_then(|t| t.previous_result().map(|r| r.fare))
                        .unwrap_or(self.engine.config().initial_fare);
                    self.engine.set_pending_fare(choose(index, year, previous))?;
                    advance = self.confirm_fare().await?;
                }
                Advance::Complete { .. } => break,
                Advance::Narrate(_) | Advance::Discarded => {
                    return Err(TermError::InvalidState { operation: "play_term", phase: self.engine.phase() })
                }
            }
        }
        let phase = self.engine.phase();
        self.engine
            .report()
            .ok_or(TermError::InvalidState { operation: "play_term", phase })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narrative::OfflineNarrator;
    use crate::random::SequenceSource;
    use crate::term::TermPhase;
    use crate::types::{Scenario, YearMetrics};
    use std::time::{Duration, Instant};

    struct Silent;

    impl NarrativeCollaborator for Silent {
        async fn generate_briefing(&self, _: Year, _: &str) -> Result<String, NarrativeError> {
            Err(NarrativeError::Timeout)
        }
        async fn generate_year_analysis(
            &self,
            _: Year,
            _: f64,
            _: f64,
            _: &YearMetrics,
            _: &Scenario,
        ) -> Result<String, NarrativeError> {
            Err(NarrativeError::Service("down".into()))
        }
        async fn generate_final_report(&self, _: u8, _: f64, _: f64, _: &str) -> Result<String, NarrativeError> {
            Ok(String::new())
        }
    }

    /// Accepts every request and never answers.
    struct Hung;

    impl NarrativeCollaborator for Hung {
        async fn generate_briefing(&self, _: Year, _: &str) -> Result<String, NarrativeError> {
            futures::future::pending().await
        }
        async fn generate_year_analysis(
            &self,
            _: Year,
            _: f64,
            _: f64,
            _: &YearMetrics,
            _: &Scenario,
        ) -> Result<String, NarrativeError> {
            futures::future::pending().await
        }
        async fn generate_final_report(&self, _: u8, _: f64, _: f64, _: &str) -> Result<String, NarrativeError> {
            futures::future::pending().await
        }
        async fn generate_title(&self, _: u8, _: f64, _: f64) -> Result<String, NarrativeError> {
            futures::future::pending().await
        }
    }

    fn session<N: NarrativeCollaborator>(narrator: N) -> TermSession<N, SequenceSource> {
        TermSession::new(EngineConfig::default(), SequenceSource::new(vec![0.0]), narrator).unwrap()
    }

    #[tokio::test]
    async fn start_waits_for_player() {
        let mut s = session(OfflineNarrator);
        let advance = s.start_term().await.unwrap();
        assert_eq!(advance, Advance::AwaitingFare { index: 0, year: 2000 });
        assert_eq!(s.snapshot().phase, TermPhase::YearInProgress { index: 0 });
    }

    #[tokio::test]
    async fn failing_collaborator_still_completes_term() {
        let mut s = session(Silent);
        let report = s.play_term(|_, _, previous| previous).await.unwrap();
        assert_eq!(report.results.len(), 3);
        assert!(report.results[0].outcome_message.starts_with("Performance data analyzed."));
        assert!(report.final_report.starts_with("Your term is complete."));
        // title falls back to the score band when unsupported
        assert!(report.title.is_some());
        assert_eq!(s.history().len(), 1);
    }

    #[tokio::test]
    async fn unresponsive_collaborator_times_out_to_fallbacks() {
        let config = EngineConfig { narrative_timeout_ms: 20, ..EngineConfig::default() };
        let mut s = TermSession::new(config, SequenceSource::new(vec![0.0]), Hung).unwrap();

        let started = Instant::now();
        let report = s.play_term(|_, _, previous| previous).await.unwrap().clone();

        assert!(started.elapsed() < Duration::from_secs(5));
        for result in &report.results {
            assert!(result.outcome_message.starts_with("Performance data analyzed."));
        }
        assert!(report.final_report.starts_with("Your term is complete."));
        assert!(report.title.is_some());
        assert_eq!(s.engine().phase(), TermPhase::TermComplete);
        assert!(s.engine().pending_ticket().is_none());
    }

    #[tokio::test]
    async fn consecutive_terms_accumulate_history() {
        let mut s = session(OfflineNarrator);
        s.play_term(|_, _, p| p).await.unwrap();
        s.play_term(|_, _, p| p - 0.1).await.unwrap();
        assert_eq!(s.history().len(), 2);
        assert_eq!(s.engine().phase(), TermPhase::TermComplete);
    }
}
