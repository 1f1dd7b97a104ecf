// Monte Carlo Infrastructure - N seeded terms per strategy with statistical aggregation
// Seeds run base..base+N, so every strategy faces the same year draws

use fare_engine::random::seeded;
use fare_engine::*;
use rand_chacha::ChaCha8Rng;

use crate::report::*;
use crate::strategies::Strategy;

use std::time::Instant;

/// Answer every ticket with its offline text until the engine waits on the player.
fn narrate_offline(engine: &mut TermEngine<ChaCha8Rng>, mut ticket: NarrativeTicket) -> Result<Advance, TermError> {
    loop {
        let text = ticket.request.fallback();
        match engine.resolve_narrative(ticket.id, Ok(text))? {
            Advance::Narrate(next) => ticket = next,
            settled => return Ok(settled),
        }
    }
}

/// Play one full term under `strategy` with a specific seed.
pub fn run_single(strategy: &Strategy, config: &EngineConfig, seed: u64) -> Result<BenchResult, TermError> {
    let start = Instant::now();
    let mut engine = TermEngine::new(config.clone(), seeded(seed))?;

    let ticket = engine.start_term()?;
    let mut advance = narrate_offline(&mut engine, ticket)?;
    while let Advance::AwaitingFare { year, .. } = advance {
        let previous = engine
            .term()
            .and_then(|t| t.previous_result().map(|r| r.fare))
            .unwrap_or(config.initial_fare);
        let scenario = config.catalog.get(year).ok_or(MetricsError::UnknownYear(year))?;
        engine.set_pending_fare((strategy.choose)(scenario, previous, config))?;
        let ticket = engine.confirm_fare()?;
        advance = narrate_offline(&mut engine, ticket)?;
    }

    let phase = engine.phase();
    let report = engine
        .report()
        .ok_or(TermError::InvalidState { operation: "bench", phase })?;

    Ok(BenchResult {
        strategy: strategy.name.to_string(),
        seed,
        years: report.term_years(),
        fares: [report.results[0].fare, report.results[1].fare, report.results[2].fare],
        score: report.score,
        title: report.title.clone(),
        avg_profit: report.avg_profit,
        avg_satisfaction: report.avg_satisfaction,
        avg_ridership: report.avg_ridership,
        strategic_adherence_count: report.strategic_adherence_count,
        satisfaction_score: report.sub_scores.satisfaction,
        profit_score: report.sub_scores.profit,
        strategic_score: report.sub_scores.strategic,
        elapsed_us: start.elapsed().as_micros(),
    })
}

/// Run Monte Carlo: N terms of a strategy, aggregate stats.
pub fn run_monte_carlo(
    strategy: &Strategy,
    config: &EngineConfig,
    n_runs: usize,
    base_seed: u64,
) -> Result<MonteCarloReport, TermError> {
    let mut results = Vec::with_capacity(n_runs);
    for i in 0..n_runs {
        results.push(run_single(strategy, config, base_seed + i as u64)?);
    }
    Ok(aggregate(strategy, results))
}

fn column(results: &[BenchResult], f: impl Fn(&BenchResult) -> f64) -> Stats {
    Stats::from_samples(&results.iter().map(f).collect::<Vec<_>>())
}

/// Aggregate individual runs into a MonteCarloReport.
fn aggregate(strategy: &Strategy, results: Vec<BenchResult>) -> MonteCarloReport {
    MonteCarloReport {
        strategy_name: strategy.name.to_string(),
        label: strategy.label.to_string(),
        category: strategy.category.to_string(),
        n_runs: results.len(),
        score: column(&results, |r| r.score as f64),
        avg_profit: column(&results, |r| r.avg_profit),
        avg_satisfaction: column(&results, |r| r.avg_satisfaction),
        avg_ridership: column(&results, |r| r.avg_ridership),
        adherence: column(&results, |r| r.strategic_adherence_count as f64),
        elapsed_us: column(&results, |r| r.elapsed_us as f64),
        individual_runs: results,
    }
}
