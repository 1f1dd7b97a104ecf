// Fare Desk Benchmark Runner v1.0.0 - strategy comparison over seeded terms
// Monte Carlo (N=200), seedable PRNG, offline narration
//
// Usage:
//   cargo run --release --bin bench                         # All strategies (200 runs each)
//   cargo run --release --bin bench -- --runs 20            # Quick mode
//   cargo run --release --bin bench -- FOLLOW               # Filter by name
//   cargo run --release --bin bench -- --seed 42            # Custom base seed
//   cargo run --release --bin bench -- --config tuned.json  # Override engine config
//   RUST_LOG=fare.term=info cargo run --release --bin bench # Engine tracing

mod monte_carlo;
mod report;
mod strategies;

use fare_engine::EngineConfig;
use report::*;
use strategies::*;
use std::error::Error;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    runs: usize,
    seed: u64,
    config: Option<String>,
    filter: Option<String>,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cli = CliArgs {
        runs: 200,
        seed: 0,
        config: None,
        filter: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--runs" => {
                i += 1;
                if i < args.len() {
                    cli.runs = args[i].parse().unwrap_or(200);
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    cli.seed = args[i].parse().unwrap_or(0);
                }
            }
            "--config" => {
                i += 1;
                if i < args.len() {
                    cli.config = Some(args[i].clone());
                }
            }
            arg if !arg.starts_with('-') => {
                cli.filter = Some(arg.to_string());
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    cli
}

fn load_config(path: Option<&str>) -> Result<EngineConfig, Box<dyn Error>> {
    match path {
        Some(p) => {
            let json = std::fs::read_to_string(p)?;
            Ok(EngineConfig::from_json(&json)?)
        }
        None => Ok(EngineConfig::default()),
    }
}

fn mark(ok: bool) -> &'static str {
    if ok { "PASS" } else { "FAIL" }
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = parse_args();
    let config = load_config(cli.config.as_deref())?;
    let all_strategies = strategies();

    let to_run: Vec<&Strategy> = match &cli.filter {
        Some(f) => {
            let f_lower = f.to_lowercase();
            all_strategies.iter()
                .filter(|s| s.name.to_lowercase().contains(&f_lower)
                          || s.label.to_lowercase().contains(&f_lower)
                          || s.category.to_lowercase().contains(&f_lower))
                .collect()
        }
        None => all_strategies.iter().collect(),
    };

    if to_run.is_empty() {
        eprintln!("No strategies match filter: {:?}", cli.filter);
        std::process::exit(1);
    }

    println!("\n  Fare Desk Benchmark Runner v1.0.0");
    println!("  PRNG: ChaCha8Rng | Runs/strategy: {} | Base seed: {}", cli.runs, cli.seed);
    println!("  Running {} strateg{}...\n", to_run.len(), if to_run.len() == 1 { "y" } else { "ies" });
    println!("  {:<32} {:>11} {:>14} {:>9} {:>7} {:>8}",
        "Strategy", "Score", "Profit", "Satisf.", "Adher.", "Time");
    println!("  {}", "-".repeat(86));

    let suite_start = Instant::now();
    let mut mc_reports = Vec::new();

    for strategy in &to_run {
        let report = monte_carlo::run_monte_carlo(strategy, &config, cli.runs, cli.seed)?;

        println!("  {:<32} {:>5.1}±{:<4.1} {:>14} {:>8.1}% {:>+7.2} {:>6.0}us",
            report.label,
            report.score.mean,
            report.score.half_width(),
            fare_engine::money::format_currency(report.avg_profit.mean),
            report.avg_satisfaction.mean,
            report.adherence.mean,
            report.elapsed_us.mean,
        );

        mc_reports.push(report);
    }

    let suite_elapsed = suite_start.elapsed();

    // ─── Policy Validation ──────────────────────────────────────────────

    let mean_score = |name: &str| mc_reports.iter()
        .find(|r| r.strategy_name == name)
        .map(|r| r.score.mean);

    // A comparison whose strategies were filtered out does not fail.
    let ideal_beats = |other: &str| match (mean_score("FOLLOW_IDEAL"), mean_score(other)) {
        (Some(ideal), Some(rival)) => ideal > rival,
        _ => true,
    };

    let free_fare_loses_money = mc_reports.iter()
        .find(|r| r.strategy_name == "FREE_FARE")
        .map(|r| r.avg_profit.max < 0.0)
        .unwrap_or(true);

    let scores_in_range = mc_reports.iter()
        .all(|r| r.score.min >= 0.0 && r.score.max <= 100.0);

    let validation = PolicyValidation {
        ideal_beats_hold: ideal_beats("HOLD"),
        ideal_beats_contrarian: ideal_beats("CONTRARIAN"),
        free_fare_loses_money,
        scores_in_range,
    };

    println!("  {}", "-".repeat(86));
    println!("  Strategies: {}  Suite time: {:.1}s\n", mc_reports.len(), suite_elapsed.as_secs_f64());

    println!("  Policy Validation:");
    println!("    Ideal beats hold:        {}", mark(validation.ideal_beats_hold));
    println!("    Ideal beats contrarian:  {}", mark(validation.ideal_beats_contrarian));
    println!("    Free fare loses money:   {}", mark(validation.free_fare_loses_money));
    println!("    Scores within 0..100:    {}\n", mark(validation.scores_in_range));

    // ─── Write JSON Report ──────────────────────────────────────────────

    let ts = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis();
    let timestamp = format!("{}", ts);
    let all_pass = validation.all_pass();

    let report = BenchReport {
        timestamp: timestamp.clone(),
        version: "1.0.0",
        prng: "ChaCha8Rng",
        n_runs_per_strategy: cli.runs,
        base_seed: cli.seed,
        config,
        policy_validation: validation,
        strategies: mc_reports,
    };

    let dir = std::path::Path::new("benchmark-results");
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("bench-{}.json", timestamp));
    std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
    println!("  Results saved to: {}\n", path.display());

    if !all_pass {
        std::process::exit(1);
    }
    Ok(())
}
