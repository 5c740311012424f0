//! Cascade CLI - Analyzes a referendum vote pattern
//!
//! This binary runs the full cascade analysis for one vote pattern and
//! prints the result as JSON, or a short human-readable summary with
//! `--summary`.

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cascade_engine::{AnalysisOptions, Engine, Votes};
use cascade_tables::ReferenceTables;

#[derive(Parser, Debug)]
#[command(name = "cascade")]
#[command(about = "Analyze the cascading effects of a five-question referendum vote")]
struct Cli {
    /// Vote pattern for Q1..Q5, e.g. 10110
    pattern: String,

    /// Projection horizon in months
    #[arg(long, default_value = "60")]
    months: u32,

    /// Monte Carlo iterations
    #[arg(long, default_value = "100")]
    iterations: usize,

    /// Root seed for the Monte Carlo estimator
    #[arg(long)]
    seed: Option<u64>,

    /// Load an alternate reference table set from a JSON file
    #[arg(long)]
    tables: Option<PathBuf>,

    /// Emit the causal network graph instead of the analysis bundle
    #[arg(long)]
    network: bool,

    /// Print a short human-readable summary instead of JSON
    #[arg(long)]
    summary: bool,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cascade=info,cascade_engine=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let votes: Votes = match cli.pattern.parse() {
        Ok(v) => v,
        Err(e) => {
            error!("Invalid vote pattern: {}", e);
            std::process::exit(1);
        }
    };

    let engine = match &cli.tables {
        Some(path) => {
            info!("Loading tables from: {}", path.display());
            let json = match std::fs::read_to_string(path) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to read {}: {}", path.display(), e);
                    std::process::exit(1);
                }
            };
            match ReferenceTables::from_json_str(&json) {
                Ok(tables) => Engine::new(tables),
                Err(e) => {
                    error!("Failed to parse tables: {}", e);
                    std::process::exit(1);
                }
            }
        }
        None => Engine::builtin(),
    };

    if cli.network {
        let network = engine.causal_network(votes);
        emit(&network);
        return;
    }

    let mut options = AnalysisOptions {
        months: cli.months,
        iterations: cli.iterations,
        ..AnalysisOptions::default()
    };
    if let Some(seed) = cli.seed {
        options.seed = seed;
    }

    let result = match engine.analyze_with(votes, options) {
        Ok(r) => r,
        Err(e) => {
            error!("Analysis failed: {}", e);
            std::process::exit(1);
        }
    };

    if cli.summary {
        print_summary(&engine, &result);
    } else {
        emit(&result);
    }
}

fn emit<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            error!("Failed to serialize result: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_summary(engine: &Engine, result: &cascade_engine::ScenarioResult) {
    let network = engine.causal_network(result.votes);

    println!("Pattern:        {}", result.binary);
    println!(
        "Archetype:      {} (distance {})",
        result.archetype.archetype.name, result.archetype.distance
    );
    println!("Affected:       {} people", result.affected_population);
    println!(
        "First order:    economic {:+.3}, social {:+.3}, political {:+.3}",
        result.first_order.economic, result.first_order.social, result.first_order.political
    );
    println!(
        "Second order:   synergies {:.3}, conflicts {:.3}, cascades {}",
        result.second_order.synergies,
        result.second_order.conflicts,
        result.second_order.cascades.len()
    );
    println!(
        "Third order:    risk {:.3}, transformation {:.3}",
        result.third_order.systemic_risk, result.third_order.transformation_potential
    );
    println!(
        "Network:        {} nodes, {} edges, {} loops, systemic risk {:.3}",
        network.nodes.len(),
        network.edges.len(),
        network.loops.len(),
        network.metrics.systemic_risk
    );
    println!(
        "Economy (MC):   mean {:+.3} [p5 {:+.3}, p95 {:+.3}]",
        result.uncertainty.economic.mean,
        result.uncertainty.economic.p5,
        result.uncertainty.economic.p95
    );
    for point in &result.third_order.tipping_points {
        println!("Tipping point:  {} ({})", point.trigger, point.consequence);
    }
}
