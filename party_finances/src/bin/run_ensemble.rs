//! Ensemble Runner
//!
//! Runs many seeded generations from a TOML experiment file and reports the
//! spread of the headline statistics.
//!
//! Usage:
//!   cargo run --release --bin run_ensemble -- experiments/baseline_ensemble.toml

use party_finances::{init_tracing, run_ensemble, EnsembleExperiment};
use std::env;
use std::time::Instant;

fn main() {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <experiment.toml>", args[0]);
        eprintln!("Example: {} experiments/baseline_ensemble.toml", args[0]);
        std::process::exit(1);
    }

    let config_path = &args[1];
    println!("=== Party Finances Ensemble Runner ===\n");
    println!("Loading experiment config: {}\n", config_path);

    let experiment = EnsembleExperiment::load(config_path).unwrap_or_else(|e| {
        eprintln!("Error loading experiment config: {}", e);
        std::process::exit(1);
    });

    let settings = &experiment.ensemble;
    println!("Experiment: {}", settings.name);
    if !settings.description.is_empty() {
        println!("Description: {}", settings.description);
    }
    println!(
        "Configuration: {} runs × {} years\n",
        settings.runs,
        experiment.party.num_years()
    );

    if let Some(threads) = settings.num_threads {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
        {
            eprintln!("Error configuring thread pool: {}", e);
            std::process::exit(1);
        }
    }

    let start = Instant::now();
    let summary = run_ensemble(&experiment.party, settings.runs, settings.base_seed);
    println!("Completed {} runs in {:.2?}", summary.runs, start.elapsed());

    summary.print_summary();

    let output_path = experiment.summary_path();
    if let Err(e) = summary.write_toml(&output_path) {
        eprintln!("Error saving summary: {}", e);
        std::process::exit(1);
    }
    println!("\nSummary saved to {}", output_path.display());
}
