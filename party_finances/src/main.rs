//! Party Finances - single run
//!
//! Generates the annual series, exports the CSV, renders the chart dashboard
//! and prints the analytical summary.
//!
//! Usage:
//!   cargo run --release -p party_finances -- [config.toml]

use party_finances::report::print_preview;
use party_finances::{
    generate, init_tracing, render_dashboard, FinancialSummary, Metric, PartyConfig,
};
use std::env;
use std::error::Error;
use std::time::Instant;
use tracing::warn;

fn main() {
    init_tracing();

    let config = match env::args().nth(1) {
        Some(path) => {
            println!("Loading config: {}\n", path);
            PartyConfig::load(&path).unwrap_or_else(|e| {
                eprintln!("Error loading config {}: {}", path, e);
                std::process::exit(1);
            })
        }
        None => PartyConfig::modem(),
    };

    if let Err(e) = run(&config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(config: &PartyConfig) -> Result<(), Box<dyn Error>> {
    println!("=== Synthetic Party Finances ===");
    println!("{}\n", config.party_name);

    println!("Configuration:");
    println!("  Years: {}-{}", config.start_year, config.end_year);
    println!("  Base budget: {:.1} M€", config.base_budget);
    println!("  Base adherents: {:.0}", config.base_adherents);
    println!("  Noise: {:?}", config.noise);
    match config.seed {
        Some(seed) => println!("  Seed: {}", seed),
        None => println!("  Seed: from OS entropy"),
    }
    println!();

    let start = Instant::now();
    let table = generate(config);
    println!(
        "Generated {} years × {} metrics in {:.2?}\n",
        table.len(),
        Metric::COUNT,
        start.elapsed()
    );

    let csv_path = config.csv_path();
    table.write_csv(&csv_path)?;
    println!("Data saved to {}", csv_path.display());

    println!("\nPreview:");
    print_preview(&table, 5);

    let Some(summary) = FinancialSummary::from_table(&table) else {
        warn!("empty year range, nothing to chart or summarize");
        return Ok(());
    };

    let chart_path = config.chart_path();
    render_dashboard(&table, config, &chart_path)?;
    println!("\nCharts saved to {}\n", chart_path.display());

    summary.print_summary(config);
    Ok(())
}
