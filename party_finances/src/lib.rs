//! Synthetic Party Finances Generator
//!
//! Produces a plausible annual financial and organizational time series for a
//! centrist political party (2007-2025 by default), then exports it as a flat
//! CSV table, renders descriptive charts and prints a textual summary.
//!
//! Pipeline:
//! - `metrics`: one recipe per metric (base, growth regime, calendar
//!   multipliers, noise), interpreted by a single generation routine
//! - `table`: column-oriented series table, one row per year
//! - `events`: one-off multiplicative corrections for historical milestones
//! - `generator`: wires generation and the event pass together
//! - `report` / `charts`: downstream consumers of the finished table
//! - `ensemble`: Monte Carlo batches over many seeds
//!
//! Every value is a pure function of the year, its position in the sequence,
//! the configuration and one normal noise draw. With noise disabled the whole
//! table is deterministic.

pub mod charts;
pub mod config;
pub mod ensemble;
pub mod events;
pub mod generator;
pub mod metrics;
pub mod noise;
pub mod report;
pub mod table;

pub use charts::render_dashboard;
pub use config::{EuropeanElection, NoiseMode, PartyConfig};
pub use ensemble::{
    run_ensemble, run_seed, EnsembleExperiment, EnsembleSettings, EnsembleSummary, MeanStd,
};
pub use events::{apply_events, Adjustment, PartyEvent, YearSpan, PARTY_EVENTS};
pub use generator::{generate, generate_with};
pub use metrics::{Metric, MetricGroup};
pub use noise::NoiseSource;
pub use report::FinancialSummary;
pub use table::SeriesTable;

use tracing_subscriber::EnvFilter;

/// Install a `tracing` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_tracing_twice_does_not_panic() {
        super::init_tracing();
        super::init_tracing();
    }
}
