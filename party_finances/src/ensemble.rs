//! Monte Carlo batch runs
//!
//! Runs the generator once per seed `base_seed + i` in parallel and
//! aggregates the headline statistics across runs. Each run is
//! single-threaded and deterministic for its seed, so the aggregate does not
//! depend on the thread count.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::PartyConfig;
use crate::generator::generate;
use crate::report::{mean, std_dev, FinancialSummary};

/// Experiment file driving the ensemble runner
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnsembleExperiment {
    /// Missing keys fall back to the baseline party
    #[serde(default)]
    pub party: PartyConfig,
    pub ensemble: EnsembleSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnsembleSettings {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub runs: usize,
    pub base_seed: u64,
    /// Defaults to rayon's global pool size
    pub num_threads: Option<usize>,
}

impl EnsembleExperiment {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        Ok(toml::from_str(s)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Where the aggregate summary is saved
    pub fn summary_path(&self) -> PathBuf {
        self.party
            .output_dir
            .join(&self.ensemble.name)
            .join("ensemble_summary.toml")
    }
}

/// Seed of run `index`; wraps past `u64::MAX`
pub fn run_seed(base_seed: u64, index: usize) -> u64 {
    base_seed.wrapping_add(index as u64)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeanStd {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl MeanStd {
    /// All zeros for an empty slice
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return MeanStd {
                mean: 0.0,
                std: 0.0,
                min: 0.0,
                max: 0.0,
            };
        }

        MeanStd {
            mean: mean(values),
            std: std_dev(values),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

/// Aggregate statistics across runs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnsembleSummary {
    pub runs: usize,
    pub successful_runs: usize,
    pub base_seed: u64,
    /// Share of runs whose average balance is negative
    pub deficit_rate: f64,
    pub avg_revenue: MeanStd,
    pub avg_expenses: MeanStd,
    pub avg_adherents: MeanStd,
    pub revenue_growth_pct: MeanStd,
    pub adherents_growth_pct: MeanStd,
    pub public_funding_share_pct: MeanStd,
    pub avg_balance_pct: MeanStd,
    pub final_reserves: MeanStd,
    pub final_public_dependency_pct: MeanStd,
}

impl EnsembleSummary {
    pub fn from_summaries(summaries: &[FinancialSummary], runs: usize, base_seed: u64) -> Self {
        let field = |f: fn(&FinancialSummary) -> f64| {
            let values: Vec<f64> = summaries.iter().map(f).collect();
            MeanStd::from_values(&values)
        };

        let deficits = summaries.iter().filter(|s| s.avg_balance_pct < 0.0).count();
        let deficit_rate = if summaries.is_empty() {
            0.0
        } else {
            deficits as f64 / summaries.len() as f64
        };

        EnsembleSummary {
            runs,
            successful_runs: summaries.len(),
            base_seed,
            deficit_rate,
            avg_revenue: field(|s| s.avg_revenue),
            avg_expenses: field(|s| s.avg_expenses),
            avg_adherents: field(|s| s.avg_adherents),
            revenue_growth_pct: field(|s| s.revenue_growth_pct),
            adherents_growth_pct: field(|s| s.adherents_growth_pct),
            public_funding_share_pct: field(|s| s.public_funding_share_pct),
            avg_balance_pct: field(|s| s.avg_balance_pct),
            final_reserves: field(|s| s.final_reserves),
            final_public_dependency_pct: field(|s| s.final_public_dependency_pct),
        }
    }

    pub fn print_summary(&self) {
        println!("\n=== Ensemble Summary ===");
        println!(
            "Runs: {} ({} with data), seeds {}..{}",
            self.runs,
            self.successful_runs,
            self.base_seed,
            run_seed(self.base_seed, self.runs)
        );
        println!("Deficit rate: {:.1}%", self.deficit_rate * 100.0);
        println!();

        let rows = [
            ("Average revenue (M€)", &self.avg_revenue),
            ("Average expenses (M€)", &self.avg_expenses),
            ("Average adherents", &self.avg_adherents),
            ("Revenue growth (%)", &self.revenue_growth_pct),
            ("Adherents growth (%)", &self.adherents_growth_pct),
            ("Public funding share (%)", &self.public_funding_share_pct),
            ("Average balance (%)", &self.avg_balance_pct),
            ("Final reserves (M€)", &self.final_reserves),
            ("Final dependency (%)", &self.final_public_dependency_pct),
        ];

        println!(
            "{:<26} {:>12} {:>10} {:>12} {:>12}",
            "Statistic", "Mean", "Std", "Min", "Max"
        );
        println!("{}", "-".repeat(76));
        for (label, stat) in rows {
            println!(
                "{:<26} {:>12.3} {:>10.3} {:>12.3} {:>12.3}",
                label, stat.mean, stat.std, stat.min, stat.max
            );
        }
    }

    /// Save the aggregate as TOML, creating the parent directory if needed
    pub fn write_toml<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn Error>> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Run `runs` seeded generations in parallel and aggregate them
///
/// Run `i` uses seed `base_seed + i`, wrapping on overflow. Runs over an
/// empty year range carry no summary and only count towards `runs`.
pub fn run_ensemble(config: &PartyConfig, runs: usize, base_seed: u64) -> EnsembleSummary {
    info!(runs, base_seed, "starting ensemble");

    let summaries: Vec<FinancialSummary> = (0..runs)
        .into_par_iter()
        .filter_map(|i| {
            let seed = run_seed(base_seed, i);
            let run_config = PartyConfig {
                seed: Some(seed),
                ..config.clone()
            };
            let summary = FinancialSummary::from_table(&generate(&run_config));
            debug!(seed, has_data = summary.is_some(), "run finished");
            summary
        })
        .collect();

    EnsembleSummary::from_summaries(&summaries, runs, base_seed)
}
