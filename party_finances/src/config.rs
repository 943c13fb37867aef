use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

/// How the multiplicative noise factor is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseMode {
    /// Draw from N(1, σ) with the metric's own σ
    Gaussian,
    /// Every factor is exactly 1.0
    Disabled,
}

/// A European Parliament election and the seats it returned
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct EuropeanElection {
    pub year: i32,
    pub seats: f64,
}

impl EuropeanElection {
    pub const fn new(year: i32, seats: f64) -> Self {
        EuropeanElection { year, seats }
    }
}

/// Generator configuration. Built once at startup and never mutated.
///
/// Regime boundaries that are specific to one metric live in the recipe
/// table (`metrics`); only the shared magnitudes and the calendar live here.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartyConfig {
    // Party profile (report only)
    pub party_name: String,
    pub orientation: String,
    pub target_electorate: Vec<String>,
    pub funding_sources: Vec<String>,

    // Year range, inclusive on both ends
    pub start_year: i32,
    pub end_year: i32,

    // Base magnitudes
    pub base_budget: f64,    // millions of euros
    pub base_adherents: f64, // members in the first year

    /// Elections driving the European-officials step function
    pub european_elections: Vec<EuropeanElection>,

    // Randomness
    pub noise: NoiseMode,
    pub seed: Option<u64>,

    // Output
    pub output_dir: PathBuf,
    pub file_prefix: String,
}

impl PartyConfig {
    /// Baseline: the MoDem from its creation in 2007 to 2025
    pub fn modem() -> Self {
        PartyConfig {
            party_name: "Mouvement Démocrate (MoDem)".to_string(),
            orientation: "centre".to_string(),
            target_electorate: vec![
                "cadres".to_string(),
                "enseignants".to_string(),
                "fonctionnaires".to_string(),
                "classes_moyennes_supérieures".to_string(),
            ],
            funding_sources: vec![
                "cotisations".to_string(),
                "dons".to_string(),
                "financement_public".to_string(),
                "evenements".to_string(),
                "formations".to_string(),
            ],
            start_year: 2007,
            end_year: 2025,
            base_budget: 6.0,
            base_adherents: 30000.0,
            european_elections: vec![
                EuropeanElection::new(2009, 6.0),
                EuropeanElection::new(2014, 4.0),
                EuropeanElection::new(2019, 6.0),
            ],
            noise: NoiseMode::Gaussian,
            seed: None,
            output_dir: PathBuf::from("results"),
            file_prefix: "modem".to_string(),
        }
    }

    /// Baseline with noise disabled: every metric is a pure function of the year
    pub fn deterministic() -> Self {
        PartyConfig {
            noise: NoiseMode::Disabled,
            ..Self::modem()
        }
    }

    /// Baseline with a fixed seed, reproducible run to run
    pub fn seeded(seed: u64) -> Self {
        PartyConfig {
            seed: Some(seed),
            ..Self::modem()
        }
    }

    /// Parse a TOML document. Missing keys fall back to the baseline.
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Ordered target years. Empty when `end_year < start_year`.
    pub fn years(&self) -> Vec<i32> {
        (self.start_year..=self.end_year).collect()
    }

    pub fn num_years(&self) -> usize {
        if self.end_year < self.start_year {
            0
        } else {
            (self.end_year - self.start_year) as usize + 1
        }
    }

    /// Path of the flat CSV export
    pub fn csv_path(&self) -> PathBuf {
        self.output_dir.join(format!(
            "{}_financial_data_{}_{}.csv",
            self.file_prefix, self.start_year, self.end_year
        ))
    }

    /// Path of the rendered chart dashboard
    pub fn chart_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_financial_analysis.svg", self.file_prefix))
    }
}

impl Default for PartyConfig {
    fn default() -> Self {
        PartyConfig::modem()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_years_cover_2007_to_2025() {
        let config = PartyConfig::modem();
        let years = config.years();

        assert_eq!(years.len(), 19);
        assert_eq!(config.num_years(), 19);
        assert_eq!(years.first(), Some(&2007));
        assert_eq!(years.last(), Some(&2025));
    }

    #[test]
    fn inverted_range_yields_no_years() {
        let config = PartyConfig {
            start_year: 2020,
            end_year: 2010,
            ..PartyConfig::modem()
        };

        assert!(config.years().is_empty());
        assert_eq!(config.num_years(), 0);
    }

    #[test]
    fn deterministic_preset_disables_noise() {
        let config = PartyConfig::deterministic();
        assert_eq!(config.noise, NoiseMode::Disabled);
        assert_eq!(config.base_budget, 6.0);
    }

    #[test]
    fn partial_toml_falls_back_to_baseline() {
        let config = PartyConfig::from_toml_str(
            r#"
            start_year = 2010
            end_year = 2012
            seed = 7
            noise = "disabled"
            "#,
        )
        .unwrap();

        assert_eq!(config.start_year, 2010);
        assert_eq!(config.end_year, 2012);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.noise, NoiseMode::Disabled);
        assert_eq!(config.base_adherents, 30000.0);
        assert_eq!(config.european_elections.len(), 3);
    }

    #[test]
    fn toml_elections_override_defaults() {
        let config = PartyConfig::from_toml_str(
            r#"
            [[european_elections]]
            year = 2024
            seats = 5.0
            "#,
        )
        .unwrap();

        assert_eq!(
            config.european_elections,
            vec![EuropeanElection::new(2024, 5.0)]
        );
    }

    #[test]
    fn unknown_toml_key_is_rejected() {
        assert!(PartyConfig::from_toml_str("base_budjet = 3.0").is_err());
    }

    #[test]
    fn output_paths_use_prefix_and_range() {
        let config = PartyConfig::modem();
        assert_eq!(
            config.csv_path(),
            PathBuf::from("results/modem_financial_data_2007_2025.csv")
        );
        assert_eq!(
            config.chart_path(),
            PathBuf::from("results/modem_financial_analysis.svg")
        );
    }
}
