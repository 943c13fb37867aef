use party_finances::{
    generate, render_dashboard, run_ensemble, EnsembleExperiment, FinancialSummary, NoiseMode,
    PartyConfig, SeriesTable,
};
use std::fs;
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("party_finances_{}_{}", name, std::process::id()))
}

fn manifest_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

#[test]
fn csv_export_lands_in_output_dir() {
    let dir = scratch_dir("csv");
    let config = PartyConfig {
        output_dir: dir.clone(),
        ..PartyConfig::deterministic()
    };
    let table = generate(&config);
    let path = config.csv_path();

    table.write_csv(&path).unwrap();

    assert!(path.ends_with("modem_financial_data_2007_2025.csv"));
    let contents = fs::read_to_string(&path).unwrap();
    let mut lines = contents.lines();
    let header: Vec<&str> = lines.next().unwrap().split(',').collect();
    assert_eq!(header, SeriesTable::header());
    assert_eq!(lines.count(), 19);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn csv_values_parse_back() {
    let table = generate(&PartyConfig::deterministic());
    let csv = table.to_csv_string().unwrap();

    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let mut years = Vec::new();
    for record in reader.records() {
        let record = record.unwrap();
        years.push(record[0].parse::<i32>().unwrap());
        for field in record.iter().skip(1) {
            assert!(field.parse::<f64>().unwrap().is_finite());
        }
    }
    assert_eq!(years, table.years());
}

#[test]
fn dashboard_renders_for_seeded_run() {
    let dir = scratch_dir("charts");
    let config = PartyConfig {
        output_dir: dir.clone(),
        ..PartyConfig::seeded(42)
    };
    let table = generate(&config);

    render_dashboard(&table, &config, config.chart_path()).unwrap();

    assert!(config.chart_path().exists());
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn bundled_configs_parse() {
    let seeded = PartyConfig::load(manifest_path("configs/modem_seeded.toml")).unwrap();
    assert_eq!(seeded.seed, Some(42));
    assert_eq!(seeded.european_elections, PartyConfig::modem().european_elections);

    let deterministic = PartyConfig::load(manifest_path("configs/deterministic.toml")).unwrap();
    assert_eq!(deterministic.noise, NoiseMode::Disabled);
    assert_eq!(deterministic.start_year, 2007);
    assert_eq!(deterministic.file_prefix, "modem_deterministic");
}

#[test]
fn bundled_experiments_parse() {
    let baseline =
        EnsembleExperiment::load(manifest_path("experiments/baseline_ensemble.toml")).unwrap();
    assert_eq!(baseline.ensemble.name, "baseline_ensemble");
    assert_eq!(baseline.ensemble.runs, 200);
    assert_eq!(baseline.ensemble.base_seed, 42);
    assert_eq!(baseline.party.start_year, 2007);

    let small =
        EnsembleExperiment::load(manifest_path("experiments/small_party_ensemble.toml")).unwrap();
    assert_eq!(small.ensemble.num_threads, Some(4));
    assert_eq!(small.party.base_budget, 3.0);
    assert_eq!(small.party.file_prefix, "small_party");
    assert_eq!(
        small.summary_path(),
        PathBuf::from("results/small_party_ensemble/ensemble_summary.toml")
    );
}

#[test]
fn summary_matches_ensemble_of_one() {
    let config = PartyConfig::seeded(5);
    let single = FinancialSummary::from_table(&generate(&config)).unwrap();
    let ensemble = run_ensemble(&PartyConfig::modem(), 1, 5);

    assert_eq!(ensemble.successful_runs, 1);
    assert_eq!(ensemble.avg_revenue.mean, single.avg_revenue);
    assert_eq!(ensemble.final_reserves.min, single.final_reserves);
    assert_eq!(ensemble.avg_revenue.std, 0.0);
}
