use tracing::{debug, info};

use crate::config::PartyConfig;
use crate::events::{apply_events, PARTY_EVENTS};
use crate::noise::NoiseSource;
use crate::table::SeriesTable;

/// Generate the full table: every metric, then the milestone adjustments
///
/// The noise source is derived from the configuration (seeded, OS-seeded or
/// disabled).
pub fn generate(config: &PartyConfig) -> SeriesTable {
    let mut noise = NoiseSource::from_config(config);
    generate_with(config, &mut noise)
}

/// Same as [`generate`] with an explicit noise source
pub fn generate_with(config: &PartyConfig, noise: &mut NoiseSource) -> SeriesTable {
    debug!(
        start_year = config.start_year,
        end_year = config.end_year,
        seed = ?config.seed,
        noise = noise.is_enabled(),
        "generating series"
    );

    let mut table = SeriesTable::generate(config, noise);
    apply_events(&mut table, PARTY_EVENTS);

    info!(rows = table.len(), party = %config.party_name, "series table ready");
    table
}
