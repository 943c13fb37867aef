//! Column-oriented series table and its flat CSV export

use std::error::Error;
use std::fs;
use std::io;
use std::path::Path;

use crate::config::PartyConfig;
use crate::metrics::{generate_series, Metric};
use crate::noise::NoiseSource;

/// Header of the year column in the export
pub const YEAR_COLUMN: &str = "Annee";

/// One named series per metric, all the same length as `years`
///
/// Years are contiguous and strictly increasing, one row per year.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesTable {
    years: Vec<i32>,
    columns: Vec<Vec<f64>>,
}

/// Row view used by the export and the console preview
#[derive(Debug, Clone, PartialEq)]
pub struct YearRow {
    pub year: i32,
    pub values: Vec<f64>,
}

impl YearRow {
    pub fn get(&self, metric: Metric) -> f64 {
        self.values[metric.index()]
    }
}

impl SeriesTable {
    /// Generate every metric independently, in column order
    ///
    /// Noise draws are consumed metric by metric, then year by year.
    pub fn generate(config: &PartyConfig, noise: &mut NoiseSource) -> Self {
        let years = config.years();
        let columns = Metric::ALL
            .iter()
            .map(|&metric| generate_series(metric, &years, config, noise))
            .collect();

        SeriesTable { years, columns }
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn first_year(&self) -> Option<i32> {
        self.years.first().copied()
    }

    pub fn last_year(&self) -> Option<i32> {
        self.years.last().copied()
    }

    /// Row position of `year`, if the table covers it
    pub fn row_index(&self, year: i32) -> Option<usize> {
        self.years.binary_search(&year).ok()
    }

    pub fn series(&self, metric: Metric) -> &[f64] {
        &self.columns[metric.index()]
    }

    pub fn series_mut(&mut self, metric: Metric) -> &mut [f64] {
        &mut self.columns[metric.index()]
    }

    pub fn value(&self, year: i32, metric: Metric) -> Option<f64> {
        self.row_index(year).map(|row| self.series(metric)[row])
    }

    pub fn row(&self, index: usize) -> Option<YearRow> {
        let year = *self.years.get(index)?;
        let values = self.columns.iter().map(|column| column[index]).collect();
        Some(YearRow { year, values })
    }

    pub fn rows(&self) -> impl Iterator<Item = YearRow> + '_ {
        (0..self.len()).filter_map(move |index| self.row(index))
    }

    /// `Annee` followed by every metric column in generation order
    pub fn header() -> Vec<&'static str> {
        std::iter::once(YEAR_COLUMN)
            .chain(Metric::ALL.iter().map(|m| m.column()))
            .collect()
    }

    /// Write the table as CSV to any writer
    pub fn write_csv_to<W: io::Write>(&self, writer: W) -> Result<(), Box<dyn Error>> {
        let mut wtr = csv::Writer::from_writer(writer);

        wtr.write_record(Self::header())?;

        for row in self.rows() {
            let mut record = Vec::with_capacity(Metric::COUNT + 1);
            record.push(row.year.to_string());
            record.extend(row.values.iter().map(|v| v.to_string()));
            wtr.write_record(&record)?;
        }

        wtr.flush()?;
        Ok(())
    }

    /// Write the flat export, creating the parent directory if needed
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn Error>> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = fs::File::create(path)?;
        self.write_csv_to(io::BufWriter::new(file))
    }

    pub fn to_csv_string(&self) -> Result<String, Box<dyn Error>> {
        let mut buffer = Vec::new();
        self.write_csv_to(&mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
