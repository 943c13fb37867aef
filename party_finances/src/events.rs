//! One-off adjustments for the party's historical milestones
//!
//! Runs after every metric has been generated. Each rule multiplies (or
//! overrides) the value of a few metrics over a year span. Rules apply in
//! listed order and compose multiplicatively when they touch the same cell,
//! so applying the pass twice compounds the factors.

use tracing::debug;

use crate::metrics::Metric;
use crate::table::SeriesTable;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Adjustment {
    /// Multiply the existing value
    Scale(f64),
    /// Replace the existing value
    Set(f64),
}

impl Adjustment {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Adjustment::Scale(factor) => value * factor,
            Adjustment::Set(replacement) => replacement,
        }
    }
}

/// Inclusive range of calendar years
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearSpan {
    pub first: i32,
    pub last: i32,
}

impl YearSpan {
    pub const fn single(year: i32) -> Self {
        YearSpan {
            first: year,
            last: year,
        }
    }

    pub const fn range(first: i32, last: i32) -> Self {
        YearSpan { first, last }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.first <= year && year <= self.last
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartyEvent {
    pub label: &'static str,
    pub span: YearSpan,
    pub effects: &'static [(Metric, Adjustment)],
}

/// Milestones of the MoDem, in application order
///
/// The two European-election rules pin `Elus_Europeens` to 6 seats in 2009
/// and 2019 regardless of the configured elections.
pub const PARTY_EVENTS: &[PartyEvent] = &[
    PartyEvent {
        label: "Party founded",
        span: YearSpan::single(2007),
        effects: &[
            (Metric::TotalRevenue, Adjustment::Scale(1.6)),
            (Metric::Adherents, Adjustment::Scale(2.2)),
        ],
    },
    PartyEvent {
        label: "Presidential election",
        span: YearSpan::single(2007),
        effects: &[
            (Metric::PrivateDonations, Adjustment::Scale(2.5)),
            (Metric::CampaignExpenses, Adjustment::Scale(2.8)),
        ],
    },
    PartyEvent {
        label: "European election",
        span: YearSpan::single(2009),
        // Fixed seat count, not read from `european_elections`: a config
        // with other results is overridden here in 2009
        effects: &[
            (Metric::EuropeanOfficials, Adjustment::Set(6.0)),
            (Metric::EuropeanFunding, Adjustment::Scale(1.8)),
        ],
    },
    PartyEvent {
        label: "Alliance with the PS",
        span: YearSpan::single(2012),
        effects: &[
            (Metric::PublicFunding, Adjustment::Scale(1.4)),
            (Metric::NationalOfficials, Adjustment::Scale(1.6)),
        ],
    },
    PartyEvent {
        label: "Government participation",
        span: YearSpan::range(2012, 2016),
        effects: &[
            (Metric::TotalRevenue, Adjustment::Scale(1.15)),
            (Metric::StaffExpenses, Adjustment::Scale(1.10)),
        ],
    },
    PartyEvent {
        label: "Alliance with LREM",
        span: YearSpan::single(2017),
        effects: &[
            (Metric::TotalRevenue, Adjustment::Scale(1.4)),
            (Metric::PublicFunding, Adjustment::Scale(1.6)),
            (Metric::NationalOfficials, Adjustment::Scale(4.5)),
            (Metric::Adherents, Adjustment::Scale(1.2)),
        ],
    },
    PartyEvent {
        label: "European election",
        span: YearSpan::single(2019),
        // Fixed seat count, not read from `european_elections`: a config
        // with other results is overridden here in 2019
        effects: &[
            (Metric::EuropeanOfficials, Adjustment::Set(6.0)),
            (Metric::EuropeanInvestment, Adjustment::Scale(1.5)),
        ],
    },
    PartyEvent {
        label: "Legislative re-election",
        span: YearSpan::single(2022),
        effects: &[
            (Metric::CampaignExpenses, Adjustment::Scale(1.8)),
            (Metric::PrivateDonations, Adjustment::Scale(1.4)),
        ],
    },
];

/// Annotated points on the revenue chart
pub const KEY_EVENTS: &[(i32, &str)] = &[
    (2007, "Founding"),
    (2009, "European election"),
    (2012, "PS alliance"),
    (2017, "LREM alliance"),
    (2022, "Legislative"),
];

/// Apply `events` to `table` in place, in order
///
/// Years outside the table are skipped without complaint.
pub fn apply_events(table: &mut SeriesTable, events: &[PartyEvent]) {
    for event in events {
        for year in event.span.first..=event.span.last {
            let Some(row) = table.row_index(year) else {
                continue;
            };
            for &(metric, adjustment) in event.effects {
                let cell = &mut table.series_mut(metric)[row];
                *cell = adjustment.apply(*cell);
            }
            debug!(year, event = event.label, "event applied");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PartyConfig;
    use crate::noise::NoiseSource;
    use approx::assert_relative_eq;

    fn raw_table() -> SeriesTable {
        SeriesTable::generate(&PartyConfig::deterministic(), &mut NoiseSource::disabled())
    }

    #[test]
    fn adjustment_scale_and_set() {
        assert_eq!(Adjustment::Scale(2.0).apply(3.0), 6.0);
        assert_eq!(Adjustment::Set(6.0).apply(3.0), 6.0);
    }

    #[test]
    fn year_span_contains_bounds() {
        let span = YearSpan::range(2012, 2016);
        assert!(span.contains(2012));
        assert!(span.contains(2016));
        assert!(!span.contains(2017));
        assert!(YearSpan::single(2007).contains(2007));
    }

    #[test]
    fn founding_year_factors_applied() {
        let raw = raw_table();
        let mut adjusted = raw.clone();
        apply_events(&mut adjusted, PARTY_EVENTS);

        let ratio = |metric| adjusted.value(2007, metric).unwrap() / raw.value(2007, metric).unwrap();
        assert_relative_eq!(ratio(Metric::TotalRevenue), 1.6, epsilon = 1e-12);
        assert_relative_eq!(ratio(Metric::Adherents), 2.2, epsilon = 1e-12);
        assert_relative_eq!(ratio(Metric::PrivateDonations), 2.5, epsilon = 1e-12);
        assert_relative_eq!(ratio(Metric::CampaignExpenses), 2.8, epsilon = 1e-12);
        assert_relative_eq!(ratio(Metric::StaffExpenses), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn span_rules_cover_each_year() {
        let raw = raw_table();
        let mut adjusted = raw.clone();
        apply_events(&mut adjusted, PARTY_EVENTS);

        // 2012 revenue only moves with the government-participation span
        let revenue_2012 = adjusted.value(2012, Metric::TotalRevenue).unwrap();
        assert_relative_eq!(
            revenue_2012,
            raw.value(2012, Metric::TotalRevenue).unwrap() * 1.15,
            epsilon = 1e-12
        );
        let staff_2016 = adjusted.value(2016, Metric::StaffExpenses).unwrap();
        assert_relative_eq!(
            staff_2016,
            raw.value(2016, Metric::StaffExpenses).unwrap() * 1.10,
            epsilon = 1e-12
        );
        // 2017 sits outside the government span
        let revenue_2017 = adjusted.value(2017, Metric::TotalRevenue).unwrap();
        assert_relative_eq!(
            revenue_2017,
            raw.value(2017, Metric::TotalRevenue).unwrap() * 1.4,
            epsilon = 1e-12
        );
    }

    #[test]
    fn rules_on_same_cell_apply_in_listed_order() {
        const SCALE_THEN_SET: &[PartyEvent] = &[
            PartyEvent {
                label: "scale",
                span: YearSpan::single(2008),
                effects: &[(Metric::Adherents, Adjustment::Scale(2.0))],
            },
            PartyEvent {
                label: "set",
                span: YearSpan::single(2008),
                effects: &[(Metric::Adherents, Adjustment::Set(10.0))],
            },
        ];
        const SET_THEN_SCALE: &[PartyEvent] = &[SCALE_THEN_SET[1], SCALE_THEN_SET[0]];

        let mut a = raw_table();
        apply_events(&mut a, SCALE_THEN_SET);
        assert_eq!(a.value(2008, Metric::Adherents), Some(10.0));

        let mut b = raw_table();
        apply_events(&mut b, SET_THEN_SCALE);
        assert_eq!(b.value(2008, Metric::Adherents), Some(20.0));
    }

    #[test]
    fn reapplying_compounds_factors() {
        let raw = raw_table();
        let mut twice = raw.clone();
        apply_events(&mut twice, PARTY_EVENTS);
        apply_events(&mut twice, PARTY_EVENTS);

        let before = raw.value(2007, Metric::TotalRevenue).unwrap();
        let after = twice.value(2007, Metric::TotalRevenue).unwrap();
        assert_relative_eq!(after, before * 1.6 * 1.6, epsilon = 1e-12);

        let before = raw.value(2017, Metric::NationalOfficials).unwrap();
        let after = twice.value(2017, Metric::NationalOfficials).unwrap();
        assert_relative_eq!(after, before * 4.5 * 4.5, epsilon = 1e-9);

        // Overrides stay put
        assert_eq!(twice.value(2009, Metric::EuropeanOfficials), Some(6.0));
    }

    #[test]
    fn events_outside_table_are_skipped() {
        let config = PartyConfig {
            start_year: 2023,
            end_year: 2025,
            ..PartyConfig::deterministic()
        };
        let raw = SeriesTable::generate(&config, &mut NoiseSource::disabled());
        let mut adjusted = raw.clone();
        apply_events(&mut adjusted, PARTY_EVENTS);

        assert_eq!(raw, adjusted);
    }

    #[test]
    fn election_overrides_ignore_configured_seats() {
        let config = PartyConfig {
            european_elections: vec![crate::config::EuropeanElection::new(2009, 3.0)],
            ..PartyConfig::deterministic()
        };
        let mut table = SeriesTable::generate(&config, &mut NoiseSource::disabled());
        assert_eq!(table.value(2009, Metric::EuropeanOfficials), Some(3.0));

        apply_events(&mut table, PARTY_EVENTS);
        assert_eq!(table.value(2009, Metric::EuropeanOfficials), Some(6.0));
        assert_eq!(table.value(2010, Metric::EuropeanOfficials), Some(3.0));
        assert_eq!(table.value(2019, Metric::EuropeanOfficials), Some(6.0));
    }

    #[test]
    fn key_events_fall_within_baseline_range() {
        let config = PartyConfig::modem();
        for &(year, _) in KEY_EVENTS {
            assert!(year >= config.start_year && year <= config.end_year);
        }
    }
}
