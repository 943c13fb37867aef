//! Aggregate statistics and the console report

use crate::config::PartyConfig;
use crate::metrics::Metric;
use crate::table::SeriesTable;

/// Milestones listed at the end of the report
pub const MILESTONES: &[&str] = &[
    "2007: MoDem founded by François Bayrou",
    "2007: strong presidential election score",
    "2009: good European election result",
    "2012: alliance with the Parti Socialiste",
    "2012-2016: government participation",
    "2017: alliance with La République En Marche",
    "2017-2022: government participation",
    "2019: European elections",
    "2022: MoDem deputies re-elected",
];

pub const RECOMMENDATIONS: &[&str] = &[
    "Hold the pivot position at the centre",
    "Strengthen financial autonomy",
    "Develop fundraising with businesses",
    "Make better use of European funding",
    "Invest in training centrist cadres",
    "Strengthen local and territorial roots",
    "Develop think tanks and prospective work",
    "Prepare future electoral alliances",
];

/// Mean of a series, 0 when empty
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation, 0 when empty
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Percentage change from `first` to `last`
pub fn growth_pct(first: f64, last: f64) -> f64 {
    if first.abs() < 1e-10 {
        return 0.0;
    }
    (last / first - 1.0) * 100.0
}

/// `part / whole` in percent
fn share_pct(part: f64, whole: f64) -> f64 {
    if whole.abs() < 1e-10 {
        return 0.0;
    }
    part / whole * 100.0
}

/// Headline statistics of one generated table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinancialSummary {
    pub first_year: i32,
    pub last_year: i32,

    // General
    pub avg_revenue: f64,
    pub avg_expenses: f64,
    pub avg_adherents: f64,
    pub avg_execution_rate_pct: f64,

    // First year to last year
    pub revenue_growth_pct: f64,
    pub adherents_growth_pct: f64,

    // Revenue structure, share of average revenue
    pub membership_share_pct: f64,
    pub donations_share_pct: f64,
    pub public_funding_share_pct: f64,
    pub european_funding_share_pct: f64,

    // Performance
    pub avg_balance_pct: f64,
    pub final_reserves: f64,
    pub final_public_dependency_pct: f64,
}

impl FinancialSummary {
    /// `None` for an empty table
    pub fn from_table(table: &SeriesTable) -> Option<Self> {
        let first_year = table.first_year()?;
        let last_year = table.last_year()?;

        let avg = |metric| mean(table.series(metric));
        let first = |metric: Metric| table.series(metric)[0];
        let last = |metric: Metric| table.series(metric)[table.len() - 1];

        let avg_revenue = avg(Metric::TotalRevenue);

        Some(FinancialSummary {
            first_year,
            last_year,
            avg_revenue,
            avg_expenses: avg(Metric::TotalExpenses),
            avg_adherents: avg(Metric::Adherents),
            avg_execution_rate_pct: avg(Metric::BudgetExecutionRate) * 100.0,
            revenue_growth_pct: growth_pct(first(Metric::TotalRevenue), last(Metric::TotalRevenue)),
            adherents_growth_pct: growth_pct(first(Metric::Adherents), last(Metric::Adherents)),
            membership_share_pct: share_pct(avg(Metric::MembershipFees), avg_revenue),
            donations_share_pct: share_pct(avg(Metric::PrivateDonations), avg_revenue),
            public_funding_share_pct: share_pct(avg(Metric::PublicFunding), avg_revenue),
            european_funding_share_pct: share_pct(avg(Metric::EuropeanFunding), avg_revenue),
            avg_balance_pct: avg(Metric::FinancialBalance) * 100.0,
            final_reserves: last(Metric::FinancialReserves),
            final_public_dependency_pct: last(Metric::PublicFundingDependency) * 100.0,
        })
    }

    /// Print the full analytical report
    pub fn print_summary(&self, config: &PartyConfig) {
        println!(
            "ANALYTICAL INSIGHTS - {} ({}-{})",
            config.party_name, self.first_year, self.last_year
        );
        println!("Generated: {}", chrono::Local::now().format("%Y-%m-%d %H:%M"));
        println!("{}", "=".repeat(70));

        println!("\n1. GENERAL STATISTICS:");
        println!("  Average annual revenue: {:.2} M€", self.avg_revenue);
        println!("  Average annual expenses: {:.2} M€", self.avg_expenses);
        println!("  Average adherents: {:.0}", self.avg_adherents);
        println!(
            "  Average budget execution rate: {:.1}%",
            self.avg_execution_rate_pct
        );

        println!("\n2. HISTORICAL TREND:");
        println!(
            "  Revenue change ({}-{}): {:.1}%",
            self.first_year, self.last_year, self.revenue_growth_pct
        );
        println!(
            "  Adherents change ({}-{}): {:.1}%",
            self.first_year, self.last_year, self.adherents_growth_pct
        );

        println!("\n3. FINANCIAL STRUCTURE:");
        println!("  Membership fees share: {:.1}%", self.membership_share_pct);
        println!("  Private donations share: {:.1}%", self.donations_share_pct);
        println!("  Public funding share: {:.1}%", self.public_funding_share_pct);
        println!(
            "  European funding share: {:.1}%",
            self.european_funding_share_pct
        );

        println!("\n4. FINANCIAL PERFORMANCE:");
        println!("  Average balance: {:.1}% of budget", self.avg_balance_pct);
        println!("  Final reserves: {:.1} M€", self.final_reserves);
        println!(
            "  Public funding dependency: {:.1}%",
            self.final_public_dependency_pct
        );

        println!("\n5. PARTY PROFILE:");
        println!("  Orientation: {}", config.orientation);
        println!("  Target electorate: {}", config.target_electorate.join(", "));
        println!("  Funding sources: {}", config.funding_sources.join(", "));

        println!("\n6. MILESTONES:");
        for milestone in MILESTONES {
            println!("  • {}", milestone);
        }

        println!("\n7. STRATEGIC RECOMMENDATIONS:");
        for recommendation in RECOMMENDATIONS {
            println!("  • {}", recommendation);
        }
    }
}

/// Print the first `n` rows of the headline columns
pub fn print_preview(table: &SeriesTable, n: usize) {
    let columns = [
        Metric::Adherents,
        Metric::TotalRevenue,
        Metric::TotalExpenses,
        Metric::BudgetExecutionRate,
    ];

    print!("{:>6}", "Annee");
    for metric in columns {
        print!(" {:>22}", metric.column());
    }
    println!();

    for row in table.rows().take(n) {
        print!("{:>6}", row.year);
        for metric in columns {
            print!(" {:>22.4}", row.get(metric));
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate;
    use crate::noise::NoiseSource;
    use approx::assert_relative_eq;

    #[test]
    fn mean_and_std_basic() {
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&values) - 5.0).abs() < 1e-12);
        assert!((std_dev(&values) - 2.0).abs() < 1e-12);
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(std_dev(&[]), 0.0);
    }

    #[test]
    fn growth_pct_basic() {
        assert_relative_eq!(growth_pct(10.0, 15.0), 50.0, epsilon = 1e-12);
        assert_relative_eq!(growth_pct(10.0, 5.0), -50.0, epsilon = 1e-12);
        assert_eq!(growth_pct(0.0, 5.0), 0.0);
    }

    #[test]
    fn empty_table_has_no_summary() {
        let config = PartyConfig {
            start_year: 2010,
            end_year: 2009,
            ..PartyConfig::deterministic()
        };
        let table = SeriesTable::generate(&config, &mut NoiseSource::disabled());
        assert!(FinancialSummary::from_table(&table).is_none());
    }

    #[test]
    fn summary_reads_table_columns() {
        let table = generate(&PartyConfig::deterministic());
        let summary = FinancialSummary::from_table(&table).unwrap();

        assert_eq!(summary.first_year, 2007);
        assert_eq!(summary.last_year, 2025);
        assert_relative_eq!(
            summary.avg_revenue,
            mean(table.series(Metric::TotalRevenue)),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            summary.final_reserves,
            table.series(Metric::FinancialReserves)[18],
            epsilon = 1e-12
        );
        // Dependency in 2025 sits in the 35% regime
        assert_relative_eq!(summary.final_public_dependency_pct, 35.0, epsilon = 1e-9);
        // Execution rate regimes: 4 × 82%, 6 × 85%, 9 × 88%
        let expected = (4.0 * 82.0 + 6.0 * 85.0 + 9.0 * 88.0) / 19.0;
        assert_relative_eq!(summary.avg_execution_rate_pct, expected, epsilon = 1e-9);
    }

    #[test]
    fn revenue_shares_are_partial() {
        let table = generate(&PartyConfig::deterministic());
        let summary = FinancialSummary::from_table(&table).unwrap();

        for share in [
            summary.membership_share_pct,
            summary.donations_share_pct,
            summary.public_funding_share_pct,
            summary.european_funding_share_pct,
        ] {
            assert!(share > 0.0 && share < 100.0, "share {} out of range", share);
        }
    }

    #[test]
    fn single_year_growth_is_zero() {
        let config = PartyConfig {
            start_year: 2007,
            end_year: 2007,
            ..PartyConfig::deterministic()
        };
        let summary = FinancialSummary::from_table(&generate(&config)).unwrap();
        assert_eq!(summary.revenue_growth_pct, 0.0);
        assert_eq!(summary.adherents_growth_pct, 0.0);
    }
}
