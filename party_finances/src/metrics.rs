//! Metric catalogue and the shared generation routine
//!
//! Each metric is described by a static [`Recipe`]:
//!
//! ```text
//! value(year) = base × growth × multiplier₁ × … × multiplierₙ × noise
//! ```
//!
//! - base: a fraction of the master budget, of the base membership, a fixed
//!   count, or a year-keyed level (ratios and balances)
//! - growth: `1 + rate(year) × index / damping` where `index` is the year's
//!   zero-based position, or a ramp anchored on a calendar year, or a running
//!   product for stocks (reserves)
//! - multipliers: categorical factors keyed on election and alliance years
//! - noise: normal factor centred on 1.0 with a metric-specific σ
//!
//! The constants are hand-tuned per metric: damping is 2, 3 or 4 and σ ranges
//! over 0.04-0.18.

use crate::config::{EuropeanElection, PartyConfig};
use crate::noise::NoiseSource;

/// Section of the table a metric belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricGroup {
    Organization,
    Revenue,
    Expenses,
    Indicators,
    Investments,
}

/// Every generated column, in generation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    // Organization
    Adherents,
    LocalCommittees,
    LocalOfficials,
    NationalOfficials,
    EuropeanOfficials,
    // Revenue
    TotalRevenue,
    MembershipFees,
    PrivateDonations,
    PublicFunding,
    EventRevenue,
    TrainingRevenue,
    EuropeanFunding,
    // Expenses
    TotalExpenses,
    StaffExpenses,
    CampaignExpenses,
    CommunicationExpenses,
    OperatingExpenses,
    TrainingExpenses,
    EuropeanExpenses,
    // Indicators
    BudgetExecutionRate,
    MembershipRatio,
    PublicFundingDependency,
    FinancialBalance,
    FinancialReserves,
    // Investments
    CommunicationInvestment,
    DigitalInvestment,
    TrainingInvestment,
    EuropeanInvestment,
    ProspectiveInvestment,
}

impl Metric {
    pub const COUNT: usize = 29;

    pub const ALL: [Metric; Metric::COUNT] = [
        Metric::Adherents,
        Metric::LocalCommittees,
        Metric::LocalOfficials,
        Metric::NationalOfficials,
        Metric::EuropeanOfficials,
        Metric::TotalRevenue,
        Metric::MembershipFees,
        Metric::PrivateDonations,
        Metric::PublicFunding,
        Metric::EventRevenue,
        Metric::TrainingRevenue,
        Metric::EuropeanFunding,
        Metric::TotalExpenses,
        Metric::StaffExpenses,
        Metric::CampaignExpenses,
        Metric::CommunicationExpenses,
        Metric::OperatingExpenses,
        Metric::TrainingExpenses,
        Metric::EuropeanExpenses,
        Metric::BudgetExecutionRate,
        Metric::MembershipRatio,
        Metric::PublicFundingDependency,
        Metric::FinancialBalance,
        Metric::FinancialReserves,
        Metric::CommunicationInvestment,
        Metric::DigitalInvestment,
        Metric::TrainingInvestment,
        Metric::EuropeanInvestment,
        Metric::ProspectiveInvestment,
    ];

    /// Position of the column in the table
    pub fn index(self) -> usize {
        self as usize
    }

    /// Exact header used in the CSV export
    pub fn column(self) -> &'static str {
        match self {
            Metric::Adherents => "Adherents",
            Metric::LocalCommittees => "Comites_Locaux",
            Metric::LocalOfficials => "Elus_Locaux",
            Metric::NationalOfficials => "Elus_Nationaux",
            Metric::EuropeanOfficials => "Elus_Europeens",
            Metric::TotalRevenue => "Revenus_Total",
            Metric::MembershipFees => "Cotisations_Adherents",
            Metric::PrivateDonations => "Dons_Prives",
            Metric::PublicFunding => "Financement_Public",
            Metric::EventRevenue => "Revenus_Evenements",
            Metric::TrainingRevenue => "Revenus_Formations",
            Metric::EuropeanFunding => "Financement_Europeen",
            Metric::TotalExpenses => "Depenses_Total",
            Metric::StaffExpenses => "Depenses_Personnel",
            Metric::CampaignExpenses => "Depenses_Campagnes",
            Metric::CommunicationExpenses => "Depenses_Communication",
            Metric::OperatingExpenses => "Depenses_Fonctionnement",
            Metric::TrainingExpenses => "Depenses_Formation",
            Metric::EuropeanExpenses => "Depenses_Europeennes",
            Metric::BudgetExecutionRate => "Taux_Execution_Budget",
            Metric::MembershipRatio => "Ratio_Cotisations_Revenus",
            Metric::PublicFundingDependency => "Dependance_Financement_Public",
            Metric::FinancialBalance => "Solde_Financier",
            Metric::FinancialReserves => "Reserves_Financieres",
            Metric::CommunicationInvestment => "Investissement_Communication",
            Metric::DigitalInvestment => "Investissement_Numérique",
            Metric::TrainingInvestment => "Investissement_Formation",
            Metric::EuropeanInvestment => "Investissement_Europe",
            Metric::ProspectiveInvestment => "Investissement_Prospective",
        }
    }

    pub fn from_column(column: &str) -> Option<Metric> {
        Metric::ALL.iter().copied().find(|m| m.column() == column)
    }

    pub fn group(self) -> MetricGroup {
        match self.index() {
            0..=4 => MetricGroup::Organization,
            5..=11 => MetricGroup::Revenue,
            12..=18 => MetricGroup::Expenses,
            19..=23 => MetricGroup::Indicators,
            _ => MetricGroup::Investments,
        }
    }

    /// Only the balance may legitimately go negative
    pub fn may_be_negative(self) -> bool {
        self == Metric::FinancialBalance
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column())
    }
}

/// Inclusive band of years mapped to a value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub first: i32,
    pub last: i32,
    pub value: f64,
}

impl Band {
    pub const fn span(first: i32, last: i32, value: f64) -> Self {
        Band { first, last, value }
    }

    /// Every year up to and including `last`
    pub const fn until(last: i32, value: f64) -> Self {
        Band::span(i32::MIN, last, value)
    }

    /// Every year from `first` on
    pub const fn onward(first: i32, value: f64) -> Self {
        Band::span(first, i32::MAX, value)
    }

    pub fn contains(&self, year: i32) -> bool {
        self.first <= year && year <= self.last
    }
}

/// Year-keyed value used for rates, levels and multipliers
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Schedule {
    Constant(f64),
    /// First band containing the year wins
    Bands {
        bands: &'static [Band],
        otherwise: f64,
    },
    /// First case listing the year wins
    Years {
        cases: &'static [(&'static [i32], f64)],
        otherwise: f64,
    },
}

impl Schedule {
    pub fn at(&self, year: i32) -> f64 {
        match *self {
            Schedule::Constant(value) => value,
            Schedule::Bands { bands, otherwise } => bands
                .iter()
                .find(|band| band.contains(year))
                .map_or(otherwise, |band| band.value),
            Schedule::Years { cases, otherwise } => cases
                .iter()
                .find(|(years, _)| years.contains(&year))
                .map_or(otherwise, |&(_, value)| value),
        }
    }
}

/// Starting magnitude of a metric
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Base {
    /// Fraction of `base_budget`
    Budget(f64),
    /// Fraction of `base_adherents`
    Adherents(f64),
    Fixed(f64),
    /// Year-dependent level (ratios, balances)
    Level(Schedule),
}

impl Base {
    pub fn at(&self, year: i32, config: &PartyConfig) -> f64 {
        match self {
            Base::Budget(fraction) => config.base_budget * fraction,
            Base::Adherents(fraction) => config.base_adherents * fraction,
            Base::Fixed(value) => *value,
            Base::Level(schedule) => schedule.at(year),
        }
    }
}

/// Growth factor applied on top of the base
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Growth {
    /// `1 + rate(year) × (index / damping)`: linear in elapsed positions
    Linear { rate: Schedule, damping: f64 },
    /// `1 + rate × max(0, (year - since) / 10)` from `since` on, 1 before
    Since { year: i32, rate: f64 },
    /// Stock updated as `stock × (1 + rate(year))` every year, starting from the base
    Compound { rate: Schedule },
    Flat,
}

/// Parameterised formula for one metric
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Formula {
    pub base: Base,
    pub growth: Growth,
    /// Applied in order after growth
    pub multipliers: &'static [Schedule],
    /// σ of the noise factor; 0 means no draw
    pub noise: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Recipe {
    Formula(Formula),
    /// Seats of the latest European election, carried forward; 0 before the first
    EuropeanSeats,
}

// Calendar shared by several recipes
const PRESIDENTIAL_YEARS: &[i32] = &[2007, 2012, 2017, 2022];
const PRE_ELECTION_YEARS: &[i32] = &[2006, 2011, 2016, 2021];
const RECOVERY_YEARS: &[i32] = &[2008, 2013, 2018, 2023];

const fn recipe_of(
    base: Base,
    growth: Growth,
    multipliers: &'static [Schedule],
    noise: f64,
) -> Recipe {
    Recipe::Formula(Formula {
        base,
        growth,
        multipliers,
        noise,
    })
}

const fn linear(rate: f64, damping: f64) -> Growth {
    Growth::Linear {
        rate: Schedule::Constant(rate),
        damping,
    }
}

const fn since(year: i32, rate: f64) -> Growth {
    Growth::Since { year, rate }
}

// Organization

const ADHERENTS: Recipe = recipe_of(
    Base::Adherents(1.0),
    Growth::Linear {
        rate: Schedule::Bands {
            bands: &[
                Band::span(2007, 2008, 0.35),  // launch and elections
                Band::span(2009, 2011, -0.08), // difficult consolidation
                Band::span(2012, 2016, 0.05),  // PS alliance
                Band::span(2017, 2022, 0.15),  // LREM alliance
            ],
            otherwise: 0.03,
        },
        damping: 3.0,
    },
    &[],
    0.09,
);

const LOCAL_COMMITTEES: Recipe = recipe_of(
    Base::Fixed(200.0),
    Growth::Linear {
        rate: Schedule::Bands {
            bands: &[
                Band::until(2009, 0.20),
                Band::until(2014, 0.05),
                Band::until(2020, 0.10),
            ],
            otherwise: 0.03,
        },
        damping: 4.0,
    },
    &[],
    0.0,
);

const LOCAL_OFFICIALS: Recipe = recipe_of(
    Base::Fixed(2000.0),
    Growth::Linear {
        rate: Schedule::Bands {
            bands: &[Band::until(2012, 0.08), Band::until(2017, 0.12)],
            otherwise: 0.06,
        },
        damping: 3.0,
    },
    // Municipal elections
    &[Schedule::Years {
        cases: &[(&[2008], 1.8), (&[2014], 1.4), (&[2020], 1.6)],
        otherwise: 1.0,
    }],
    0.07,
);

const NATIONAL_OFFICIALS: Recipe = recipe_of(
    Base::Fixed(10.0),
    linear(0.08, 2.0),
    // Legislative elections
    &[Schedule::Years {
        cases: &[(&[2007], 3.0), (&[2012], 1.5), (&[2017], 4.5), (&[2022], 3.8)],
        otherwise: 1.0,
    }],
    0.12,
);

// Revenue

const TOTAL_REVENUE: Recipe = recipe_of(
    Base::Budget(1.0),
    Growth::Linear {
        rate: Schedule::Bands {
            bands: &[
                Band::span(2007, 2008, 0.25),
                Band::span(2009, 2011, -0.10),
                Band::span(2012, 2016, 0.08),
                Band::span(2017, 2022, 0.20),
            ],
            otherwise: 0.05,
        },
        damping: 3.0,
    },
    &[],
    0.10,
);

const MEMBERSHIP_FEES: Recipe = recipe_of(
    Base::Budget(0.25),
    Growth::Linear {
        rate: Schedule::Bands {
            bands: &[
                Band::until(2009, 0.15),
                Band::until(2014, 0.02),
                Band::until(2020, 0.10),
            ],
            otherwise: 0.04,
        },
        damping: 3.0,
    },
    &[],
    0.08,
);

const PRIVATE_DONATIONS: Recipe = recipe_of(
    Base::Budget(0.30),
    linear(0.04, 3.0),
    &[
        // Alliance period
        Schedule::Bands {
            bands: &[
                Band::until(2009, 1.1),
                Band::until(2016, 0.9),
                Band::until(2022, 1.3),
            ],
            otherwise: 1.1,
        },
        Schedule::Years {
            cases: &[(PRESIDENTIAL_YEARS, 1.7)],
            otherwise: 1.0,
        },
    ],
    0.14,
);

const PUBLIC_FUNDING: Recipe = recipe_of(
    Base::Budget(0.25),
    linear(0.06, 3.0),
    // Follows electoral results
    &[Schedule::Bands {
        bands: &[
            Band::until(2008, 0.6),
            Band::until(2013, 0.8),
            Band::until(2016, 1.2),
        ],
        otherwise: 1.6,
    }],
    0.09,
);

const EVENT_REVENUE: Recipe = recipe_of(
    Base::Budget(0.08),
    linear(0.05, 3.0),
    &[Schedule::Years {
        cases: &[(PRESIDENTIAL_YEARS, 1.8)],
        otherwise: 1.0,
    }],
    0.12,
);

const TRAINING_REVENUE: Recipe = recipe_of(Base::Budget(0.05), since(2010, 0.07), &[], 0.10);

const EUROPEAN_FUNDING: Recipe = recipe_of(
    Base::Budget(0.07),
    since(2007, 0.04),
    &[Schedule::Bands {
        bands: &[Band::onward(2009, 1.5)],
        otherwise: 0.5,
    }],
    0.15,
);

// Expenses

const TOTAL_EXPENSES: Recipe = recipe_of(
    Base::Budget(0.92),
    linear(0.05, 3.0),
    &[Schedule::Years {
        cases: &[(PRESIDENTIAL_YEARS, 1.5)],
        otherwise: 1.0,
    }],
    0.08,
);

const STAFF_EXPENSES: Recipe = recipe_of(
    Base::Budget(0.30),
    Growth::Linear {
        rate: Schedule::Bands {
            bands: &[Band::until(2012, 0.10), Band::until(2017, 0.05)],
            otherwise: 0.08,
        },
        damping: 4.0,
    },
    &[],
    0.06,
);

const CAMPAIGN_EXPENSES: Recipe = recipe_of(
    Base::Budget(0.25),
    linear(0.04, 3.0),
    &[Schedule::Years {
        cases: &[(PRESIDENTIAL_YEARS, 2.2), (PRE_ELECTION_YEARS, 1.4)],
        otherwise: 0.6,
    }],
    0.18,
);

const COMMUNICATION_EXPENSES: Recipe =
    recipe_of(Base::Budget(0.15), since(2008, 0.08), &[], 0.11);

const OPERATING_EXPENSES: Recipe = recipe_of(Base::Budget(0.12), linear(0.03, 4.0), &[], 0.05);

const TRAINING_EXPENSES: Recipe = recipe_of(Base::Budget(0.06), since(2009, 0.06), &[], 0.09);

const EUROPEAN_EXPENSES: Recipe = recipe_of(Base::Budget(0.04), since(2009, 0.05), &[], 0.13);

// Indicators

const BUDGET_EXECUTION_RATE: Recipe = recipe_of(
    Base::Level(Schedule::Bands {
        bands: &[Band::until(2010, 0.82), Band::until(2016, 0.85)],
        otherwise: 0.88,
    }),
    Growth::Flat,
    &[],
    0.04,
);

const MEMBERSHIP_RATIO: Recipe = recipe_of(
    Base::Level(Schedule::Bands {
        bands: &[Band::until(2010, 0.28), Band::until(2017, 0.25)],
        otherwise: 0.22,
    }),
    Growth::Flat,
    &[],
    0.05,
);

const PUBLIC_FUNDING_DEPENDENCY: Recipe = recipe_of(
    Base::Level(Schedule::Bands {
        bands: &[Band::until(2010, 0.20), Band::until(2017, 0.28)],
        otherwise: 0.35,
    }),
    Growth::Flat,
    &[],
    0.06,
);

const FINANCIAL_BALANCE: Recipe = recipe_of(
    Base::Level(Schedule::Years {
        cases: &[(PRESIDENTIAL_YEARS, -0.08), (RECOVERY_YEARS, 0.04)],
        otherwise: 0.02,
    }),
    Growth::Flat,
    &[],
    0.09,
);

const FINANCIAL_RESERVES: Recipe = recipe_of(
    Base::Budget(0.4),
    Growth::Compound {
        rate: Schedule::Years {
            cases: &[(PRESIDENTIAL_YEARS, -0.15), (RECOVERY_YEARS, 0.10)],
            otherwise: 0.03,
        },
    },
    &[],
    0.08,
);

// Investments

const COMMUNICATION_INVESTMENT: Recipe =
    recipe_of(Base::Budget(0.09), since(2008, 0.10), &[], 0.14);

const DIGITAL_INVESTMENT: Recipe = recipe_of(Base::Budget(0.07), since(2012, 0.15), &[], 0.17);

const TRAINING_INVESTMENT: Recipe = recipe_of(Base::Budget(0.05), since(2009, 0.08), &[], 0.12);

const EUROPEAN_INVESTMENT: Recipe = recipe_of(Base::Budget(0.04), since(2009, 0.06), &[], 0.16);

const PROSPECTIVE_INVESTMENT: Recipe =
    recipe_of(Base::Budget(0.03), since(2010, 0.05), &[], 0.18);

/// Recipe table lookup
pub fn recipe(metric: Metric) -> Recipe {
    match metric {
        Metric::Adherents => ADHERENTS,
        Metric::LocalCommittees => LOCAL_COMMITTEES,
        Metric::LocalOfficials => LOCAL_OFFICIALS,
        Metric::NationalOfficials => NATIONAL_OFFICIALS,
        Metric::EuropeanOfficials => Recipe::EuropeanSeats,
        Metric::TotalRevenue => TOTAL_REVENUE,
        Metric::MembershipFees => MEMBERSHIP_FEES,
        Metric::PrivateDonations => PRIVATE_DONATIONS,
        Metric::PublicFunding => PUBLIC_FUNDING,
        Metric::EventRevenue => EVENT_REVENUE,
        Metric::TrainingRevenue => TRAINING_REVENUE,
        Metric::EuropeanFunding => EUROPEAN_FUNDING,
        Metric::TotalExpenses => TOTAL_EXPENSES,
        Metric::StaffExpenses => STAFF_EXPENSES,
        Metric::CampaignExpenses => CAMPAIGN_EXPENSES,
        Metric::CommunicationExpenses => COMMUNICATION_EXPENSES,
        Metric::OperatingExpenses => OPERATING_EXPENSES,
        Metric::TrainingExpenses => TRAINING_EXPENSES,
        Metric::EuropeanExpenses => EUROPEAN_EXPENSES,
        Metric::BudgetExecutionRate => BUDGET_EXECUTION_RATE,
        Metric::MembershipRatio => MEMBERSHIP_RATIO,
        Metric::PublicFundingDependency => PUBLIC_FUNDING_DEPENDENCY,
        Metric::FinancialBalance => FINANCIAL_BALANCE,
        Metric::FinancialReserves => FINANCIAL_RESERVES,
        Metric::CommunicationInvestment => COMMUNICATION_INVESTMENT,
        Metric::DigitalInvestment => DIGITAL_INVESTMENT,
        Metric::TrainingInvestment => TRAINING_INVESTMENT,
        Metric::EuropeanInvestment => EUROPEAN_INVESTMENT,
        Metric::ProspectiveInvestment => PROSPECTIVE_INVESTMENT,
    }
}

impl Formula {
    /// One value per year, drawing one noise factor per year (none when σ = 0)
    pub fn evaluate(
        &self,
        years: &[i32],
        config: &PartyConfig,
        noise: &mut NoiseSource,
    ) -> Vec<f64> {
        let mut values = Vec::with_capacity(years.len());
        let mut stock: Option<f64> = None;

        for (index, &year) in years.iter().enumerate() {
            let base = self.base.at(year, config);

            let grown = match self.growth {
                Growth::Linear { rate, damping } => {
                    base * (1.0 + rate.at(year) * (index as f64 / damping))
                }
                Growth::Since { year: anchor, rate } => base * since_growth(year, anchor, rate),
                Growth::Compound { rate } => {
                    let current = stock.get_or_insert(base);
                    *current *= 1.0 + rate.at(year);
                    *current
                }
                Growth::Flat => base,
            };

            let value = self
                .multipliers
                .iter()
                .fold(grown, |acc, multiplier| acc * multiplier.at(year));

            values.push(value * noise.factor(self.noise));
        }

        values
    }
}

/// Ramp anchored on `anchor`: flat before it, +`rate` per decade after
pub fn since_growth(year: i32, anchor: i32, rate: f64) -> f64 {
    if year >= anchor {
        1.0 + rate * ((year - anchor) as f64 / 10.0).max(0.0)
    } else {
        1.0
    }
}

/// Seats held in `year`: the result of the latest election on or before it
pub fn european_seats(year: i32, elections: &[EuropeanElection]) -> f64 {
    elections
        .iter()
        .filter(|election| election.year <= year)
        .max_by_key(|election| election.year)
        .map_or(0.0, |election| election.seats)
}

/// Generate one metric's full series
pub fn generate_series(
    metric: Metric,
    years: &[i32],
    config: &PartyConfig,
    noise: &mut NoiseSource,
) -> Vec<f64> {
    match recipe(metric) {
        Recipe::Formula(formula) => formula.evaluate(years, config, noise),
        Recipe::EuropeanSeats => years
            .iter()
            .map(|&year| european_seats(year, &config.european_elections))
            .collect(),
    }
}
