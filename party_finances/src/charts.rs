//! Descriptive dashboard rendered with plotters (SVG backend)
//!
//! Eight panels on a 4×2 grid: revenue vs expenses, revenue and expense
//! structure, membership, strategic investments, financial indicators,
//! elected officials and the financial situation.

use std::error::Error;
use std::fs;
use std::ops::Range;
use std::path::Path;

use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::config::PartyConfig;
use crate::events::KEY_EVENTS;
use crate::metrics::Metric;
use crate::table::SeriesTable;

type Panel<'a> = DrawingArea<SVGBackend<'a>, Shift>;
type Chart<'a, 'b> = ChartContext<'a, SVGBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

const PALETTE: [RGBColor; 6] = [
    RGBColor(0xFF, 0x99, 0x00),
    RGBColor(0xFF, 0xCC, 0x00),
    RGBColor(0xFF, 0x66, 0x00),
    RGBColor(0xCC, 0x99, 0x00),
    RGBColor(0xFF, 0x99, 0x33),
    RGBColor(0xCC, 0x66, 0x00),
];
const PRIMARY: RGBColor = PALETTE[0];
const SECONDARY: RGBColor = PALETTE[2];
const SURPLUS: RGBColor = RGBColor(0x00, 0x99, 0x00);

const BAR_HALF_WIDTH: f64 = 0.4;

const REVENUE_PARTS: [(Metric, &str); 6] = [
    (Metric::MembershipFees, "Membership fees"),
    (Metric::PrivateDonations, "Private donations"),
    (Metric::PublicFunding, "Public funding"),
    (Metric::EventRevenue, "Events"),
    (Metric::TrainingRevenue, "Training"),
    (Metric::EuropeanFunding, "European funding"),
];

const EXPENSE_PARTS: [(Metric, &str); 6] = [
    (Metric::StaffExpenses, "Staff"),
    (Metric::CampaignExpenses, "Campaigns"),
    (Metric::CommunicationExpenses, "Communication"),
    (Metric::OperatingExpenses, "Operations"),
    (Metric::TrainingExpenses, "Training"),
    (Metric::EuropeanExpenses, "European"),
];

const INVESTMENTS: [(Metric, &str); 4] = [
    (Metric::CommunicationInvestment, "Communication"),
    (Metric::DigitalInvestment, "Digital"),
    (Metric::TrainingInvestment, "Training"),
    (Metric::EuropeanInvestment, "Europe"),
];

/// How a series is drawn on a dual-axis panel
#[derive(Debug, Clone, Copy)]
enum Mark {
    /// Coloured by sign for metrics that may go negative
    Bars,
    Line,
}

#[derive(Debug, Clone, Copy)]
struct Trace {
    metric: Metric,
    label: &'static str,
    scale: f64,
    mark: Mark,
}

impl Trace {
    const fn new(metric: Metric, label: &'static str, scale: f64, mark: Mark) -> Self {
        Trace {
            metric,
            label,
            scale,
            mark,
        }
    }

    fn values(&self, table: &SeriesTable) -> Vec<f64> {
        table
            .series(self.metric)
            .iter()
            .map(|v| v * self.scale)
            .collect()
    }
}

/// Render the eight-panel dashboard to `path`
///
/// Nothing is written for an empty table.
pub fn render_dashboard<P: AsRef<Path>>(
    table: &SeriesTable,
    config: &PartyConfig,
    path: P,
) -> Result<(), Box<dyn Error>> {
    if table.is_empty() {
        return Ok(());
    }

    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let root = SVGBackend::new(path, (1600, 2000)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(
        &format!(
            "Finances of the {} ({}-{})",
            config.party_name, config.start_year, config.end_year
        ),
        ("sans-serif", 28),
    )?;

    let panels = root.split_evenly((4, 2));

    draw_revenue_expenses(&panels[0], table)?;
    draw_stacked(&panels[1], table, "Revenue structure (M€)", &REVENUE_PARTS)?;
    draw_stacked(&panels[2], table, "Expense structure (M€)", &EXPENSE_PARTS)?;
    draw_dual(
        &panels[3],
        table,
        "Adherents and local structure",
        Trace::new(Metric::Adherents, "Adherents (thousands)", 1e-3, Mark::Bars),
        Trace::new(Metric::LocalCommittees, "Local committees", 1.0, Mark::Line),
    )?;
    draw_lines(&panels[4], table, "Strategic investments (M€)", &INVESTMENTS)?;
    draw_dual(
        &panels[5],
        table,
        "Financial indicators",
        Trace::new(
            Metric::BudgetExecutionRate,
            "Execution rate (%)",
            100.0,
            Mark::Bars,
        ),
        Trace::new(
            Metric::PublicFundingDependency,
            "Public funding dependency (%)",
            100.0,
            Mark::Line,
        ),
    )?;
    draw_dual(
        &panels[6],
        table,
        "Elected officials",
        Trace::new(Metric::LocalOfficials, "Local officials", 1.0, Mark::Line),
        Trace::new(Metric::NationalOfficials, "National officials", 1.0, Mark::Line),
    )?;
    draw_dual(
        &panels[7],
        table,
        "Financial situation",
        Trace::new(
            Metric::FinancialBalance,
            "Balance (% of budget)",
            100.0,
            Mark::Bars,
        ),
        Trace::new(
            Metric::FinancialReserves,
            "Reserves (M€)",
            1.0,
            Mark::Line,
        ),
    )?;

    root.present()?;
    Ok(())
}

fn year_range(table: &SeriesTable) -> Range<f64> {
    let first = table.first_year().unwrap_or(0) as f64;
    let last = table.last_year().unwrap_or(0) as f64;
    (first - 0.5)..(last + 0.5)
}

/// Padded value range covering every series, always including zero
fn value_range<'s>(series: impl IntoIterator<Item = &'s [f64]>) -> Range<f64> {
    let mut lo = 0.0f64;
    let mut hi = 0.0f64;
    for values in series {
        for &v in values {
            if v.is_finite() {
                lo = lo.min(v);
                hi = hi.max(v);
            }
        }
    }
    if (hi - lo).abs() < 1e-9 {
        hi = lo + 1.0;
    }
    let pad = 0.08 * (hi - lo);
    let lo = if lo < 0.0 { lo - pad } else { lo };
    lo..(hi + pad)
}

fn year_label(x: &f64) -> String {
    format!("{:.0}", x)
}

fn points(years: &[i32], values: &[f64]) -> Vec<(f64, f64)> {
    years
        .iter()
        .zip(values)
        .map(|(&year, &v)| (year as f64, v))
        .collect()
}

fn bar(year: i32, bottom: f64, top: f64, color: RGBAColor) -> Rectangle<(f64, f64)> {
    let x = year as f64;
    Rectangle::new(
        [(x - BAR_HALF_WIDTH, bottom), (x + BAR_HALF_WIDTH, top)],
        color.filled(),
    )
}

/// Fill of one bar: green surplus or orange deficit for signed metrics
fn bar_color(metric: Metric, value: f64, base: RGBColor) -> RGBAColor {
    let color = match (metric.may_be_negative(), value > 0.0) {
        (true, true) => SURPLUS,
        (true, false) => SECONDARY,
        (false, _) => base,
    };
    color.mix(0.7)
}

fn bars(
    years: &[i32],
    values: &[f64],
    metric: Metric,
    base: RGBColor,
) -> Vec<Rectangle<(f64, f64)>> {
    years
        .iter()
        .zip(values)
        .map(|(&year, &v)| bar(year, 0.0, v, bar_color(metric, v, base)))
        .collect()
}

fn legend_color(metric: Metric, base: RGBColor) -> RGBColor {
    if metric.may_be_negative() {
        SURPLUS
    } else {
        base
    }
}

/// The chart context shares the backend's lifetime so legends can be drawn on it
fn build_chart<'b>(
    area: &Panel<'b>,
    title: &str,
    table: &SeriesTable,
    y: Range<f64>,
) -> Result<Chart<'b, 'b>, Box<dyn Error>> {
    let chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(year_range(table), y)?;
    Ok(chart)
}

fn draw_legend<'b>(chart: &mut Chart<'b, 'b>) -> Result<(), Box<dyn Error>> {
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;
    Ok(())
}

fn draw_revenue_expenses(area: &Panel<'_>, table: &SeriesTable) -> Result<(), Box<dyn Error>> {
    let years = table.years();
    let revenue = table.series(Metric::TotalRevenue);
    let expenses = table.series(Metric::TotalExpenses);

    let mut chart = build_chart(
        area,
        "Revenue and expenses (M€)",
        table,
        value_range([revenue, expenses]),
    )?;
    chart
        .configure_mesh()
        .x_label_formatter(&year_label)
        .y_desc("M€")
        .draw()?;

    for (values, label, color) in [
        (revenue, "Total revenue", PRIMARY),
        (expenses, "Total expenses", SECONDARY),
    ] {
        chart
            .draw_series(LineSeries::new(points(years, values), color.stroke_width(2)))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    for &(year, label) in KEY_EVENTS {
        if let Some(v) = table.value(year, Metric::TotalRevenue) {
            let at = (year as f64, v);
            chart.draw_series(std::iter::once(Circle::new(at, 3, BLACK.filled())))?;
            chart.draw_series(std::iter::once(Text::new(
                label.to_string(),
                at,
                ("sans-serif", 12).into_font(),
            )))?;
        }
    }

    draw_legend(&mut chart)
}

fn draw_stacked(
    area: &Panel<'_>,
    table: &SeriesTable,
    title: &str,
    parts: &[(Metric, &'static str)],
) -> Result<(), Box<dyn Error>> {
    let years = table.years();

    let mut totals = vec![0.0; table.len()];
    for &(metric, _) in parts {
        for (total, v) in totals.iter_mut().zip(table.series(metric)) {
            *total += v;
        }
    }

    let mut chart = build_chart(area, title, table, value_range([totals.as_slice()]))?;
    chart
        .configure_mesh()
        .x_label_formatter(&year_label)
        .y_desc("M€")
        .draw()?;

    let mut bottom = vec![0.0; table.len()];
    for (i, &(metric, label)) in parts.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        let values = table.series(metric);
        let segments: Vec<_> = years
            .iter()
            .zip(values)
            .zip(bottom.iter())
            .map(|((&year, &v), &b)| bar(year, b, b + v, color.to_rgba()))
            .collect();

        chart
            .draw_series(segments)?
            .label(label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));

        for (b, v) in bottom.iter_mut().zip(values) {
            *b += v;
        }
    }

    draw_legend(&mut chart)
}

fn draw_lines(
    area: &Panel<'_>,
    table: &SeriesTable,
    title: &str,
    series: &[(Metric, &'static str)],
) -> Result<(), Box<dyn Error>> {
    let years = table.years();

    let range = value_range(series.iter().map(|&(metric, _)| table.series(metric)));
    let mut chart = build_chart(area, title, table, range)?;
    chart
        .configure_mesh()
        .x_label_formatter(&year_label)
        .y_desc("M€")
        .draw()?;

    for (i, &(metric, label)) in series.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        chart
            .draw_series(LineSeries::new(
                points(years, table.series(metric)),
                color.stroke_width(2),
            ))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    draw_legend(&mut chart)
}

/// Left axis for `left`, right axis for `right`
fn draw_dual(
    area: &Panel<'_>,
    table: &SeriesTable,
    title: &str,
    left: Trace,
    right: Trace,
) -> Result<(), Box<dyn Error>> {
    let years = table.years();
    let left_values = left.values(table);
    let right_values = right.values(table);

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .right_y_label_area_size(60)
        .build_cartesian_2d(year_range(table), value_range([left_values.as_slice()]))?
        .set_secondary_coord(year_range(table), value_range([right_values.as_slice()]));

    chart
        .configure_mesh()
        .x_label_formatter(&year_label)
        .y_desc(left.label)
        .axis_desc_style(("sans-serif", 14).into_font().color(&PRIMARY))
        .draw()?;
    chart
        .configure_secondary_axes()
        .y_desc(right.label)
        .axis_desc_style(("sans-serif", 14).into_font().color(&SECONDARY))
        .draw()?;

    match left.mark {
        Mark::Bars => {
            let color = legend_color(left.metric, PRIMARY);
            chart
                .draw_series(bars(years, &left_values, left.metric, PRIMARY))?
                .label(left.label)
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
        }
        Mark::Line => {
            chart
                .draw_series(LineSeries::new(
                    points(years, &left_values),
                    PRIMARY.stroke_width(2),
                ))?
                .label(left.label)
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], PRIMARY));
        }
    }

    match right.mark {
        Mark::Bars => {
            let color = legend_color(right.metric, SECONDARY);
            chart
                .draw_secondary_series(bars(years, &right_values, right.metric, SECONDARY))?
                .label(right.label)
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
        }
        Mark::Line => {
            chart
                .draw_secondary_series(LineSeries::new(
                    points(years, &right_values),
                    SECONDARY.stroke_width(3),
                ))?
                .label(right.label)
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], SECONDARY));
        }
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    Ok(())
}
