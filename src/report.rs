// Report serialization. Every record type that reaches a report declares its
// ordered columns and row cells explicitly, and a shared section writer turns
// any such table into CSV. Multi-table reports stack sections into the same
// `Output` location separated by blank lines.

use crate::core::comparison::{BillComparison, BillComparisonRecord, BillComparisonTotals};
use crate::core::heat_balance::{HeatGainShare, HeatLossShare, HeatTransferBreakdown};
use crate::core::simulation::MonthlyUsageSnapshot;
use crate::input::{
    ClimateRecord, ComponentKind, EnvelopeComponent, ModelDataSet, SolarCoefficientRow,
    SolarGeometryRow, UtilityBill,
};
use crate::output::Output;
use csv::WriterBuilder;
use itertools::Itertools;
use std::io::Write;

/// An ordered attribute-value row shape for one record type.
pub trait Tabular {
    fn columns() -> &'static [&'static str];
    fn row(&self) -> Vec<String>;
}

/// Wording of a two-series bill comparison report: what each series is called
/// and what a percentage difference between them means.
pub struct ComparisonStyle {
    pub first: &'static str,
    pub second: &'static str,
    pub change: &'static str,
}

/// Actual bills against the model's restatement of them.
pub const ACTUAL_VS_MODELLED: ComparisonStyle = ComparisonStyle {
    first: "Actual",
    second: "Modelled",
    change: "Error",
};

/// The as-built model against an improvement scenario.
pub const BASE_VS_IMPROVED: ComparisonStyle = ComparisonStyle {
    first: "Base",
    second: "New",
    change: "Reduction",
};

/// Write a monthly usage series with the usage column named for the service
/// it carries ("Gas Usage (kWh)", "Cooling Electricity Usage (kWh)").
pub fn write_monthly_usage(
    output: &impl Output,
    location_key: &str,
    usage_label: &str,
    rows: &[MonthlyUsageSnapshot],
) -> anyhow::Result<()> {
    let mut raw = output.writer_for_location_key(location_key)?;
    let mut writer = WriterBuilder::new().flexible(true).from_writer(&mut raw);
    writer.write_record(["Month", "Heat Loss (kWh)", "Heat Gain (kWh)", usage_label])?;
    for row in rows {
        writer.write_record(&row.row())?;
    }
    writer.flush()?;
    drop(writer);
    raw.flush()?;
    Ok(())
}

/// Write the loss-month and gain-month share tables into one report.
pub fn write_heat_transfer_breakdown(
    output: &impl Output,
    location_key: &str,
    breakdown: &HeatTransferBreakdown,
) -> anyhow::Result<()> {
    let mut raw = output.writer_for_location_key(location_key)?;
    write_section(&mut raw, &breakdown.loss_months)?;
    raw.write_all(b"\n")?;
    write_section(&mut raw, &breakdown.gain_months)?;
    raw.flush()?;
    Ok(())
}

/// Write a gas section and a cooling electricity section of a bill
/// comparison, each closed by a totals row, with an optional footer line
/// (used for the payback verdict).
pub fn write_bill_comparison_report(
    output: &impl Output,
    location_key: &str,
    gas: &BillComparison,
    cooling: &BillComparison,
    style: &ComparisonStyle,
    footer: Option<&str>,
) -> anyhow::Result<()> {
    let mut raw = output.writer_for_location_key(location_key)?;
    write_comparison_section(&mut raw, gas, "Gas", style)?;
    raw.write_all(b"\n")?;
    write_comparison_section(&mut raw, cooling, "Cooling Electricity", style)?;
    if let Some(footer) = footer {
        raw.write_all(b"\n")?;
        raw.write_all(footer.as_bytes())?;
        raw.write_all(b"\n")?;
    }
    raw.flush()?;
    Ok(())
}

/// Echo every parsed input table into one report, so a reader can see exactly
/// what the audit ran on.
pub fn write_input_echo(
    output: &impl Output,
    location_key: &str,
    data: &ModelDataSet,
) -> anyhow::Result<()> {
    let mut raw = output.writer_for_location_key(location_key)?;
    titled_section(&mut raw, "Monthly Climate", &data.climate)?;
    raw.write_all(b"\n")?;
    titled_section(&mut raw, "Building Components", &data.components)?;
    raw.write_all(b"\n")?;
    titled_section(
        &mut raw,
        "Solar Heat Gain Coefficients",
        &data.solar_coefficients,
    )?;
    raw.write_all(b"\n")?;
    titled_section(&mut raw, "Solar Geometry", &data.solar_geometry)?;
    raw.write_all(b"\n")?;
    titled_section(&mut raw, "Gas Bills", &data.gas_bills)?;
    raw.write_all(b"\n")?;
    titled_section(&mut raw, "Cooling Electricity Bills", &data.cooling_bills)?;
    raw.flush()?;
    Ok(())
}

fn write_section<T: Tabular, W: Write>(raw: &mut W, rows: &[T]) -> anyhow::Result<()> {
    let mut writer = WriterBuilder::new().flexible(true).from_writer(raw);
    writer.write_record(T::columns())?;
    for row in rows {
        writer.write_record(&row.row())?;
    }
    writer.flush()?;
    Ok(())
}

fn titled_section<T: Tabular, W: Write>(
    raw: &mut W,
    title: &str,
    rows: &[T],
) -> anyhow::Result<()> {
    let mut writer = WriterBuilder::new().flexible(true).from_writer(raw);
    writer.write_record([title])?;
    writer.write_record(T::columns())?;
    for row in rows {
        writer.write_record(&row.row())?;
    }
    writer.flush()?;
    Ok(())
}

fn write_comparison_section<W: Write>(
    raw: &mut W,
    comparison: &BillComparison,
    service: &str,
    style: &ComparisonStyle,
) -> anyhow::Result<()> {
    let mut writer = WriterBuilder::new().flexible(true).from_writer(raw);
    writer.write_record(comparison_columns(service, style))?;
    for record in &comparison.records {
        writer.write_record(&record.row())?;
    }
    writer.write_record(&totals_row(&comparison.totals))?;
    writer.flush()?;
    Ok(())
}

fn comparison_columns(service: &str, style: &ComparisonStyle) -> Vec<String> {
    let ComparisonStyle {
        first,
        second,
        change,
    } = style;
    vec![
        "Billing Start Month".into(),
        "Billing End Month".into(),
        format!("{first} {service} Usage (kWh)"),
        format!("{second} {service} Usage (kWh)"),
        format!("{first} {service} Cost ($USD)"),
        format!("{second} {service} Cost ($USD)"),
        format!("Usage {change} (%)"),
        format!("Cost {change} (%)"),
    ]
}

fn totals_row(totals: &BillComparisonTotals) -> Vec<String> {
    vec![
        "Total".into(),
        String::new(),
        totals.first_usage.to_string(),
        totals.second_usage.to_string(),
        totals.first_cost.to_string(),
        totals.second_cost.to_string(),
        opt_cell(totals.usage_change_percent),
        opt_cell(totals.cost_change_percent),
    ]
}

fn opt_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl Tabular for MonthlyUsageSnapshot {
    fn columns() -> &'static [&'static str] {
        &["Month", "Heat Loss (kWh)", "Heat Gain (kWh)", "Usage (kWh)"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.month.to_string(),
            self.heat_loss.to_string(),
            self.heat_gain.to_string(),
            self.usage.to_string(),
        ]
    }
}

impl Tabular for UtilityBill {
    fn columns() -> &'static [&'static str] {
        &[
            "Billing Start Month",
            "Billing End Month",
            "Usage (kWh)",
            "Cost ($USD)",
            "Rate ($USD/kWh)",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.start_month.to_string(),
            self.end_month.to_string(),
            self.usage.to_string(),
            self.cost.to_string(),
            self.rate.to_string(),
        ]
    }
}

impl Tabular for ClimateRecord {
    fn columns() -> &'static [&'static str] {
        &[
            "Month",
            "Days",
            "Average Temperature (C)",
            "Daylight Hours",
            "Beam Flux (W/m2)",
            "Diffuse Flux (W/m2)",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.month.to_string(),
            self.days.to_string(),
            self.air_temp.to_string(),
            self.daylight_hours.to_string(),
            self.beam_flux.to_string(),
            self.diffuse_flux.to_string(),
        ]
    }
}

impl Tabular for EnvelopeComponent {
    fn columns() -> &'static [&'static str] {
        &["Name", "Kind", "Orientation", "Area (m2)", "U-Value (W/m2K)"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            match self.kind {
                ComponentKind::Opaque => "O".into(),
                ComponentKind::Glazing => "G".into(),
            },
            self.orientation
                .map(|orientation| orientation.to_string())
                .unwrap_or_default(),
            self.area.to_string(),
            self.u_value.to_string(),
        ]
    }
}

impl Tabular for SolarCoefficientRow {
    fn columns() -> &'static [&'static str] {
        &["Incidence Angle (deg)", "Coefficient"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.angle.to_string(), self.coefficient.to_string()]
    }
}

impl Tabular for SolarGeometryRow {
    fn columns() -> &'static [&'static str] {
        &[
            "Months",
            "Orientation",
            "Incidence Angle (deg)",
            "Beam Exposure (%)",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.months.iter().join(","),
            self.orientation.to_string(),
            self.incidence_angle.to_string(),
            self.exposure_percent.to_string(),
        ]
    }
}

impl Tabular for HeatLossShare {
    fn columns() -> &'static [&'static str] {
        &[
            "Month",
            "Conduction (%)",
            "Ventilation (%)",
            "Heat Loss (kWh)",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.month.to_string(),
            self.conduction_percent.to_string(),
            self.ventilation_percent.to_string(),
            self.heat_loss.to_string(),
        ]
    }
}

impl Tabular for HeatGainShare {
    fn columns() -> &'static [&'static str] {
        &[
            "Month",
            "Conduction (%)",
            "Ventilation (%)",
            "Solar Heat Gain (%)",
            "Heat Gain (kWh)",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.month.to_string(),
            self.conduction_percent.to_string(),
            self.ventilation_percent.to_string(),
            self.solar_percent.to_string(),
            self.heat_gain.to_string(),
        ]
    }
}

impl Tabular for BillComparisonRecord {
    fn columns() -> &'static [&'static str] {
        &[
            "Billing Start Month",
            "Billing End Month",
            "First Usage (kWh)",
            "Second Usage (kWh)",
            "First Cost ($USD)",
            "Second Cost ($USD)",
            "Usage Change (%)",
            "Cost Change (%)",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.start_month.to_string(),
            self.end_month.to_string(),
            self.first_usage.to_string(),
            self.second_usage.to_string(),
            self.first_cost.to_string(),
            self.second_cost.to_string(),
            opt_cell(self.usage_change_percent),
            opt_cell(self.cost_change_percent),
        ]
    }
}
