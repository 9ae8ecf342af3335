//! Output formatting and persistence for KPI results.
//!
//! Supports pretty-printing, JSON logging, a fixed-width comparison table and
//! the summary CSV.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::kpi::KpiRecord;
use crate::normalize::CombinedTable;
use crate::records::{City, NormalizedRecord};
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Lets spreadsheet tools detect the encoding of the Japanese city names.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// One output row: normalized inputs and derived KPIs for a (city, year).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub city: City,
    pub city_name: &'static str,
    pub year: i32,
    pub population: Option<u64>,
    pub waste_tons: Option<f64>,
    pub processing_cost_yen: Option<f64>,
    pub waste_per_capita_g_per_day: Option<f64>,
    pub cost_per_capita_yen_per_year: Option<f64>,
    pub cost_per_ton_yen: Option<f64>,
}

impl SummaryRow {
    pub fn new(record: &NormalizedRecord, kpi: &KpiRecord) -> Self {
        SummaryRow {
            city: record.city,
            city_name: record.city.name_ja(),
            year: record.year,
            population: record.population,
            waste_tons: record.waste_tons,
            processing_cost_yen: record.processing_cost_yen,
            waste_per_capita_g_per_day: kpi.waste_per_capita_g_per_day,
            cost_per_capita_yen_per_year: kpi.cost_per_capita_yen_per_year,
            cost_per_ton_yen: kpi.cost_per_ton_yen,
        }
    }
}

/// Pairs each record of the table with its KPIs, in table order.
///
/// `kpis` is the output of [`crate::kpi::compute`] for the same table.
pub fn summary_rows(table: &CombinedTable, kpis: &[KpiRecord]) -> Vec<SummaryRow> {
    table
        .iter()
        .zip(kpis)
        .map(|(record, kpi)| SummaryRow::new(record, kpi))
        .collect()
}

/// Rows for one source's records, keeping their order.
pub fn record_rows(records: &[NormalizedRecord]) -> Vec<SummaryRow> {
    records
        .iter()
        .map(|record| SummaryRow::new(record, &KpiRecord::from_record(record)))
        .collect()
}

/// Logs rows using Rust's debug pretty-print format.
pub fn print_pretty(rows: &[SummaryRow]) {
    debug!("{:#?}", rows);
}

/// Logs rows as pretty-printed JSON.
pub fn print_json(rows: &[SummaryRow]) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(rows)?);
    Ok(())
}

fn cell(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.decimals$}"))
}

/// Renders a fixed-width table comparing the three KPIs across cities and
/// years. Missing values are shown as `-`.
pub fn render_table(rows: &[SummaryRow]) -> String {
    let mut out = format!(
        "{:<10} {:>6} {:>16} {:>18} {:>14}\n",
        "city", "year", "waste g/cap/day", "cost yen/cap/year", "cost yen/t"
    );
    out.push_str(&"-".repeat(68));
    out.push('\n');

    for row in rows {
        out.push_str(&format!(
            "{:<10} {:>6} {:>16} {:>18} {:>14}\n",
            row.city.as_str(),
            row.year,
            cell(row.waste_per_capita_g_per_day, 1),
            cell(row.cost_per_capita_yen_per_year, 0),
            cell(row.cost_per_ton_yen, 0),
        ));
    }

    out
}

/// Writes the summary CSV, replacing any existing file.
///
/// The file starts with a UTF-8 BOM, then one header line and one row per
/// (city, year).
pub fn write_summary(path: &Path, rows: &[SummaryRow]) -> Result<()> {
    debug!(path = %path.display(), rows = rows.len(), "Writing summary CSV");

    let mut file = File::create(path)?;
    file.write_all(UTF8_BOM)?;

    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}
