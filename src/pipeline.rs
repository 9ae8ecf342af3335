//! The full single-pass pipeline: parse every source, merge, derive KPIs.

use tracing::info;

use crate::config::SourcePaths;
use crate::error::ParseError;
use crate::kpi::{KpiRecord, compute};
use crate::normalize::{CombinedTable, merge};
use crate::sources::{parse_file, rule_for};

/// Parses all four sources to completion, then merges them.
///
/// The first failing source aborts the run; no partial table is returned.
pub fn load_sources(paths: &SourcePaths) -> Result<CombinedTable, ParseError> {
    let mut parsed = Vec::with_capacity(4);
    for (city, path) in paths.iter() {
        parsed.push(parse_file(rule_for(city), path)?);
    }
    merge(parsed)
}

/// Loads the sources and computes the KPI of every (city, year).
pub fn run(paths: &SourcePaths) -> Result<(CombinedTable, Vec<KpiRecord>), ParseError> {
    let table = load_sources(paths)?;
    let kpis = compute(&table);
    info!(
        cities = table.cities().len(),
        records = table.len(),
        "KPIs computed"
    );
    Ok((table, kpis))
}
