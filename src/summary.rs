//! Per-city aggregation of KPIs across years.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::kpi::KpiRecord;
use crate::records::City;

/// Mean and spread of one KPI over the years where it is defined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiAggregate {
    pub mean: f64,
    pub stddev: f64,
    pub years: usize,
}

/// Summary statistics of one city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitySummary {
    pub city: City,
    pub city_name: &'static str,
    pub first_year: i32,
    pub last_year: i32,
    pub records: usize,
    pub waste_per_capita_g_per_day: Option<KpiAggregate>,
    pub cost_per_capita_yen_per_year: Option<KpiAggregate>,
    pub cost_per_ton_yen: Option<KpiAggregate>,
}

/// Top-level document written by `--summary-json`.
#[derive(Debug, Serialize)]
pub struct SummaryIndex {
    pub generated_at: DateTime<Utc>,
    pub cities: Vec<CitySummary>,
}

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Computes the population standard deviation given a pre-computed mean.
/// Returns 0.0 for empty input.
pub fn stddev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

    variance.sqrt()
}

fn aggregate(series: &[f64]) -> Option<KpiAggregate> {
    if series.is_empty() {
        return None;
    }
    let avg = mean(series);
    Some(KpiAggregate {
        mean: avg,
        stddev: stddev(series, avg),
        years: series.len(),
    })
}

/// Groups KPI rows by city, in city order.
pub fn summarize(kpis: &[KpiRecord]) -> Vec<CitySummary> {
    let mut by_city: BTreeMap<City, Vec<&KpiRecord>> = BTreeMap::new();
    for kpi in kpis {
        by_city.entry(kpi.city).or_default().push(kpi);
    }

    by_city
        .into_iter()
        .map(|(city, rows)| {
            let series = |pick: fn(&KpiRecord) -> Option<f64>| -> Vec<f64> {
                rows.iter().filter_map(|r| pick(r)).collect()
            };

            CitySummary {
                city,
                city_name: city.name_ja(),
                first_year: rows.iter().map(|r| r.year).min().unwrap_or_default(),
                last_year: rows.iter().map(|r| r.year).max().unwrap_or_default(),
                records: rows.len(),
                waste_per_capita_g_per_day: aggregate(&series(|r| r.waste_per_capita_g_per_day)),
                cost_per_capita_yen_per_year: aggregate(&series(|r| {
                    r.cost_per_capita_yen_per_year
                })),
                cost_per_ton_yen: aggregate(&series(|r| r.cost_per_ton_yen)),
            }
        })
        .collect()
}

/// Serializes a value as pretty JSON to `path`.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let body = serde_json::to_vec_pretty(value)?;
    fs::write(path, body)?;
    Ok(())
}
