//! Per-record KPIs: waste per capita per day, cost per capita and cost per
//! tonne.

use chrono::NaiveDate;
use serde::Serialize;

use crate::normalize::CombinedTable;
use crate::records::{City, NormalizedRecord};

const GRAMS_PER_TON: f64 = 1_000_000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiRecord {
    pub city: City,
    pub year: i32,
    pub waste_per_capita_g_per_day: Option<f64>,
    pub cost_per_capita_yen_per_year: Option<f64>,
    pub cost_per_ton_yen: Option<f64>,
}

impl KpiRecord {
    /// Derives the three ratios of one record. Each ratio is `None` on its
    /// own when its numerator is missing or its denominator is missing or zero.
    pub fn from_record(record: &NormalizedRecord) -> Self {
        let population = record.population.map(|p| p as f64);

        let waste_grams = record.waste_tons.map(|w| w * GRAMS_PER_TON);
        let per_capita = Self::ratio(waste_grams, population);

        KpiRecord {
            city: record.city,
            year: record.year,
            waste_per_capita_g_per_day: Self::ratio(per_capita, days_in_year(record.year)),
            cost_per_capita_yen_per_year: Self::ratio(record.processing_cost_yen, population),
            cost_per_ton_yen: Self::ratio(record.processing_cost_yen, record.waste_tons),
        }
    }

    pub fn ratio(part: Option<f64>, total: Option<f64>) -> Option<f64> {
        match (part, total) {
            (Some(p), Some(t)) if t != 0.0 => Some(p / t),
            _ => None,
        }
    }
}

/// Days in the Gregorian calendar year, 366 for leap years.
pub fn days_in_year(year: i32) -> Option<f64> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let next = NaiveDate::from_ymd_opt(year + 1, 1, 1)?;
    Some((next - start).num_days() as f64)
}

/// KPIs for every record of the table, in table order.
pub fn compute(table: &CombinedTable) -> Vec<KpiRecord> {
    table.iter().map(KpiRecord::from_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(population: Option<u64>, waste: Option<f64>, cost: Option<f64>) -> NormalizedRecord {
        NormalizedRecord {
            city: City::Toyama,
            year: 2019,
            population,
            waste_tons: waste,
            processing_cost_yen: cost,
        }
    }

    #[test]
    fn test_ratio_with_zero_total() {
        assert_eq!(KpiRecord::ratio(Some(10.0), Some(0.0)), None);
        assert_eq!(KpiRecord::ratio(Some(10.0), None), None);
        assert_eq!(KpiRecord::ratio(None, Some(4.0)), None);
        assert_eq!(KpiRecord::ratio(Some(1.0), Some(4.0)), Some(0.25));
    }

    #[test]
    fn test_days_in_year_handles_leap_years() {
        assert_eq!(days_in_year(2019), Some(365.0));
        assert_eq!(days_in_year(2020), Some(366.0));
        assert_eq!(days_in_year(1900), Some(365.0));
        assert_eq!(days_in_year(2000), Some(366.0));
    }

    #[test]
    fn test_all_three_kpis() {
        let kpi = KpiRecord::from_record(&record(
            Some(400_000),
            Some(146_000.0),
            Some(4_380_000_000.0),
        ));

        // 146,000 t over 400,000 people and 365 days
        assert_eq!(kpi.waste_per_capita_g_per_day, Some(1000.0));
        assert_eq!(kpi.cost_per_capita_yen_per_year, Some(10_950.0));
        assert_eq!(kpi.cost_per_ton_yen, Some(30_000.0));
    }

    #[test]
    fn test_zero_population_leaves_only_per_ton_cost() {
        let kpi = KpiRecord::from_record(&record(Some(0), Some(100.0), Some(5_000.0)));

        assert_eq!(kpi.waste_per_capita_g_per_day, None);
        assert_eq!(kpi.cost_per_capita_yen_per_year, None);
        assert_eq!(kpi.cost_per_ton_yen, Some(50.0));
    }

    #[test]
    fn test_missing_waste_is_independent_of_per_capita_cost() {
        let kpi = KpiRecord::from_record(&record(Some(1_000), None, Some(5_000.0)));

        assert_eq!(kpi.waste_per_capita_g_per_day, None);
        assert_eq!(kpi.cost_per_ton_yen, None);
        assert_eq!(kpi.cost_per_capita_yen_per_year, Some(5.0));
    }

    #[test]
    fn test_zero_waste_gives_zero_per_capita_but_no_per_ton() {
        let kpi = KpiRecord::from_record(&record(Some(1_000), Some(0.0), Some(5_000.0)));

        assert_eq!(kpi.waste_per_capita_g_per_day, Some(0.0));
        assert_eq!(kpi.cost_per_ton_yen, None);
    }
}
