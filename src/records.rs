//! Record types shared by the parsing, normalization and KPI stages.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The four municipalities with a source dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum City {
    Kanazawa,
    Sakai,
    Toyama,
    Chiba,
}

impl City {
    pub const ALL: [City; 4] = [City::Kanazawa, City::Sakai, City::Toyama, City::Chiba];

    /// Lowercase English name, used in config files, CLI arguments and output.
    pub fn as_str(self) -> &'static str {
        match self {
            City::Kanazawa => "kanazawa",
            City::Sakai => "sakai",
            City::Toyama => "toyama",
            City::Chiba => "chiba",
        }
    }

    pub fn name_ja(self) -> &'static str {
        match self {
            City::Kanazawa => "金沢市",
            City::Sakai => "堺市",
            City::Toyama => "富山市",
            City::Chiba => "千葉市",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown city '{0}' (expected one of: kanazawa, sakai, toyama, chiba)")]
pub struct UnknownCity(pub String);

impl FromStr for City {
    type Err = UnknownCity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        City::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| UnknownCity(s.to_string()))
    }
}

/// A column of the normalized schema that sources populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Population,
    WasteTons,
    ProcessingCostYen,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Population => "population",
            Field::WasteTons => "waste_tons",
            Field::ProcessingCostYen => "processing_cost_yen",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (city, year) observation in the common schema.
///
/// `year` is always Gregorian. Missing source values stay `None`; they are
/// never defaulted to zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    pub city: City,
    pub year: i32,
    pub population: Option<u64>,
    pub waste_tons: Option<f64>,
    pub processing_cost_yen: Option<f64>,
}

impl NormalizedRecord {
    pub fn empty(city: City, year: i32) -> Self {
        NormalizedRecord {
            city,
            year,
            population: None,
            waste_tons: None,
            processing_cost_yen: None,
        }
    }

    /// Stores a scaled field value, rounding population to whole persons.
    pub fn set(&mut self, field: Field, value: Option<f64>) {
        match field {
            Field::Population => self.population = value.map(|v| v.round() as u64),
            Field::WasteTons => self.waste_tons = value,
            Field::ProcessingCostYen => self.processing_cost_yen = value,
        }
    }
}
