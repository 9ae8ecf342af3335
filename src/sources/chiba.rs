//! Chiba: per-year sections listing each facility, closed by a total row.
//! Costs are in yen. Population is not part of the file and comes from the
//! city's published resident counts.

use crate::records::{City, Field};
use crate::sources::types::{FieldRule, FieldSource, Orientation, SourceRule, TableRule};

/// Resident population by Gregorian year.
pub const POPULATION: &[(i32, f64)] = &[
    (2010, 961_749.0),
    (2011, 962_624.0),
    (2012, 962_130.0),
    (2013, 964_153.0),
    (2014, 966_862.0),
    (2015, 971_842.0),
    (2016, 972_861.0),
    (2017, 975_149.0),
    (2018, 977_419.0),
    (2019, 980_637.0),
    (2020, 974_951.0),
    (2021, 975_210.0),
    (2022, 975_268.0),
];

pub static RULE: SourceRule = SourceRule {
    city: City::Chiba,
    file_name: "千葉ごみ処理費用.csv",
    tables: &[TableRule {
        name: "処理費用",
        orientation: Orientation::YearSections { total_label: "合計" },
        anchor: "年度",
        fields: &[
            FieldRule {
                field: Field::ProcessingCostYen,
                source: FieldSource::Sum {
                    labels: &["処理費用"],
                    scale: 1.0,
                },
            },
            FieldRule {
                field: Field::WasteTons,
                source: FieldSource::Sum {
                    labels: &["処理量"],
                    scale: 1.0,
                },
            },
            FieldRule {
                field: Field::Population,
                source: FieldSource::Fixed(POPULATION),
            },
        ],
    }],
};
