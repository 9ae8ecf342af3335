//! Toyama: one row per year, with the cost table (in hundred million yen)
//! beside the waste/population table under its own year column.

use crate::records::{City, Field};
use crate::sources::types::{FieldRule, FieldSource, Orientation, SourceRule, TableRule};

/// Yen per 億円.
const OKU: f64 = 100_000_000.0;

pub static RULE: SourceRule = SourceRule {
    city: City::Toyama,
    file_name: "富山ごみ.csv",
    tables: &[
        TableRule {
            name: "排出量",
            orientation: Orientation::YearRows,
            anchor: "年度",
            fields: &[
                FieldRule {
                    field: Field::WasteTons,
                    source: FieldSource::Sum {
                        labels: &["ごみ総排出量"],
                        scale: 1.0,
                    },
                },
                FieldRule {
                    field: Field::Population,
                    source: FieldSource::Sum {
                        labels: &["人口"],
                        scale: 1.0,
                    },
                },
            ],
        },
        TableRule {
            name: "経費",
            orientation: Orientation::YearRows,
            anchor: "年度",
            fields: &[FieldRule {
                field: Field::ProcessingCostYen,
                source: FieldSource::Sum {
                    labels: &["処理経費"],
                    scale: OKU,
                },
            }],
        },
    ],
};
