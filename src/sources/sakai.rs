//! Sakai: waste and cost tables side by side, years across columns. The city
//! publishes no population; it is recovered from annual cost (thousand yen)
//! and cost per resident (yen).

use crate::records::{City, Field};
use crate::sources::types::{FieldRule, FieldSource, Orientation, SourceRule, TableRule};

pub static RULE: SourceRule = SourceRule {
    city: City::Sakai,
    file_name: "堺市ごみ.csv",
    tables: &[
        TableRule {
            name: "排出量",
            orientation: Orientation::YearColumns,
            anchor: "年度",
            fields: &[FieldRule {
                field: Field::WasteTons,
                source: FieldSource::Sum {
                    labels: &["ごみ排出量"],
                    scale: 1.0,
                },
            }],
        },
        TableRule {
            name: "経費",
            orientation: Orientation::YearColumns,
            anchor: "区分",
            fields: &[
                FieldRule {
                    field: Field::ProcessingCostYen,
                    source: FieldSource::Sum {
                        labels: &["年間経費"],
                        scale: 1000.0,
                    },
                },
                FieldRule {
                    field: Field::Population,
                    source: FieldSource::Ratio {
                        numerator: "年間経費",
                        denominator: "1人当たり経費",
                        scale: 1000.0,
                    },
                },
            ],
        },
    ],
};
