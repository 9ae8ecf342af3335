//! Kanazawa: two side-by-side tables sharing one header row, years across
//! columns. Costs are published per stage in thousand yen.

use crate::records::{City, Field};
use crate::sources::types::{FieldRule, FieldSource, Orientation, SourceRule, TableRule};

pub static RULE: SourceRule = SourceRule {
    city: City::Kanazawa,
    file_name: "金沢ごみ.csv",
    tables: &[
        TableRule {
            name: "経費",
            orientation: Orientation::YearColumns,
            anchor: "費目",
            fields: &[FieldRule {
                field: Field::ProcessingCostYen,
                source: FieldSource::Sum {
                    labels: &["収集運搬費", "中間処理費", "最終処分費"],
                    scale: 1000.0,
                },
            }],
        },
        TableRule {
            name: "人口・排出量",
            orientation: Orientation::YearColumns,
            anchor: "区分",
            fields: &[
                FieldRule {
                    field: Field::Population,
                    source: FieldSource::Sum {
                        labels: &["人口"],
                        scale: 1.0,
                    },
                },
                FieldRule {
                    field: Field::WasteTons,
                    source: FieldSource::Sum {
                        labels: &["ごみ総排出量"],
                        scale: 1.0,
                    },
                },
            ],
        },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::parser::parse_reader;

    const SAMPLE: &str = "\
金沢市 ごみ処理の状況,,,,,,,
（単位：千円）,,,,,,,
費目,平成30年度,令和元年度,,区分,平成30年度,令和元年度,令和2年度
収集運搬費,\"1,100,000\",\"1,150,000\",,人口(人),\"463,000\",\"462,000\",\"461,000\"
中間処理費,\"2,000,000\",―,,ごみ総排出量(t),\"160,000\",\"158,000\",\"150,000\"
最終処分費,\"400,000\",\"420,000\",,,,,
※端数処理のため合計が一致しない場合がある,,,,,,,
";

    #[test]
    fn test_cost_components_are_summed_in_yen() {
        let records = parse_reader(&RULE, SAMPLE.as_bytes(), RULE.file_name).unwrap();
        let years: Vec<i32> = records.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2018, 2019, 2020]);

        assert_eq!(records[0].processing_cost_yen, Some(3_500_000_000.0));
        // missing 中間処理費 contributes nothing
        assert_eq!(records[1].processing_cost_yen, Some(1_570_000_000.0));
        assert_eq!(records[2].processing_cost_yen, None);
        assert_eq!(records[2].population, Some(461_000));
        assert_eq!(records[2].waste_tons, Some(150_000.0));
    }

    #[test]
    fn test_unit_column_before_years_is_skipped() {
        let text = "\
費目,単位,平成30年度,令和元年度,,区分,令和元年度
収集運搬費,千円,\"1,000\",\"1,100\",,人口(人),100
中間処理費,千円,\"2,000\",\"2,100\",,ごみ総排出量(t),10
最終処分費,千円,400,420,,,
";
        let records = parse_reader(&RULE, text.as_bytes(), RULE.file_name).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].year, 2018);
        assert_eq!(records[0].processing_cost_yen, Some(3_400_000.0));
        assert_eq!(records[0].population, None);
        assert_eq!(records[1].year, 2019);
        assert_eq!(records[1].processing_cost_yen, Some(3_620_000.0));
        assert_eq!(records[1].population, Some(100));
        assert_eq!(records[1].waste_tons, Some(10.0));
    }
}
