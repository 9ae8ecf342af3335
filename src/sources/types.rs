//! Static rule types describing one municipal CSV layout.

use crate::records::{City, Field};

/// Everything needed to parse one city's source file.
pub struct SourceRule {
    pub city: City,
    /// File name the city publishes its data under.
    pub file_name: &'static str,
    /// Sub-tables, merged by year in this order.
    pub tables: &'static [TableRule],
}

/// One rectangular table inside a source file.
pub struct TableRule {
    /// Used in log lines and `HeaderNotFound` errors.
    pub name: &'static str,
    pub orientation: Orientation,
    /// Header cell that titles the year axis (or, for
    /// [`Orientation::YearColumns`], the label column).
    pub anchor: &'static str,
    pub fields: &'static [FieldRule],
}

/// How years are laid out in a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// One row per year below the header; field labels are column headers.
    YearRows,
    /// Years run across the header row; field labels sit in the anchor
    /// column of the rows below.
    YearColumns,
    /// A year row opens a section of detail rows; the row whose anchor cell
    /// equals `total_label` holds the values for that year.
    YearSections { total_label: &'static str },
}

pub struct FieldRule {
    pub field: Field,
    pub source: FieldSource,
}

/// Where the value of a normalized field comes from.
pub enum FieldSource {
    /// Sum of the present values under `labels`, times `scale`.
    Sum {
        labels: &'static [&'static str],
        scale: f64,
    },
    /// `numerator * scale / denominator`.
    Ratio {
        numerator: &'static str,
        denominator: &'static str,
        scale: f64,
    },
    /// Values published outside the file, by Gregorian year.
    Fixed(&'static [(i32, f64)]),
}

impl FieldSource {
    /// Native labels this source reads from the table.
    pub fn labels(&self) -> Vec<&'static str> {
        match self {
            FieldSource::Sum { labels, .. } => labels.to_vec(),
            FieldSource::Ratio {
                numerator,
                denominator,
                ..
            } => vec![*numerator, *denominator],
            FieldSource::Fixed(_) => Vec::new(),
        }
    }
}

impl TableRule {
    /// Distinct native labels read by this table, in rule order.
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels: Vec<&'static str> = Vec::new();
        for rule in self.fields {
            for label in rule.source.labels() {
                if !labels.contains(&label) {
                    labels.push(label);
                }
            }
        }
        labels
    }

    /// Anchor plus labels, as reported when the header cannot be found.
    pub fn expected_tokens(&self) -> Vec<String> {
        std::iter::once(self.anchor)
            .chain(self.labels())
            .map(String::from)
            .collect()
    }
}
