//! Per-city source parsers.
//!
//! Each city's CSV layout is described by a static [`SourceRule`]; a single
//! rule-driven engine in [`parser`] reads all four formats into
//! [`NormalizedRecord`](crate::records::NormalizedRecord)s.

pub mod chiba;
pub mod kanazawa;
pub mod parser;
pub mod sakai;
pub mod toyama;
pub mod types;

pub use parser::{parse_file, parse_reader};
pub use types::{FieldRule, FieldSource, Orientation, SourceRule, TableRule};

use crate::records::City;

/// The parsing rule for `city`.
pub fn rule_for(city: City) -> &'static SourceRule {
    match city {
        City::Kanazawa => &kanazawa::RULE,
        City::Sakai => &sakai::RULE,
        City::Toyama => &toyama::RULE,
        City::Chiba => &chiba::RULE,
    }
}
