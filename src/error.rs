//! Error types for source parsing and merging.

use thiserror::Error;

use crate::records::City;

/// What went wrong while reading one source.
#[derive(Error, Debug)]
pub enum ErrorKind {
    /// No row in the scanned preamble carried the table's expected tokens
    #[error("header not found for table '{table}' (expected tokens: {})", .expected.join(", "))]
    HeaderNotFound {
        table: String,
        expected: Vec<String>,
    },

    /// A located table whose year axis holds no year
    #[error("no years found in table '{table}'")]
    NoYears { table: String },

    /// A year-like cell that is neither a Gregorian year nor a valid era year
    #[error("unrecognized year '{value}'")]
    UnrecognizedYear { value: String },

    /// A value cell that is neither numeric nor a missing-value marker
    #[error("invalid number in '{field}': '{value}'")]
    InvalidNumber { field: String, value: String },

    /// Two records for the same (city, year)
    #[error("duplicate record for year {year}")]
    DuplicateKey { year: i32 },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A fatal error for one city's data, with enough context to find the
/// offending cell.
#[derive(Error, Debug)]
#[error("{city}{}: {kind}", location(.file, .row))]
pub struct ParseError {
    pub city: City,
    pub file: Option<String>,
    /// 1-based row in the source file.
    pub row: Option<usize>,
    #[source]
    pub kind: ErrorKind,
}

impl ParseError {
    pub fn new(city: City, kind: ErrorKind) -> Self {
        ParseError {
            city,
            file: None,
            row: None,
            kind,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Sets the row from a 0-based index.
    pub fn at_row(mut self, index: usize) -> Self {
        self.row = Some(index + 1);
        self
    }
}

fn location(file: &Option<String>, row: &Option<usize>) -> String {
    match (file, row) {
        (Some(f), Some(r)) => format!(" ({f}, row {r})"),
        (Some(f), None) => format!(" ({f})"),
        (None, Some(r)) => format!(" (row {r})"),
        (None, None) => String::new(),
    }
}
