//! Japanese era (和暦) to Gregorian year conversion.
//!
//! The era list is plain data; supporting a new era means adding one entry to
//! [`ERAS`].

use crate::error::ErrorKind;
use crate::text::{clean_cell, strip_parenthetical};

/// One imperial era.
pub struct Era {
    /// Accepted spellings, lowercase. Single-letter abbreviations must be
    /// followed by the era year.
    pub names: &'static [&'static str],
    /// Gregorian year of era year 1.
    pub start: i32,
    /// Last valid era year, `None` for the current era.
    pub last_year: Option<u32>,
}

pub static ERAS: &[Era] = &[
    Era {
        names: &["令和", "reiwa", "r"],
        start: 2019,
        last_year: None,
    },
    Era {
        names: &["平成", "heisei", "h"],
        start: 1989,
        last_year: Some(31),
    },
    Era {
        names: &["昭和", "showa", "s"],
        start: 1926,
        last_year: Some(64),
    },
    Era {
        names: &["大正", "taisho", "t"],
        start: 1912,
        last_year: Some(15),
    },
    Era {
        names: &["明治", "meiji", "m"],
        start: 1868,
        last_year: Some(45),
    },
];

/// Spellings of era year 1.
const FIRST_YEAR: &[&str] = &["元", "gannen"];

/// Lowercased, space-free form with fiscal/calendar year suffixes removed.
fn canonical(raw: &str) -> String {
    let s: String = strip_parenthetical(&clean_cell(raw))
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    let s = s.strip_suffix("年度").unwrap_or(&s);
    let s = s.strip_suffix('年').unwrap_or(s);
    s.to_string()
}

/// Splits `s` into an era and the remaining era-year text.
fn split_era(s: &str) -> Option<(&'static Era, &str)> {
    for era in ERAS {
        for name in era.names {
            if let Some(rest) = s.strip_prefix(name) {
                let short = name.chars().count() == 1 && name.is_ascii();
                let rest_ok = rest.starts_with(|c: char| c.is_ascii_digit())
                    || FIRST_YEAR.iter().any(|f| rest.starts_with(f));
                if !short || rest_ok {
                    return Some((era, rest));
                }
            }
        }
    }
    None
}

/// Whether a cell should be read as a year label at all.
///
/// True for cells starting with an ASCII digit or a known era spelling; such
/// cells must then convert. Blank cells, notes, totals and facility names are
/// not years.
pub fn looks_like_year(raw: &str) -> bool {
    let s = canonical(raw);
    s.starts_with(|c: char| c.is_ascii_digit()) || split_era(&s).is_some()
}

/// Converts a year label to a Gregorian year.
///
/// Accepts `2019`, `2019年度`, `平成31年`, `令和元年度`, `Heisei 31`,
/// `Reiwa 2`, `R2`, `令和元(2019)年度` and full-width digit variants.
///
/// # Errors
///
/// [`ErrorKind::UnrecognizedYear`] for unknown tokens and for era years
/// outside the era's range (e.g. Heisei 32, Reiwa 0).
pub fn to_gregorian(raw: &str) -> Result<i32, ErrorKind> {
    let unrecognized = || ErrorKind::UnrecognizedYear {
        value: raw.trim().to_string(),
    };
    let s = canonical(raw);

    if s.len() == 4 && s.chars().all(|c| c.is_ascii_digit()) {
        return s.parse().map_err(|_| unrecognized());
    }

    let (era, rest) = split_era(&s).ok_or_else(unrecognized)?;
    let era_year: u32 = if FIRST_YEAR.contains(&rest) {
        1
    } else if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) {
        rest.parse().map_err(|_| unrecognized())?
    } else {
        return Err(unrecognized());
    };

    if era_year == 0 || era.last_year.is_some_and(|last| era_year > last) {
        return Err(unrecognized());
    }

    Ok(era.start + era_year as i32 - 1)
}
