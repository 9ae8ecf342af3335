//! Numeric coercion of raw value cells.

use crate::error::ErrorKind;
use crate::text::clean_cell;

/// Cell contents meaning "no value published", compared after cleanup.
/// NFKC turns `…` into `...` and `－` into `-`.
pub const MISSING_MARKERS: &[&str] = &["", "-", "―", "—", "‐", "...", "*", "nan"];

/// Coerces a raw cell to a non-negative number.
///
/// Thousands separators and surrounding whitespace are stripped; full-width
/// digits are accepted. Missing-value markers give `Ok(None)`.
///
/// # Errors
///
/// [`ErrorKind::InvalidNumber`] for non-numeric, non-finite or negative
/// content. `field` is the native label reported in the error.
pub fn coerce(raw: &str, field: &str) -> Result<Option<f64>, ErrorKind> {
    let cleaned = clean_cell(raw);
    if MISSING_MARKERS.contains(&cleaned.to_ascii_lowercase().as_str()) {
        return Ok(None);
    }

    let invalid = || ErrorKind::InvalidNumber {
        field: field.to_string(),
        value: raw.to_string(),
    };

    let digits: String = cleaned.chars().filter(|c| *c != ',').collect();
    let value: f64 = digits.trim().parse().map_err(|_| invalid())?;

    if !value.is_finite() || value < 0.0 {
        return Err(invalid());
    }

    Ok(Some(value))
}
