//! Rule-driven parser turning a raw municipal CSV into normalized records.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info, warn};

use crate::era::{looks_like_year, to_gregorian};
use crate::error::{ErrorKind, ParseError};
use crate::numeric::coerce;
use crate::records::{City, NormalizedRecord};
use crate::sources::types::{FieldSource, Orientation, SourceRule, TableRule};
use crate::text::normalize_label;

/// Rows searched for a table header before giving up.
pub const HEADER_SCAN_ROWS: usize = 20;

/// A located table header.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Header {
    row: usize,
    anchor_col: usize,
    /// Exclusive end of the table's column region.
    end_col: usize,
    /// Label -> column (row-oriented tables) or label -> row (`YearColumns`).
    positions: Vec<(&'static str, usize)>,
}

/// A raw value under a native label.
struct Cell<'a> {
    label: &'static str,
    raw: &'a str,
    row: usize,
}

/// All raw values of one table for one year.
struct Entry<'a> {
    year: i32,
    row: usize,
    cells: Vec<Cell<'a>>,
}

/// Reads every row of a CSV without header handling; rows may differ in length.
pub fn read_raw_records<R: Read>(reader: R) -> Result<Vec<StringRecord>, ErrorKind> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in rdr.records() {
        rows.push(result?);
    }
    Ok(rows)
}

/// Parses the source file at `path` with the given rule.
///
/// # Errors
///
/// Any [`ErrorKind`]; the error carries the city, the file and, where it
/// applies, the 1-based row.
#[tracing::instrument(skip(rule, path), fields(city = %rule.city, path = %path.display()))]
pub fn parse_file(rule: &SourceRule, path: &Path) -> Result<Vec<NormalizedRecord>, ParseError> {
    let file_name = path.display().to_string();
    let file = File::open(path)
        .map_err(|e| ParseError::new(rule.city, ErrorKind::Io(e)).with_file(&file_name))?;
    parse_reader(rule, file, &file_name)
}

/// Parses CSV text from any reader; `file_name` is only used in errors.
pub fn parse_reader<R: Read>(
    rule: &SourceRule,
    reader: R,
    file_name: &str,
) -> Result<Vec<NormalizedRecord>, ParseError> {
    let rows = read_raw_records(reader)
        .map_err(|k| ParseError::new(rule.city, k).with_file(file_name))?;
    debug!(rows = rows.len(), "Raw rows read");

    let records = parse_rows(rule, &rows).map_err(|e| e.with_file(file_name))?;
    info!(city = %rule.city, records = records.len(), "Source parsed");
    Ok(records)
}

/// Applies every table of `rule` to `rows`, merging the tables by year.
///
/// Records come out in the order their years first appear.
pub fn parse_rows(
    rule: &SourceRule,
    rows: &[StringRecord],
) -> Result<Vec<NormalizedRecord>, ParseError> {
    let city = rule.city;
    let mut records: Vec<NormalizedRecord> = Vec::new();
    let mut slots: HashMap<i32, usize> = HashMap::new();
    let anchors: Vec<&str> = rule.tables.iter().map(|t| t.anchor).collect();

    for table in rule.tables {
        let header = locate_header(table, &anchors, rows).ok_or_else(|| {
            ParseError::new(
                city,
                ErrorKind::HeaderNotFound {
                    table: table.name.to_string(),
                    expected: table.expected_tokens(),
                },
            )
        })?;
        debug!(
            table = table.name,
            row = header.row + 1,
            column = header.anchor_col + 1,
            "Header located"
        );

        let entries = extract_entries(city, table, rows, &header)?;
        debug!(table = table.name, entries = entries.len(), "Table extracted");
        if entries.is_empty() {
            return Err(ParseError::new(
                city,
                ErrorKind::NoYears {
                    table: table.name.to_string(),
                },
            )
            .at_row(header.row));
        }

        let mut seen = HashSet::new();
        for entry in entries {
            if !seen.insert(entry.year) {
                return Err(
                    ParseError::new(city, ErrorKind::DuplicateKey { year: entry.year })
                        .at_row(entry.row),
                );
            }

            let slot = *slots.entry(entry.year).or_insert_with(|| {
                records.push(NormalizedRecord::empty(city, entry.year));
                records.len() - 1
            });

            for field_rule in table.fields {
                let value = evaluate(city, &field_rule.source, &entry)?;
                if value.is_some() {
                    records[slot].set(field_rule.field, value);
                }
            }
        }
    }

    Ok(records)
}

fn cell_label(row: &StringRecord, col: usize) -> String {
    normalize_label(row.get(col).unwrap_or(""))
}

/// First row below `header_row` whose `col` cell is `label`.
fn find_label_row(
    rows: &[StringRecord],
    header_row: usize,
    col: usize,
    label: &str,
) -> Option<usize> {
    rows.iter()
        .enumerate()
        .skip(header_row + 1)
        .find(|(_, row)| cell_label(row, col) == label)
        .map(|(r, _)| r)
}

/// Scans the first [`HEADER_SCAN_ROWS`] rows for the table's anchor and
/// labels. The first anchor occurrence that has every label wins.
///
/// The table's column region ends at the next cell holding any of the
/// source's `anchors`.
fn locate_header(
    table: &TableRule,
    anchors: &[&str],
    rows: &[StringRecord],
) -> Option<Header> {
    let labels = table.labels();

    for (r, row) in rows.iter().enumerate().take(HEADER_SCAN_ROWS) {
        let cells: Vec<String> = row.iter().map(normalize_label).collect();

        for (c, cell) in cells.iter().enumerate() {
            if cell != table.anchor {
                continue;
            }
            let end_col = cells[c + 1..]
                .iter()
                .position(|x| anchors.contains(&x.as_str()))
                .map_or(cells.len(), |p| c + 1 + p);

            let positions: Option<Vec<(&'static str, usize)>> = match table.orientation {
                Orientation::YearColumns => labels
                    .iter()
                    .map(|l| find_label_row(rows, r, c, l).map(|lr| (*l, lr)))
                    .collect(),
                Orientation::YearRows | Orientation::YearSections { .. } => labels
                    .iter()
                    .map(|l| {
                        (c + 1..end_col)
                            .find(|&col| cells[col] == *l)
                            .map(|col| (*l, col))
                    })
                    .collect(),
            };

            if let Some(positions) = positions {
                return Some(Header {
                    row: r,
                    anchor_col: c,
                    end_col,
                    positions,
                });
            }
        }
    }

    None
}

fn year_at(city: City, raw: &str, row: usize) -> Result<i32, ParseError> {
    to_gregorian(raw).map_err(|k| ParseError::new(city, k).at_row(row))
}

fn row_entry<'a>(year: i32, row: usize, record: &'a StringRecord, header: &Header) -> Entry<'a> {
    Entry {
        year,
        row,
        cells: header
            .positions
            .iter()
            .map(|&(label, col)| Cell {
                label,
                raw: record.get(col).unwrap_or(""),
                row,
            })
            .collect(),
    }
}

fn extract_entries<'a>(
    city: City,
    table: &TableRule,
    rows: &'a [StringRecord],
    header: &Header,
) -> Result<Vec<Entry<'a>>, ParseError> {
    let mut entries = Vec::new();
    let body = rows.iter().enumerate().skip(header.row + 1);

    match table.orientation {
        Orientation::YearRows => {
            for (r, record) in body {
                let anchor = record.get(header.anchor_col).unwrap_or("");
                if !looks_like_year(anchor) {
                    continue;
                }
                let year = year_at(city, anchor, r)?;
                entries.push(row_entry(year, r, record, header));
            }
        }
        Orientation::YearSections { total_label } => {
            let mut open: Option<i32> = None;
            for (r, record) in body {
                let anchor = record.get(header.anchor_col).unwrap_or("");
                if looks_like_year(anchor) {
                    if let Some(year) = open {
                        warn!(table = table.name, year, "Section has no total row");
                    }
                    open = Some(year_at(city, anchor, r)?);
                } else if normalize_label(anchor) == total_label {
                    if let Some(year) = open.take() {
                        entries.push(row_entry(year, r, record, header));
                    }
                }
            }
            if let Some(year) = open {
                warn!(table = table.name, year, "Section has no total row");
            }
        }
        Orientation::YearColumns => {
            let header_row = &rows[header.row];
            for c in header.anchor_col + 1..header.end_col {
                let raw = header_row.get(c).unwrap_or("");
                if !looks_like_year(raw) {
                    continue;
                }
                let year = year_at(city, raw, header.row)?;
                entries.push(Entry {
                    year,
                    row: header.row,
                    cells: header
                        .positions
                        .iter()
                        .map(|&(label, lr)| Cell {
                            label,
                            raw: rows[lr].get(c).unwrap_or(""),
                            row: lr,
                        })
                        .collect(),
                });
            }
        }
    }

    Ok(entries)
}

fn value_of(city: City, entry: &Entry<'_>, label: &str) -> Result<Option<f64>, ParseError> {
    match entry.cells.iter().find(|cell| cell.label == label) {
        Some(cell) => {
            coerce(cell.raw, cell.label).map_err(|k| ParseError::new(city, k).at_row(cell.row))
        }
        None => Ok(None),
    }
}

fn evaluate(
    city: City,
    source: &FieldSource,
    entry: &Entry<'_>,
) -> Result<Option<f64>, ParseError> {
    match source {
        FieldSource::Sum { labels, scale } => {
            let mut total: Option<f64> = None;
            for label in labels.iter() {
                if let Some(v) = value_of(city, entry, label)? {
                    *total.get_or_insert(0.0) += v;
                }
            }
            Ok(total.map(|t| t * scale))
        }
        FieldSource::Ratio {
            numerator,
            denominator,
            scale,
        } => {
            let n = value_of(city, entry, numerator)?;
            let d = value_of(city, entry, denominator)?;
            Ok(match (n, d) {
                (Some(n), Some(d)) if d > 0.0 => Some(n * scale / d),
                _ => None,
            })
        }
        FieldSource::Fixed(values) => Ok(values
            .iter()
            .find(|(year, _)| *year == entry.year)
            .map(|(_, v)| *v)),
    }
}
