//! Cell text cleanup shared by label matching, year parsing and numeric coercion.

use unicode_normalization::UnicodeNormalization;

/// Strips a UTF-8 BOM, applies NFKC and trims whitespace.
///
/// NFKC folds full-width ASCII, the ideographic space, half-width katakana
/// and era ligatures such as `㍻` to their plain forms.
pub fn clean_cell(raw: &str) -> String {
    let folded: String = raw.trim_start_matches('\u{feff}').nfkc().collect();
    folded.trim().to_string()
}

/// Canonical form of a header or row label: cleaned, without any whitespace
/// and without a trailing unit parenthetical such as `(t)` or `（千円）`.
pub fn normalize_label(raw: &str) -> String {
    let compact: String = clean_cell(raw)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    match (compact.ends_with(')'), compact.rfind('(')) {
        (true, Some(open)) if open > 0 => compact[..open].to_string(),
        _ => compact,
    }
}

/// Removes every parenthesized group, e.g. `令和元(2019)年度` -> `令和元年度`.
pub fn strip_parenthetical(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut depth = 0usize;
    for c in s.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}
