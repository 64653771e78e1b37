use std::collections::HashSet;

use crate::model::{CellValue, WarningKind};

/// Collapse runs of whitespace to a single space and trim.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Interpret a capability cell as a boolean flag.
///
/// Accepts spreadsheet booleans, TRUE/FALSE style text, check marks and 1/0.
/// Returns None for empty or unrecognized cells.
pub fn parse_flag(cell: &CellValue) -> Option<bool> {
    match cell {
        CellValue::Bool(b) => Some(*b),
        CellValue::Number(n) if *n == 1.0 => Some(true),
        CellValue::Number(n) if *n == 0.0 => Some(false),
        CellValue::Text(s) => match s.trim().to_uppercase().as_str() {
            "TRUE" | "YES" | "Y" | "X" | "✓" | "✅" | "1" => Some(true),
            "FALSE" | "NO" | "N" | "✗" | "❌" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Turn a raw header row into unique, trimmed column names.
///
/// Blank headers become `Unnamed: <index>` and repeated names get `.1`, `.2`
/// suffixes. Every rename is reported with its column index.
pub fn column_names(
    header: &[CellValue],
    width: usize,
) -> (Vec<String>, Vec<(usize, WarningKind, String)>) {
    let mut names = Vec::with_capacity(width);
    let mut notes = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for idx in 0..width {
        let raw = header
            .get(idx)
            .map(|c| c.to_string().trim().to_string())
            .unwrap_or_default();

        let base = if raw.is_empty() {
            let name = format!("Unnamed: {idx}");
            notes.push((
                idx,
                WarningKind::BlankColumn,
                format!("column {idx} has no header, named '{name}'"),
            ));
            name
        } else {
            raw
        };

        let mut name = base.clone();
        let mut n = 1;
        while seen.contains(&name) {
            name = format!("{base}.{n}");
            n += 1;
        }
        if name != base {
            notes.push((
                idx,
                WarningKind::DuplicateColumn,
                format!("column '{base}' repeated, renamed to '{name}'"),
            ));
        }

        seen.insert(name.clone());
        names.push(name);
    }

    (names, notes)
}
