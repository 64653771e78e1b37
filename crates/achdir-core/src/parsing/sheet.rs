use tracing::{debug, warn};

use crate::config::schema::{ColumnMapping, WorkbookConfig};
use crate::error::AchdirError;
use crate::model::{CellValue, NormalizedTable, ParseWarning, ParticipantRow, WarningKind};
use crate::parsing::header::sheet_subtitle;
use crate::parsing::normalize::{column_names, parse_flag};

/// One sheet turned into a table, with the recoverable issues found on the way.
#[derive(Debug, Clone)]
pub struct ParsedSheet {
    pub table: NormalizedTable,
    pub warnings: Vec<ParseWarning>,
}

/// Parse a raw sheet grid that follows the two-header-row convention.
///
/// Row 0 holds free-text metadata, row 1 the column names, rows 2.. the data.
/// Fully empty rows and columns are dropped before the columns are mapped
/// onto participant fields.
pub fn parse_sheet(
    name: &str,
    grid: &[Vec<CellValue>],
    config: &WorkbookConfig,
) -> Result<ParsedSheet, AchdirError> {
    if grid.len() < 2 {
        return Err(AchdirError::MalformedSheet {
            sheet: name.to_string(),
            reason: format!(
                "expected a metadata row and a header row, found {} row(s)",
                grid.len()
            ),
        });
    }

    let subtitle = sheet_subtitle(&grid[0], config.subtitle);
    let width = grid[1..].iter().map(Vec::len).max().unwrap_or(0);
    let (names, notes) = column_names(&grid[1], width);

    let data: Vec<&Vec<CellValue>> = grid[2..]
        .iter()
        .filter(|row| !row.iter().all(CellValue::is_empty))
        .collect();

    let kept: Vec<usize> = (0..width)
        .filter(|&c| data.iter().any(|row| !cell_at(row, c).is_empty()))
        .collect();

    let mut warnings: Vec<ParseWarning> = notes
        .into_iter()
        .filter(|(idx, _, _)| kept.contains(idx))
        .map(|(_, kind, reason)| {
            warn!(sheet = name, %kind, "{reason}");
            ParseWarning {
                source: name.to_string(),
                kind,
                reason,
            }
        })
        .collect();

    let columns: Vec<String> = kept.iter().map(|&c| names[c].clone()).collect();

    if data.is_empty() {
        debug!(sheet = name, "sheet has no data rows");
        warnings.push(ParseWarning {
            source: name.to_string(),
            kind: WarningKind::NoRowsExtracted,
            reason: "sheet has no data rows".into(),
        });
        return Ok(ParsedSheet {
            table: NormalizedTable {
                name: name.to_string(),
                subtitle,
                columns,
                rows: Vec::new(),
            },
            warnings,
        });
    }

    let mapping = config.columns_for(name);
    let find = |column: &str| kept.iter().copied().find(|&c| names[c] == column);

    let institution_col =
        find(mapping.institution.as_str()).ok_or_else(|| AchdirError::MalformedSheet {
            sheet: name.to_string(),
            reason: format!("no '{}' column with data", mapping.institution),
        })?;

    let category_col = optional_column(name, mapping.category.as_deref(), &find, &mut warnings);
    let type_col = optional_column(name, mapping.institution_type.as_deref(), &find, &mut warnings);
    let flag_cols = flag_columns(mapping, &find);

    let rows: Vec<ParticipantRow> = data
        .iter()
        .map(|row| {
            let mut participant =
                ParticipantRow::new(cell_text(row, institution_col).unwrap_or_default());
            participant.category = category_col.and_then(|c| cell_text(row, c));
            participant.institution_type = type_col.and_then(|c| cell_text(row, c));
            for (flag, c) in &flag_cols {
                if let Some(value) = parse_flag(cell_at(row, *c)) {
                    participant.flags.insert(flag.clone(), value);
                }
            }
            for &c in &kept {
                if let Some(text) = cell_text(row, c) {
                    participant.fields.insert(names[c].clone(), text);
                }
            }
            participant
        })
        .collect();

    debug!(
        sheet = name,
        rows = rows.len(),
        columns = columns.len(),
        "parsed sheet"
    );

    Ok(ParsedSheet {
        table: NormalizedTable {
            name: name.to_string(),
            subtitle,
            columns,
            rows,
        },
        warnings,
    })
}

static EMPTY_CELL: CellValue = CellValue::Empty;

fn cell_at(row: &[CellValue], col: usize) -> &CellValue {
    row.get(col).unwrap_or(&EMPTY_CELL)
}

fn cell_text(row: &[CellValue], col: usize) -> Option<String> {
    cell_at(row, col).as_text().map(|s| s.trim().to_string())
}

fn optional_column(
    sheet: &str,
    column: Option<&str>,
    find: &dyn Fn(&str) -> Option<usize>,
    warnings: &mut Vec<ParseWarning>,
) -> Option<usize> {
    let column = column?;
    let found = find(column);
    if found.is_none() {
        warn!(sheet, column, "mapped column not present");
        warnings.push(ParseWarning {
            source: sheet.to_string(),
            kind: WarningKind::MissingColumn,
            reason: format!("no '{column}' column with data"),
        });
    }
    found
}

fn flag_columns(
    mapping: &ColumnMapping,
    find: &dyn Fn(&str) -> Option<usize>,
) -> Vec<(String, usize)> {
    mapping
        .flags
        .iter()
        .filter_map(|flag| find(flag.as_str()).map(|c| (flag.clone(), c)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::builtin::default_config;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.into())
    }

    fn row(cells: &[&str]) -> Vec<CellValue> {
        cells
            .iter()
            .map(|s| if s.is_empty() { CellValue::Empty } else { text(s) })
            .collect()
    }

    fn workbook_config() -> WorkbookConfig {
        default_config().unwrap().workbook
    }

    #[test]
    fn test_parse_basic_sheet() {
        let grid = vec![
            row(&["InstaPay participants as of 2025-12-31"]),
            row(&[" Institution ", "Category", "Institution Type"]),
            row(&["ABC Bank", "Sender/Receiver", "Thrift Banks (TBs)"]),
            row(&["XYZ Bank", "Sender Only", "Rural Banks (RBs)"]),
        ];
        let parsed = parse_sheet("InstaPay Participants", &grid, &workbook_config()).unwrap();
        let table = parsed.table;
        assert_eq!(table.subtitle, "as of 2025-12-31");
        assert_eq!(table.columns, vec!["Institution", "Category", "Institution Type"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].institution, "ABC Bank");
        assert_eq!(table.rows[0].category.as_deref(), Some("Sender/Receiver"));
        assert_eq!(
            table.rows[1].institution_type.as_deref(),
            Some("Rural Banks (RBs)")
        );
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_empty_rows_and_columns_dropped() {
        let grid = vec![
            row(&["metadata"]),
            row(&["Institution", "Notes", "Category"]),
            row(&["ABC Bank", "", "Sender Only"]),
            row(&["", "", ""]),
            row(&["XYZ Bank", "  ", "Receiver Only"]),
        ];
        let table = parse_sheet("S Participants", &grid, &workbook_config())
            .unwrap()
            .table;
        assert_eq!(table.columns, vec!["Institution", "Category"]);
        assert_eq!(table.rows.len(), 2);
        assert!(table.rows.iter().all(|r| !r.fields.contains_key("Notes")));
    }

    #[test]
    fn test_too_few_rows_is_malformed() {
        let grid = vec![row(&["only metadata"])];
        let err = parse_sheet("Broken Participants", &grid, &workbook_config()).unwrap_err();
        assert!(matches!(err, AchdirError::MalformedSheet { .. }));
    }

    #[test]
    fn test_missing_institution_column_is_malformed() {
        let grid = vec![
            row(&["metadata"]),
            row(&["Bank", "Category"]),
            row(&["ABC Bank", "Sender Only"]),
        ];
        let err = parse_sheet("Odd Participants", &grid, &workbook_config()).unwrap_err();
        assert!(matches!(err, AchdirError::MalformedSheet { .. }));
    }

    #[test]
    fn test_missing_type_column_warns() {
        let grid = vec![
            row(&["metadata"]),
            row(&["Institution", "Category"]),
            row(&["ABC Bank", "Sender Only"]),
        ];
        let parsed = parse_sheet("PESONet Participants", &grid, &workbook_config()).unwrap();
        assert_eq!(parsed.table.rows[0].institution_type, None);
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.warnings[0].kind, WarningKind::MissingColumn);
    }

    #[test]
    fn test_flags_parsed() {
        let grid = vec![
            row(&["metadata"]),
            row(&["Institution", "Institution Type", "QR Sender", "QR Receiver"]),
            vec![
                text("ABC Bank"),
                text("Digital Banks"),
                CellValue::Bool(true),
                text("FALSE"),
            ],
        ];
        let parsed =
            parse_sheet("Bills Pay Participants (Full)", &grid, &workbook_config()).unwrap();
        let r = &parsed.table.rows[0];
        assert!(r.flag("QR Sender"));
        assert!(!r.flag("QR Receiver"));
        assert_eq!(r.flags.len(), 2);
        assert_eq!(r.fields.get("QR Sender").map(String::as_str), Some("TRUE"));
    }

    #[test]
    fn test_per_sheet_column_override() {
        let mut cfg = workbook_config();
        cfg.sheet_columns.insert(
            "eGov Pay".into(),
            ColumnMapping {
                institution: "Institution".into(),
                category: Some("Role".into()),
                institution_type: Some("Category".into()),
                flags: vec![],
            },
        );
        let grid = vec![
            row(&["metadata"]),
            row(&["Institution", "Category", "Role"]),
            row(&["ABC Bank", "U/KBs", "Issuer"]),
        ];
        let r = &parse_sheet("eGov Pay", &grid, &cfg).unwrap().table.rows[0];
        assert_eq!(r.category.as_deref(), Some("Issuer"));
        assert_eq!(r.institution_type.as_deref(), Some("U/KBs"));
    }

    #[test]
    fn test_duplicate_institutions_preserved() {
        let grid = vec![
            row(&["metadata"]),
            row(&["Institution"]),
            row(&["ABC Bank"]),
            row(&["ABC Bank"]),
        ];
        let table = parse_sheet("X Participants", &grid, &workbook_config())
            .unwrap()
            .table;
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn test_header_only_sheet_is_empty_not_error() {
        let grid = vec![row(&["metadata"]), row(&["Institution", "Category"])];
        let parsed = parse_sheet("Empty Participants", &grid, &workbook_config()).unwrap();
        assert!(parsed.table.rows.is_empty());
        assert!(parsed.table.columns.is_empty());
        assert_eq!(parsed.warnings[0].kind, WarningKind::NoRowsExtracted);
    }
}
