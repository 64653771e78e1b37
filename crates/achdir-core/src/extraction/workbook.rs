use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use calamine::{Data, Reader, Sheets, Xlsx};
use tracing::debug;

use crate::error::AchdirError;
use crate::extraction::WorkbookSource;
use crate::model::CellValue;

/// A spreadsheet workbook (xlsx, xls, xlsb, ods) opened through calamine.
pub struct CalamineWorkbook<RS: Read + Seek> {
    sheets: Sheets<RS>,
}

impl CalamineWorkbook<BufReader<File>> {
    /// Open a workbook from disk, picking the format from the file extension.
    pub fn open(path: &Path) -> Result<Self, AchdirError> {
        if !path.exists() {
            return Err(AchdirError::SourceMissing(path.to_path_buf()));
        }
        let sheets = calamine::open_workbook_auto(path).map_err(|e| {
            AchdirError::Workbook(format!("failed to open {}: {e}", path.display()))
        })?;
        Ok(CalamineWorkbook { sheets })
    }
}

impl CalamineWorkbook<Cursor<Vec<u8>>> {
    /// Open an in-memory xlsx workbook.
    pub fn from_xlsx_bytes(bytes: Vec<u8>) -> Result<Self, AchdirError> {
        let workbook: Xlsx<_> = calamine::open_workbook_from_rs(Cursor::new(bytes))
            .map_err(|e| AchdirError::Workbook(format!("failed to open xlsx: {e}")))?;
        Ok(CalamineWorkbook {
            sheets: Sheets::Xlsx(workbook),
        })
    }
}

impl<RS: Read + Seek> WorkbookSource for CalamineWorkbook<RS> {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    fn read_grid(&mut self, sheet: &str) -> Result<Vec<Vec<CellValue>>, AchdirError> {
        let range = self
            .sheets
            .worksheet_range(sheet)
            .map_err(|e| AchdirError::Workbook(format!("sheet '{sheet}' unreadable: {e}")))?;

        // calamine ranges start at the first used cell; pad back to A1.
        let (row_offset, col_offset) = range.start().unwrap_or((0, 0));
        let mut grid: Vec<Vec<CellValue>> = vec![Vec::new(); row_offset as usize];
        for row in range.rows() {
            let mut cells = vec![CellValue::Empty; col_offset as usize];
            cells.extend(row.iter().map(cell_value));
            grid.push(cells);
        }

        debug!(sheet, rows = grid.len(), "read sheet grid");
        Ok(grid)
    }
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(_) | Data::DateTimeIso(_) | Data::DurationIso(_) => {
            CellValue::Text(format!("{cell}"))
        }
        // Error cells (#N/A, #REF!) carry no participant data.
        _ => CellValue::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_conversion() {
        assert_eq!(
            cell_value(&Data::String("ABC Bank".into())),
            CellValue::Text("ABC Bank".into())
        );
        assert_eq!(cell_value(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(cell_value(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(cell_value(&Data::Empty), CellValue::Empty);
    }

    #[test]
    fn test_open_missing_workbook() {
        let result = CalamineWorkbook::open(Path::new("/nonexistent/ACHdata.xlsx"));
        assert!(matches!(result, Err(AchdirError::SourceMissing(_))));
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let result = CalamineWorkbook::from_xlsx_bytes(b"not a workbook".to_vec());
        assert!(matches!(result, Err(AchdirError::Workbook(_))));
    }

    const OFFSET_XLSX: &[u8] = include_bytes!("../../tests/fixtures/offset_participants.xlsx");

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.into())
    }

    #[test]
    fn test_sheet_names_in_workbook_order() {
        let wb = CalamineWorkbook::from_xlsx_bytes(OFFSET_XLSX.to_vec()).unwrap();
        assert_eq!(
            wb.sheet_names(),
            vec!["InstaPay Participants", "Offset Participants"]
        );
    }

    #[test]
    fn test_leading_empty_column_padded() {
        // Used range starts at B1; metadata sits in C1.
        let mut wb = CalamineWorkbook::from_xlsx_bytes(OFFSET_XLSX.to_vec()).unwrap();
        let grid = wb.read_grid("InstaPay Participants").unwrap();

        assert_eq!(grid.len(), 4);
        assert_eq!(grid[0][0], CellValue::Empty);
        assert_eq!(grid[0][2], text("ACH Participants as of 2025-12-31"));
        assert_eq!(grid[1][0], CellValue::Empty);
        assert_eq!(grid[1][1], text("Institution"));
        assert_eq!(grid[1][3], text("Institution Type"));
        assert_eq!(grid[3][1], text("XYZ Bank"));
    }

    #[test]
    fn test_leading_empty_row_padded() {
        // Used range starts at B2; row 1 is entirely empty.
        let mut wb = CalamineWorkbook::from_xlsx_bytes(OFFSET_XLSX.to_vec()).unwrap();
        let grid = wb.read_grid("Offset Participants").unwrap();

        assert_eq!(grid.len(), 3);
        assert!(grid[0].iter().all(CellValue::is_empty));
        assert_eq!(grid[1][1], text("Institution"));
        assert_eq!(grid[2][1], text("Tonik Digital Bank"));
        assert_eq!(grid[2][2], text("Sender/Receiver"));
    }

    #[test]
    fn test_unknown_sheet_is_workbook_error() {
        let mut wb = CalamineWorkbook::from_xlsx_bytes(OFFSET_XLSX.to_vec()).unwrap();
        assert!(matches!(
            wb.read_grid("No Such Sheet"),
            Err(AchdirError::Workbook(_))
        ));
    }
}
