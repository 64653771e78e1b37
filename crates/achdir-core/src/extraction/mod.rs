pub mod pdftotext;
pub mod workbook;

use crate::error::AchdirError;
use crate::model::CellValue;

/// Content extracted from a single page of a PDF.
#[derive(Debug, Clone)]
pub struct PageContent {
    pub page_number: usize,
    pub lines: Vec<String>,
}

impl PageContent {
    pub fn has_text(&self) -> bool {
        self.lines.iter().any(|l| !l.trim().is_empty())
    }
}

/// Trait for PDF text extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract text content from PDF bytes, returning one PageContent per page.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, AchdirError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// A multi-sheet source read as raw cell grids.
pub trait WorkbookSource {
    /// Sheet names in workbook order.
    fn sheet_names(&self) -> Vec<String>;

    /// Read a sheet as rows of cells with no header inference.
    ///
    /// Row and column indexes are absolute: row 0 is the first sheet row
    /// even when it is empty.
    fn read_grid(&mut self, sheet: &str) -> Result<Vec<Vec<CellValue>>, AchdirError>;
}
