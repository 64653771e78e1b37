use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::parsing::document::ExtractedDocument;

/// A single workbook cell, detached from the spreadsheet backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// True for empty cells and for text that is only whitespace.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Text rendering of the cell, or None when the cell is empty.
    pub fn as_text(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self.to_string())
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Bool(true) => write!(f, "TRUE"),
            CellValue::Bool(false) => write!(f, "FALSE"),
        }
    }
}

/// One participant entry from a sheet or a document stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantRow {
    pub institution: String,
    /// Participation role, e.g. "Sender/Receiver" or "Issuer".
    pub category: Option<String>,
    /// Bank classification, e.g. "Rural Banks (RBs)" or "RBs".
    pub institution_type: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub flags: BTreeMap<String, bool>,
    /// Every non-empty source cell of the row, keyed by column name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
}

impl ParticipantRow {
    pub fn new(institution: impl Into<String>) -> Self {
        ParticipantRow {
            institution: institution.into(),
            category: None,
            institution_type: None,
            flags: BTreeMap::new(),
            fields: BTreeMap::new(),
        }
    }

    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }
}

/// Rows of one sheet or stream, in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTable {
    pub name: String,
    pub subtitle: String,
    pub columns: Vec<String>,
    pub rows: Vec<ParticipantRow>,
}

impl NormalizedTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    MalformedSheet,
    NoExtractableText,
    NoRowsExtracted,
    ExtractionFailed,
    DuplicateColumn,
    BlankColumn,
    MissingColumn,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WarningKind::MalformedSheet => "malformed sheet",
            WarningKind::NoExtractableText => "no extractable text",
            WarningKind::NoRowsExtracted => "no rows extracted",
            WarningKind::ExtractionFailed => "extraction failed",
            WarningKind::DuplicateColumn => "duplicate column",
            WarningKind::BlankColumn => "blank column",
            WarningKind::MissingColumn => "missing column",
        };
        write!(f, "{s}")
    }
}

/// A recoverable problem found while loading; the load itself succeeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseWarning {
    pub source: String,
    pub kind: WarningKind,
    pub reason: String,
}

/// A numbered line that could not be attributed to an institution type and role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedLine {
    pub source: String,
    pub page_number: usize,
    pub line_text: String,
    pub reason: String,
}

/// Everything produced by one load of a workbook or a set of documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticipantDirectory {
    pub tables: Vec<NormalizedTable>,
    pub warnings: Vec<ParseWarning>,
    pub skipped_lines: Vec<SkippedLine>,
}

impl ParticipantDirectory {
    pub fn get(&self, name: &str) -> Option<&NormalizedTable> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    /// True when no table holds any row ("no participants", not an error).
    pub fn has_no_rows(&self) -> bool {
        self.tables.iter().all(|t| t.rows.is_empty())
    }

    /// Append one extracted document as a table of this directory.
    pub fn push_document(&mut self, doc: ExtractedDocument) {
        self.warnings.extend(doc.warnings);
        self.skipped_lines.extend(doc.skipped_lines);
        self.tables.push(doc.table);
    }
}

impl From<ExtractedDocument> for ParticipantDirectory {
    fn from(doc: ExtractedDocument) -> Self {
        let mut directory = ParticipantDirectory::default();
        directory.push_document(doc);
        directory
    }
}
