use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::config::schema::{DocumentConfig, SubtitleMode};
use crate::extraction::PageContent;
use crate::model::{NormalizedTable, ParseWarning, ParticipantRow, SkippedLine, WarningKind};
use crate::parsing::header::document_subtitle;
use crate::parsing::normalize::collapse_whitespace;

static NUMBERED_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s+(.*)").expect("valid numbered-entry regex"));

pub const DOCUMENT_COLUMNS: [&str; 3] = ["Institution", "Category", "Institution Type"];

/// Running context while scanning a document top to bottom.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanState {
    /// Short code of the current institution type section.
    pub institution_type: Option<String>,
    /// Label of the current participation role section.
    pub role: Option<String>,
}

/// What a single line did to the scan.
#[derive(Debug, Clone, PartialEq)]
pub enum LineEvent {
    InstitutionType(String),
    Role(String),
    Entry(ParticipantRow),
    /// Numbered line seen before both the institution type and role were known.
    Orphan(String),
    Ignored,
}

/// Advance the scan by one line.
///
/// The line is whitespace-collapsed first. Numbered lines are always entries,
/// even when the institution name contains a marker. Otherwise institution
/// type markers are matched by substring, role tokens by case-insensitive
/// prefix, and in both lists the first configured entry that matches wins. A
/// numbered entry is only emitted once both parts of the state are set.
pub fn step(state: ScanState, raw_line: &str, config: &DocumentConfig) -> (ScanState, LineEvent) {
    let line = collapse_whitespace(raw_line);
    if line.is_empty() {
        return (state, LineEvent::Ignored);
    }

    let entry = NUMBERED_ENTRY
        .captures(&line)
        .map(|caps| caps[1].trim().to_string());
    if let Some(name) = entry {
        let event = match (&state.institution_type, &state.role) {
            (Some(inst_type), Some(role)) => {
                let mut row = ParticipantRow::new(name);
                row.category = Some(role.clone());
                row.institution_type = Some(inst_type.clone());
                LineEvent::Entry(row)
            }
            _ => LineEvent::Orphan(line),
        };
        return (state, event);
    }

    if let Some(marker) = config
        .institution_types
        .iter()
        .find(|m| line.contains(m.marker.as_str()))
    {
        let next = ScanState {
            institution_type: Some(marker.code.clone()),
            ..state
        };
        return (next, LineEvent::InstitutionType(marker.code.clone()));
    }

    let upper = line.to_uppercase();
    if let Some(role) = config
        .roles
        .iter()
        .find(|r| upper.starts_with(&r.token.to_uppercase()))
    {
        let next = ScanState {
            role: Some(role.label.clone()),
            ..state
        };
        return (next, LineEvent::Role(role.label.clone()));
    }

    (state, LineEvent::Ignored)
}

/// The table extracted from one document, with what was dropped on the way.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub table: NormalizedTable,
    pub warnings: Vec<ParseWarning>,
    pub skipped_lines: Vec<SkippedLine>,
}

/// Extract numbered participant entries from page text.
///
/// Pages without text are skipped with a warning. A document that yields no
/// entries produces an empty table and a `NoRowsExtracted` warning rather
/// than an error.
pub fn extract_participants(
    name: &str,
    pages: &[PageContent],
    config: &DocumentConfig,
    subtitle_mode: SubtitleMode,
) -> ExtractedDocument {
    let mut warnings = Vec::new();
    let mut skipped_lines = Vec::new();
    let mut rows = Vec::new();
    let mut state = ScanState::default();

    for page in pages {
        if !page.has_text() {
            debug!(source = name, page = page.page_number, "page has no text");
            warnings.push(ParseWarning {
                source: name.to_string(),
                kind: WarningKind::NoExtractableText,
                reason: format!("page {} has no extractable text", page.page_number),
            });
            continue;
        }

        state = page.lines.iter().fold(state, |state, line| {
            let (next, event) = step(state, line, config);
            match event {
                LineEvent::Entry(row) => rows.push(row),
                LineEvent::Orphan(text) => skipped_lines.push(SkippedLine {
                    source: name.to_string(),
                    page_number: page.page_number,
                    line_text: text,
                    reason: "numbered entry before institution type and role headings".into(),
                }),
                LineEvent::InstitutionType(_) | LineEvent::Role(_) | LineEvent::Ignored => {}
            }
            next
        });
    }

    if rows.is_empty() {
        warn!(source = name, "no participants extracted");
        warnings.push(ParseWarning {
            source: name.to_string(),
            kind: WarningKind::NoRowsExtracted,
            reason: "no numbered participant entries found".into(),
        });
    } else if !skipped_lines.is_empty() {
        debug!(source = name, skipped = skipped_lines.len(), "orphan entries dropped");
    }

    let subtitle = document_subtitle(
        pages.iter().flat_map(|p| p.lines.iter().map(String::as_str)),
        subtitle_mode,
    );

    let columns = if rows.is_empty() {
        Vec::new()
    } else {
        DOCUMENT_COLUMNS.iter().map(|c| c.to_string()).collect()
    };

    ExtractedDocument {
        table: NormalizedTable {
            name: name.to_string(),
            subtitle,
            columns,
            rows,
        },
        warnings,
        skipped_lines,
    }
}
