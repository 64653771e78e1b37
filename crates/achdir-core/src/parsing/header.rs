use regex::Regex;
use std::sync::LazyLock;

use crate::config::schema::SubtitleMode;
use crate::model::CellValue;

static AS_OF_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)as of\s*[:\-]?\s*([0-9]{4}-[0-9]{2}-[0-9]{2})").expect("valid as-of regex")
});

/// Build a subtitle from the metadata row of a sheet.
pub fn sheet_subtitle(metadata: &[CellValue], mode: SubtitleMode) -> String {
    let parts: Vec<String> = metadata.iter().filter_map(CellValue::as_text).collect();
    match mode {
        SubtitleMode::AsOfDate => as_of_date(&parts.join(" ")).unwrap_or_default(),
        SubtitleMode::Raw => parts.join(" • "),
    }
}

/// Build a subtitle from the first non-empty line of a document.
pub fn document_subtitle<'a>(
    mut lines: impl Iterator<Item = &'a str>,
    mode: SubtitleMode,
) -> String {
    let Some(first) = lines.find(|l| !l.trim().is_empty()) else {
        return String::new();
    };
    match mode {
        SubtitleMode::AsOfDate => as_of_date(first).unwrap_or_default(),
        SubtitleMode::Raw => first.trim().to_string(),
    }
}

/// Reduce free text to its canonical "as of YYYY-MM-DD" fragment.
pub fn as_of_date(text: &str) -> Option<String> {
    AS_OF_DATE
        .captures(text)
        .map(|caps| format!("as of {}", &caps[1]))
}
