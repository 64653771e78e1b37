pub mod cache;
pub mod config;
pub mod error;
pub mod extraction;
pub mod model;
pub mod parsing;
pub mod query;

use std::path::Path;

use tracing::{info, warn};

use config::schema::DirectoryConfig;
use error::AchdirError;
use extraction::workbook::CalamineWorkbook;
use extraction::{PdfExtractor, WorkbookSource};
use model::{ParseWarning, ParticipantDirectory, WarningKind};
use parsing::document::{extract_participants, ExtractedDocument};

/// Main API entry point for spreadsheets: load every eligible sheet of the
/// workbook at `path`.
///
/// The workbook file handle is closed before this returns, on success and on
/// error alike.
pub fn load_workbook(
    path: &Path,
    config: &DirectoryConfig,
) -> Result<ParticipantDirectory, AchdirError> {
    let mut workbook = CalamineWorkbook::open(path)?;
    load_tables(&mut workbook, config, &path.display().to_string())
}

/// Load every eligible sheet from an already opened workbook source.
pub fn load_tables(
    source: &mut dyn WorkbookSource,
    config: &DirectoryConfig,
    source_name: &str,
) -> Result<ParticipantDirectory, AchdirError> {
    parsing::parse_workbook(source, &config.workbook, source_name)
}

/// Extract participants from one PDF document.
///
/// A document that yields no entries is returned as an empty table with a
/// `NoRowsExtracted` warning, not as an error.
pub fn extract_document(
    name: &str,
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    config: &DirectoryConfig,
) -> Result<ExtractedDocument, AchdirError> {
    let pages = extractor.extract_pages(pdf_bytes)?;
    info!(
        source = name,
        backend = extractor.backend_name(),
        pages = pages.len(),
        "extracted document text"
    );
    Ok(extract_participants(
        name,
        &pages,
        &config.document,
        config.workbook.subtitle,
    ))
}

/// Extract every configured payment stream from the PDFs in `dir`.
///
/// Each stream's file must exist. Streams that yield no entries stay in the
/// result as empty tables; a stream whose PDF fails to extract is skipped with
/// a warning. The load only fails when no stream produced a table.
pub fn extract_streams(
    dir: &Path,
    extractor: &dyn PdfExtractor,
    config: &DirectoryConfig,
) -> Result<ParticipantDirectory, AchdirError> {
    if config.document.streams.is_empty() {
        return Err(AchdirError::EmptySource(
            "no payment streams configured".into(),
        ));
    }

    let mut directory = ParticipantDirectory::default();
    for stream in &config.document.streams {
        let path = dir.join(&stream.file);
        let bytes = std::fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AchdirError::SourceMissing(path.clone())
            } else {
                AchdirError::Io(e)
            }
        })?;
        match extract_document(&stream.name, &bytes, extractor, config) {
            Ok(doc) => directory.push_document(doc),
            Err(e @ (AchdirError::Extraction(_) | AchdirError::PdftotextFailed { .. })) => {
                warn!(stream = %stream.name, error = %e, "skipping stream that failed to extract");
                directory.warnings.push(ParseWarning {
                    source: stream.name.clone(),
                    kind: WarningKind::ExtractionFailed,
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    if directory.tables.is_empty() {
        return Err(AchdirError::EmptySource(format!(
            "{}: all {} stream(s) failed to extract",
            dir.display(),
            config.document.streams.len()
        )));
    }

    Ok(directory)
}
