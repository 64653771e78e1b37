use achdir_core::error::AchdirError;
use achdir_core::extraction::pdftotext::PdftotextExtractor;
use achdir_core::model::ParticipantDirectory;
use std::path::PathBuf;

use super::{active_config, render};
use crate::ViewArgs;

pub fn run(
    pdf_file: PathBuf,
    config_file: Option<PathBuf>,
    name: Option<String>,
    layout: bool,
    view: &ViewArgs,
) -> Result<(), AchdirError> {
    let config = active_config(config_file.as_deref())?;

    let pdf_bytes = std::fs::read(&pdf_file).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => AchdirError::SourceMissing(pdf_file.clone()),
        _ => AchdirError::Io(e),
    })?;

    let name = name.unwrap_or_else(|| {
        pdf_file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| pdf_file.display().to_string())
    });

    let extractor = PdftotextExtractor::with_layout(layout);
    let doc = achdir_core::extract_document(&name, &pdf_bytes, &extractor, &config)?;
    render(&ParticipantDirectory::from(doc), view, &config)
}
