use achdir_core::error::AchdirError;
use achdir_core::extraction::pdftotext::PdftotextExtractor;
use std::path::PathBuf;

use super::{active_config, render};
use crate::ViewArgs;

pub fn run(
    dir: PathBuf,
    config_file: Option<PathBuf>,
    layout: bool,
    view: &ViewArgs,
) -> Result<(), AchdirError> {
    let config = active_config(config_file.as_deref())?;
    if !dir.is_dir() {
        return Err(AchdirError::SourceMissing(dir));
    }

    let extractor = PdftotextExtractor::with_layout(layout);
    let directory = achdir_core::extract_streams(&dir, &extractor, &config)?;

    if directory.has_no_rows() {
        eprintln!("No participants found in {}", dir.display());
    }
    render(&directory, view, &config)
}
