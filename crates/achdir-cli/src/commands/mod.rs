pub mod config;
pub mod extract;
pub mod sheets;
pub mod streams;

use achdir_core::config::builtin::default_config;
use achdir_core::config::load_config;
use achdir_core::config::schema::DirectoryConfig;
use achdir_core::error::AchdirError;
use achdir_core::model::ParticipantDirectory;
use std::path::Path;

use crate::output;
use crate::ViewArgs;

/// The configuration from `--config`, or the built-in one.
pub fn active_config(path: Option<&Path>) -> Result<DirectoryConfig, AchdirError> {
    match path {
        Some(p) => load_config(p),
        None => default_config(),
    }
}

pub fn render(
    directory: &ParticipantDirectory,
    view: &ViewArgs,
    config: &DirectoryConfig,
) -> Result<(), AchdirError> {
    match view.output.as_str() {
        "json" => output::json::print(directory, view, config)?,
        _ => output::table::print(directory, view, config),
    }
    report_problems(directory);
    Ok(())
}

fn report_problems(directory: &ParticipantDirectory) {
    for w in &directory.warnings {
        eprintln!("  warning [{}] {}: {}", w.kind, w.source, w.reason);
    }
    if !directory.skipped_lines.is_empty() {
        eprintln!(
            "  {} numbered line(s) skipped before any section heading",
            directory.skipped_lines.len()
        );
    }
}
