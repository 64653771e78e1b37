pub mod builtin;
pub mod schema;

use crate::error::AchdirError;
use schema::DirectoryConfig;
use std::collections::HashSet;
use std::path::Path;

/// Load a configuration from a JSON file.
pub fn load_config(path: &Path) -> Result<DirectoryConfig, AchdirError> {
    let content = std::fs::read_to_string(path).map_err(|e| AchdirError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_config(&content, path)
}

/// Parse a configuration from a JSON string read from `source`.
pub fn parse_config(json: &str, source: &Path) -> Result<DirectoryConfig, AchdirError> {
    let config: DirectoryConfig =
        serde_json::from_str(json).map_err(|e| AchdirError::ConfigLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse a configuration from a JSON string (no file path context).
pub fn parse_config_str(json: &str) -> Result<DirectoryConfig, AchdirError> {
    let config: DirectoryConfig = serde_json::from_str(json).map_err(AchdirError::Json)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate that a configuration is well-formed.
pub fn validate_config(config: &DirectoryConfig) -> Result<(), AchdirError> {
    let wb = &config.workbook;
    if wb.sheet_marker.trim().is_empty() && wb.sheet_match != schema::SheetMatch::All {
        return Err(AchdirError::ConfigInvalid(
            "sheet_marker must not be empty unless sheet_match is 'all'".into(),
        ));
    }

    validate_columns("columns", &wb.columns)?;
    for (sheet, mapping) in &wb.sheet_columns {
        validate_columns(&format!("sheet_columns['{sheet}']"), mapping)?;
    }

    let doc = &config.document;
    if doc.institution_types.is_empty() {
        return Err(AchdirError::ConfigInvalid(
            "document.institution_types must not be empty".into(),
        ));
    }
    if doc.roles.is_empty() {
        return Err(AchdirError::ConfigInvalid(
            "document.roles must not be empty".into(),
        ));
    }
    for m in &doc.institution_types {
        if m.marker.trim().is_empty() || m.code.trim().is_empty() {
            return Err(AchdirError::ConfigInvalid(
                "institution type markers need a non-empty marker and code".into(),
            ));
        }
    }
    for r in &doc.roles {
        if r.token.trim().is_empty() || r.label.trim().is_empty() {
            return Err(AchdirError::ConfigInvalid(
                "role tokens need a non-empty token and label".into(),
            ));
        }
    }

    let mut stream_names = HashSet::new();
    for s in &doc.streams {
        if s.name.trim().is_empty() || s.file.trim().is_empty() {
            return Err(AchdirError::ConfigInvalid(
                "streams need a non-empty name and file".into(),
            ));
        }
        if !stream_names.insert(s.name.as_str()) {
            return Err(AchdirError::ConfigInvalid(format!(
                "stream '{}' is listed more than once",
                s.name
            )));
        }
    }

    for pair in &config.flag_pairs {
        if pair.sender == pair.receiver {
            return Err(AchdirError::ConfigInvalid(format!(
                "flag pair '{}' uses the same column for sender and receiver",
                pair.label
            )));
        }
    }

    Ok(())
}

fn validate_columns(context: &str, mapping: &schema::ColumnMapping) -> Result<(), AchdirError> {
    if mapping.institution.trim().is_empty() {
        return Err(AchdirError::ConfigInvalid(format!(
            "{context}: institution column must not be empty"
        )));
    }
    Ok(())
}
