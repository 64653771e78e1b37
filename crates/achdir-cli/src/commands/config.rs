use achdir_core::config::builtin::default_config_json;
use achdir_core::config::load_config;
use achdir_core::error::AchdirError;
use std::path::Path;

pub fn show(config_file: Option<&Path>) -> Result<(), AchdirError> {
    match config_file {
        Some(path) => {
            let config = load_config(path)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        None => print!("{}", default_config_json()),
    }
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), AchdirError> {
    let config = load_config(file)?;
    let wb = &config.workbook;

    println!("Configuration '{}' is valid.", file.display());
    println!(
        "  Sheets: marker '{}' ({:?}), {} per-sheet column override(s)",
        wb.sheet_marker,
        wb.sheet_match,
        wb.sheet_columns.len()
    );
    println!(
        "  Documents: {} institution type marker(s), {} role token(s), {} stream(s)",
        config.document.institution_types.len(),
        config.document.roles.len(),
        config.document.streams.len()
    );

    // Warnings, not errors
    let mut warnings = Vec::new();
    for marker in &config.document.institution_types {
        if !config.institution_types.iter().any(|t| t.code == marker.code) {
            warnings.push(format!(
                "document marker '{}' maps to code '{}' which has no institution_types entry",
                marker.marker, marker.code
            ));
        }
    }
    for pair in &config.flag_pairs {
        for flag in [&pair.sender, &pair.receiver] {
            if !wb.columns.flags.contains(flag) {
                warnings.push(format!(
                    "flag pair '{}' uses column '{}' which is not a configured flag column",
                    pair.label, flag
                ));
            }
        }
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}
