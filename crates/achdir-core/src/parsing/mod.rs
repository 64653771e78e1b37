pub mod document;
pub mod header;
pub mod normalize;
pub mod sheet;

use tracing::{info, warn};

use crate::config::schema::WorkbookConfig;
use crate::error::AchdirError;
use crate::extraction::WorkbookSource;
use crate::model::{ParseWarning, ParticipantDirectory, WarningKind};
use sheet::parse_sheet;

/// Load every eligible sheet of a workbook into a directory.
///
/// Malformed sheets are skipped with a warning; the load only fails when no
/// eligible sheet survives.
pub fn parse_workbook(
    source: &mut dyn WorkbookSource,
    config: &WorkbookConfig,
    source_name: &str,
) -> Result<ParticipantDirectory, AchdirError> {
    let eligible: Vec<String> = source
        .sheet_names()
        .into_iter()
        .filter(|name| config.is_eligible(name))
        .collect();

    if eligible.is_empty() {
        return Err(AchdirError::EmptySource(format!(
            "{source_name}: no sheet name matches '{}'",
            config.sheet_marker
        )));
    }

    let mut directory = ParticipantDirectory::default();
    for name in &eligible {
        let parsed = source
            .read_grid(name)
            .and_then(|grid| parse_sheet(name, &grid, config));
        match parsed {
            Ok(parsed) => {
                directory.warnings.extend(parsed.warnings);
                directory.tables.push(parsed.table);
            }
            Err(AchdirError::MalformedSheet { sheet, reason }) => {
                warn!(%sheet, %reason, "skipping malformed sheet");
                directory.warnings.push(ParseWarning {
                    source: sheet,
                    kind: WarningKind::MalformedSheet,
                    reason,
                });
            }
            Err(AchdirError::Workbook(reason)) => {
                warn!(sheet = %name, %reason, "skipping unreadable sheet");
                directory.warnings.push(ParseWarning {
                    source: name.clone(),
                    kind: WarningKind::MalformedSheet,
                    reason,
                });
            }
            Err(e) => return Err(e),
        }
    }

    if directory.tables.is_empty() {
        return Err(AchdirError::EmptySource(format!(
            "{source_name}: all {} eligible sheet(s) are malformed",
            eligible.len()
        )));
    }

    info!(
        source = source_name,
        sheets = directory.tables.len(),
        rows = directory.tables.iter().map(|t| t.rows.len()).sum::<usize>(),
        "loaded workbook"
    );
    Ok(directory)
}
