use achdir_core::config::schema::DirectoryConfig;
use achdir_core::error::AchdirError;
use achdir_core::model::{ParseWarning, ParticipantDirectory, ParticipantRow, SkippedLine};
use achdir_core::query::{summarize, Summary};
use serde::Serialize;

use crate::ViewArgs;

#[derive(Serialize)]
struct DirectoryView<'a> {
    tables: Vec<TableView<'a>>,
    warnings: &'a [ParseWarning],
    skipped_lines: &'a [SkippedLine],
}

#[derive(Serialize)]
struct TableView<'a> {
    name: &'a str,
    subtitle: &'a str,
    columns: &'a [String],
    total: usize,
    rows: Vec<&'a ParticipantRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Summary>,
}

pub fn print(
    directory: &ParticipantDirectory,
    view: &ViewArgs,
    config: &DirectoryConfig,
) -> Result<(), AchdirError> {
    let filter = view.filter();
    let tables = directory
        .tables
        .iter()
        .map(|table| {
            let rows = filter.apply(table, config);
            let summary = view
                .summary
                .then(|| summarize(rows.iter().copied(), config));
            TableView {
                name: &table.name,
                subtitle: &table.subtitle,
                columns: &table.columns,
                total: table.len(),
                rows,
                summary,
            }
        })
        .collect();

    let json = serde_json::to_string_pretty(&DirectoryView {
        tables,
        warnings: &directory.warnings,
        skipped_lines: &directory.skipped_lines,
    })?;
    println!("{json}");
    Ok(())
}
