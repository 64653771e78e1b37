use achdir_core::cache::LoadCache;
use achdir_core::config::schema::DirectoryConfig;
use achdir_core::error::AchdirError;
use achdir_core::model::ParticipantDirectory;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::{active_config, render};
use crate::ViewArgs;

pub fn run(
    workbook: PathBuf,
    config_file: Option<PathBuf>,
    sheet: Option<&str>,
    view: &ViewArgs,
    watch: Option<u64>,
) -> Result<(), AchdirError> {
    let config = active_config(config_file.as_deref())?;
    let mut cache: LoadCache<ParticipantDirectory> = LoadCache::new();
    let load = |p: &Path| achdir_core::load_workbook(p, &config);

    let Some(secs) = watch else {
        let directory = cache.get_or_load(&workbook, load)?;
        return show(&directory, sheet, view, &config);
    };

    // First load must succeed; later failures keep the last good directory.
    let mut shown = cache.get_or_load(&workbook, load)?;
    show(&shown, sheet, view, &config)?;
    info!(path = %workbook.display(), interval_secs = secs, "watching workbook");

    loop {
        std::thread::sleep(Duration::from_secs(secs.max(1)));
        match cache.get_or_load(&workbook, load) {
            Ok(current) if !Arc::ptr_eq(&current, &shown) => {
                info!(path = %workbook.display(), "workbook changed, reloaded");
                show(&current, sheet, view, &config)?;
                shown = current;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(path = %workbook.display(), error = %e, "reload failed, keeping previous data")
            }
        }
    }
}

fn show(
    directory: &ParticipantDirectory,
    sheet: Option<&str>,
    view: &ViewArgs,
    config: &DirectoryConfig,
) -> Result<(), AchdirError> {
    let Some(name) = sheet else {
        return render(directory, view, config);
    };

    let table = directory.get(name).ok_or_else(|| {
        AchdirError::EmptySource(format!(
            "no eligible sheet named '{name}' (available: {})",
            directory.names().join(", ")
        ))
    })?;
    let selected = ParticipantDirectory {
        tables: vec![table.clone()],
        warnings: directory
            .warnings
            .iter()
            .filter(|w| w.source == name)
            .cloned()
            .collect(),
        skipped_lines: Vec::new(),
    };
    render(&selected, view, config)
}
