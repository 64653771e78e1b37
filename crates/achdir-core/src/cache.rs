use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use tracing::debug;

use crate::error::AchdirError;

struct CacheEntry<T> {
    modified: SystemTime,
    value: Arc<T>,
}

/// Load results keyed by source path and modification time.
///
/// Owned by the caller and passed to whatever re-renders. A load that fails
/// leaves the previous entry for that path untouched.
pub struct LoadCache<T> {
    entries: HashMap<PathBuf, CacheEntry<T>>,
}

impl<T> LoadCache<T> {
    pub fn new() -> Self {
        LoadCache {
            entries: HashMap::new(),
        }
    }

    /// Return the cached value for `path` if its mtime is unchanged, otherwise
    /// run `load` and cache the result.
    pub fn get_or_load<F>(&mut self, path: &Path, load: F) -> Result<Arc<T>, AchdirError>
    where
        F: FnOnce(&Path) -> Result<T, AchdirError>,
    {
        let modified = source_mtime(path)?;

        if let Some(entry) = self.entries.get(path) {
            if entry.modified == modified {
                debug!(path = %path.display(), "cache hit");
                return Ok(Arc::clone(&entry.value));
            }
        }

        debug!(path = %path.display(), "cache miss, loading");
        let value = Arc::new(load(path)?);
        self.entries.insert(
            path.to_path_buf(),
            CacheEntry {
                modified,
                value: Arc::clone(&value),
            },
        );
        Ok(value)
    }

    /// The cached value for `path`, regardless of whether it is stale.
    pub fn peek(&self, path: &Path) -> Option<Arc<T>> {
        self.entries.get(path).map(|e| Arc::clone(&e.value))
    }

    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(path).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for LoadCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn source_mtime(path: &Path) -> Result<SystemTime, AchdirError> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AchdirError::SourceMissing(path.to_path_buf())
        } else {
            AchdirError::Io(e)
        }
    })?;
    Ok(metadata.modified()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io::Write;
    use std::time::Duration;

    fn touch(file: &tempfile::NamedTempFile, offset_secs: u64) {
        file.as_file()
            .set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000 + offset_secs))
            .unwrap();
    }

    #[test]
    fn test_unchanged_source_loads_once() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "v1").unwrap();
        touch(&file, 0);

        let calls = Cell::new(0);
        let mut cache = LoadCache::new();
        let load = |p: &Path| -> Result<String, AchdirError> {
            calls.set(calls.get() + 1);
            Ok(std::fs::read_to_string(p)?)
        };

        let first = cache.get_or_load(file.path(), load).unwrap();
        let second = cache.get_or_load(file.path(), load).unwrap();
        assert_eq!(calls.get(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_changed_mtime_reloads() {
        let file = tempfile::NamedTempFile::new().unwrap();
        touch(&file, 0);

        let mut cache = LoadCache::new();
        let a = cache.get_or_load(file.path(), |_| Ok(1)).unwrap();
        touch(&file, 60);
        let b = cache.get_or_load(file.path(), |_| Ok(2)).unwrap();
        assert_eq!((*a, *b), (1, 2));
        assert_eq!(*cache.peek(file.path()).unwrap(), 2);
    }

    #[test]
    fn test_failed_reload_keeps_previous_entry() {
        let file = tempfile::NamedTempFile::new().unwrap();
        touch(&file, 0);

        let mut cache = LoadCache::new();
        cache.get_or_load(file.path(), |_| Ok("good")).unwrap();
        touch(&file, 60);
        let err = cache
            .get_or_load(file.path(), |_| {
                Err(AchdirError::EmptySource("no sheets".into()))
            })
            .unwrap_err();
        assert!(matches!(err, AchdirError::EmptySource(_)));
        assert_eq!(*cache.peek(file.path()).unwrap(), "good");
    }

    #[test]
    fn test_missing_source() {
        let mut cache: LoadCache<()> = LoadCache::new();
        let err = cache
            .get_or_load(Path::new("/nonexistent/ACHdata.xlsx"), |_| Ok(()))
            .unwrap_err();
        assert!(matches!(err, AchdirError::SourceMissing(_)));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut cache = LoadCache::new();
        cache.get_or_load(file.path(), |_| Ok(())).unwrap();
        assert!(cache.invalidate(file.path()));
        assert!(!cache.invalidate(file.path()));
        assert!(cache.is_empty());
    }
}
