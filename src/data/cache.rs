use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use crate::error::DataLoadError;

use super::loader::load_file;
use super::model::CompanyTable;

/// Load-once holder for the companies table.
///
/// The first successful load wins and is shared read-only for the rest of
/// the process. A failed load leaves the cache empty so another file can be
/// tried.
#[derive(Debug, Default)]
pub struct DatasetCache {
    slot: OnceLock<(PathBuf, Arc<CompanyTable>)>,
}

impl DatasetCache {
    pub const fn new() -> Self {
        Self {
            slot: OnceLock::new(),
        }
    }

    /// The process-wide cache.
    pub fn global() -> &'static DatasetCache {
        static GLOBAL: DatasetCache = DatasetCache::new();
        &GLOBAL
    }

    /// Table already loaded, if any.
    pub fn get(&self) -> Option<Arc<CompanyTable>> {
        self.slot.get().map(|(_, table)| Arc::clone(table))
    }

    /// Return the cached table for `path`, loading it on first use.
    pub fn get_or_load(&self, path: &Path) -> Result<Arc<CompanyTable>, DataLoadError> {
        if let Some((loaded, table)) = self.slot.get() {
            if loaded == path {
                return Ok(Arc::clone(table));
            }
            return Err(DataLoadError::AlreadyLoaded {
                loaded: loaded.clone(),
                requested: path.to_path_buf(),
            });
        }

        let table = Arc::new(load_file(path)?);
        let (loaded, cached) = self.slot.get_or_init(|| (path.to_path_buf(), table));
        if loaded != path {
            return Err(DataLoadError::AlreadyLoaded {
                loaded: loaded.clone(),
                requested: path.to_path_buf(),
            });
        }
        Ok(Arc::clone(cached))
    }
}
