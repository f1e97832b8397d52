//! Shared store of loaded reference tables
//!
//! Tables are loaded once per (measure, sex) selection and handed out as
//! shared immutable references; concurrent chart requests can read the same
//! table without synchronization.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::config::TableLoaderConfig;
use crate::error::{GrowthError, Result};
use crate::models::{Measure, ReferenceTable, Sex};
use crate::registry::TableSource;
use crate::registry::who::WhoTableSource;
use crate::utils::progress::create_progress_bar;

/// Caching store for reference tables, one per (measure, sex) combination
pub struct TableStore {
    base_path: PathBuf,
    config: TableLoaderConfig,
    tables: RwLock<FxHashMap<(Measure, Sex), Arc<ReferenceTable>>>,
}

impl TableStore {
    /// Create a store reading tables from `base_path`
    #[must_use]
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self::with_config(base_path, TableLoaderConfig::default())
    }

    /// Create a store with an explicit loader configuration
    #[must_use]
    pub fn with_config(base_path: impl Into<PathBuf>, config: TableLoaderConfig) -> Self {
        Self {
            base_path: base_path.into(),
            config,
            tables: RwLock::new(FxHashMap::default()),
        }
    }

    /// Directory the store reads tables from
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Get the table for a (measure, sex) selection, loading it on first use
    ///
    /// Two concurrent callers may race to load the same table; both end up
    /// with an equivalent immutable instance.
    pub fn table(&self, measure: Measure, sex: Sex) -> Result<Arc<ReferenceTable>> {
        if let Some(table) = self
            .tables
            .read()
            .map_err(|_| lock_error())?
            .get(&(measure, sex))
        {
            return Ok(table.clone());
        }

        let source = WhoTableSource::with_config(measure, sex, self.config.clone());
        let table = Arc::new(source.load(&self.base_path)?);
        self.tables
            .write()
            .map_err(|_| lock_error())?
            .insert((measure, sex), table.clone());
        Ok(table)
    }

    /// Number of tables currently loaded
    pub fn loaded_count(&self) -> Result<usize> {
        Ok(self.tables.read().map_err(|_| lock_error())?.len())
    }

    /// Warm the cache for every (measure, sex) combination in parallel
    ///
    /// Combinations whose table file is absent are skipped with a warning;
    /// malformed tables still fail the whole warm-up. Returns the number of
    /// tables loaded.
    pub fn load_all(&self) -> Result<usize> {
        let combos: Vec<(Measure, Sex)> = Measure::ALL
            .iter()
            .flat_map(|&measure| [(measure, Sex::Male), (measure, Sex::Female)])
            .collect();

        let pb = create_progress_bar(combos.len() as u64, Some("Loading reference tables"));
        let outcomes: Vec<Result<bool>> = combos
            .par_iter()
            .map(|&(measure, sex)| {
                let outcome = match self.table(measure, sex) {
                    Ok(_) => Ok(true),
                    Err(GrowthError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                        log::warn!("No reference table for {measure} ({sex}): {e}");
                        Ok(false)
                    }
                    Err(e) => Err(e),
                };
                pb.inc(1);
                outcome
            })
            .collect();
        pb.finish_and_clear();

        let mut loaded = 0;
        for outcome in outcomes {
            if outcome? {
                loaded += 1;
            }
        }
        log::info!(
            "Loaded {loaded} reference tables from {}",
            self.base_path.display()
        );
        Ok(loaded)
    }
}

fn lock_error() -> GrowthError {
    GrowthError::Other(anyhow::anyhow!("reference table cache lock poisoned"))
}
