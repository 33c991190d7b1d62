//! CLI command implementations.

mod display;

pub mod closure;
pub mod cycles;
pub mod dependents;
pub mod maintained;
pub mod metric;
pub mod report;
pub mod stats;

use std::path::{Path, PathBuf};

use pkgraph::{Analysis, AnalysisConfig, CONFIG_FILE_NAME, SqliteStore};
use tracing::debug;

/// Settings shared by every command.
pub struct Context {
    /// Source database
    pub database: PathBuf,
    /// Analysis configuration
    pub config: AnalysisConfig,
}

impl Context {
    /// Combine command-line options with the configuration file.
    ///
    /// An explicit `--config` must exist; the default file is optional.
    pub fn resolve(
        database: Option<PathBuf>,
        config_path: Option<PathBuf>,
    ) -> Result<Self, pkgraph::Error> {
        let config = match config_path {
            Some(path) => AnalysisConfig::load(&path)?,
            None => {
                let default_path = Path::new(CONFIG_FILE_NAME);
                if default_path.exists() {
                    debug!(path = %default_path.display(), "Using default config file");
                    AnalysisConfig::load(default_path)?
                } else {
                    AnalysisConfig::default()
                }
            }
        };

        let database = database.or_else(|| config.database.clone()).ok_or_else(|| {
            pkgraph::Error::Config(format!(
                "no database given. Pass --database or set `database` in {CONFIG_FILE_NAME}"
            ))
        })?;

        Ok(Self { database, config })
    }

    /// Open the source store read-only.
    pub fn open_store(&self) -> Result<SqliteStore, pkgraph::Error> {
        SqliteStore::open(&self.database)
    }

    /// Open the store and load an analysis snapshot.
    pub fn analysis(&self) -> Result<Analysis, pkgraph::Error> {
        let store = self.open_store()?;
        Analysis::load(&store, self.config.clone())
    }
}
