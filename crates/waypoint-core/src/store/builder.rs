//! Builder for creating and configuring PlanStore instances.

use std::path::{Path, PathBuf};

use tokio::task;

use super::{DocumentDir, PlanStore};
use crate::error::{PlanError, Result};

/// Builder for creating and configuring PlanStore instances.
#[derive(Debug, Clone, Default)]
pub struct PlanStoreBuilder {
    directory: Option<PathBuf>,
}

impl PlanStoreBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom plan directory.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/waypoint/plans` or `~/.local/share/waypoint/plans`
    pub fn with_directory<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.directory = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Builds the store, creating the directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::XdgDirectory` if no default directory can be found
    /// Returns `PlanError::FileSystem` if the directory cannot be created
    pub async fn build(self) -> Result<PlanStore> {
        let directory = match self.directory {
            Some(path) => path,
            None => Self::default_directory()?,
        };

        let root = directory.clone();
        task::spawn_blocking(move || DocumentDir::open(&root).map(|_| ()))
            .await
            .map_err(PlanError::join)??;

        Ok(PlanStore::new(directory))
    }

    /// Returns the default plan directory following XDG Base Directory
    /// specification.
    fn default_directory() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("waypoint")
            .create_data_directory("plans")
            .map_err(|e| PlanError::XdgDirectory(e.to_string()))
    }
}
