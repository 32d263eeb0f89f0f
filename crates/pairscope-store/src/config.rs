//! Store configuration.

use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// File name of the tick database inside the data directory.
pub const DB_FILE_NAME: &str = "tick_data.db";

/// Number of most recent ticks loaded per snapshot.
pub const DEFAULT_SNAPSHOT_LIMIT: usize = 5000;

/// Location and snapshot size of the tick store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Path to the SQLite database.
    pub path: PathBuf,
    /// Maximum number of ticks per snapshot.
    pub snapshot_limit: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
            snapshot_limit: DEFAULT_SNAPSHOT_LIMIT,
        }
    }
}

impl StoreConfig {
    /// Creates a config for the database at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            snapshot_limit: DEFAULT_SNAPSHOT_LIMIT,
        }
    }

    /// Returns the default database path.
    ///
    /// - Linux: `~/.local/share/pairscope/tick_data.db`
    /// - macOS: `~/Library/Application Support/pairscope/tick_data.db`
    /// - Windows: `C:\Users\<User>\AppData\Roaming\pairscope\data\tick_data.db`
    ///
    /// Falls back to `./tick_data.db` if no home directory can be found.
    #[must_use]
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("", "", "pairscope").map_or_else(
            || PathBuf::from(DB_FILE_NAME),
            |dirs| dirs.data_dir().join(DB_FILE_NAME),
        )
    }

    /// Sets the database path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// Sets the snapshot limit (at least one).
    #[must_use]
    pub fn with_snapshot_limit(mut self, limit: usize) -> Self {
        self.snapshot_limit = limit.max(1);
        self
    }

    /// Returns the database path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.snapshot_limit, 5000);
        assert!(config.path.ends_with(DB_FILE_NAME));
    }

    #[test]
    fn test_builders() {
        let config = StoreConfig::new("/tmp/x.db").with_snapshot_limit(0);
        assert_eq!(config.snapshot_limit, 1);
        assert_eq!(config.path(), Path::new("/tmp/x.db"));
    }
}
