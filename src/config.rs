//! Configuration for bbolt-ci
//!
//! All paths are resolved once at startup and passed down, so nothing
//! below the binary reads the environment on its own.

use std::path::{Path, PathBuf};

use crate::path::{self, APP_DIR_TEMPLATE, CONFIG_DIR_TEMPLATE, DB_PATH_TEMPLATE};

/// Owner read only. Used when opening the database for commands.
pub const OPEN_MODE: u32 = 0o400;

/// Owner read/write/execute. Used by `install` for the directory and file.
pub const INSTALL_MODE: u32 = 0o700;

/// Resolved configuration for one invocation
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Filesystem Layout
    // -------------------------------------------------------------------------
    /// Base configuration directory (must already exist for `install`)
    pub config_dir: PathBuf,

    /// Directory owned by this tool:
    ///   {config_dir}/
    ///     └── bbolt-ci/
    ///           └── local.bbolt
    pub app_dir: PathBuf,

    /// Database file every command opens
    pub db_path: PathBuf,

    // -------------------------------------------------------------------------
    // Permissions
    // -------------------------------------------------------------------------
    /// Mode advertised when commands open the database
    pub open_mode: u32,

    /// Mode used by `install` for the app directory and database file
    pub install_mode: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

impl Config {
    /// Resolve the default templates against the process environment
    pub fn from_env() -> Self {
        Self {
            config_dir: path::expand_path(CONFIG_DIR_TEMPLATE),
            app_dir: path::expand_path(APP_DIR_TEMPLATE),
            db_path: path::expand_path(DB_PATH_TEMPLATE),
            open_mode: OPEN_MODE,
            install_mode: INSTALL_MODE,
        }
    }

    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Get the database path
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Root every default path at `home` instead of `$HOME`
    pub fn home(mut self, home: impl AsRef<Path>) -> Self {
        let home = home.as_ref().to_string_lossy().into_owned();
        let lookup = |name: &str| (name == "HOME").then(|| home.clone());

        self.config.config_dir = PathBuf::from(path::expand_with(CONFIG_DIR_TEMPLATE, lookup));
        self.config.app_dir = PathBuf::from(path::expand_with(APP_DIR_TEMPLATE, lookup));
        self.config.db_path = PathBuf::from(path::expand_with(DB_PATH_TEMPLATE, lookup));
        self
    }

    /// Set the base configuration directory
    pub fn config_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.config_dir = path.into();
        self
    }

    /// Set the tool's own directory
    pub fn app_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.app_dir = path.into();
        self
    }

    /// Set the database file path
    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.db_path = path.into();
        self
    }

    /// Set the mode used when commands open the database
    pub fn open_mode(mut self, mode: u32) -> Self {
        self.config.open_mode = mode;
        self
    }

    /// Set the mode used by `install`
    pub fn install_mode(mut self, mode: u32) -> Self {
        self.config.install_mode = mode;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
