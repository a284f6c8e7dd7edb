//! Setup
//!
//! `install` prepares the tool directory and the database file. Running it
//! again is harmless.

use std::fs::{self, DirBuilder};
use std::io;

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::store::Db;

/// Ensure the tool directory and database exist
///
/// Steps:
/// 1. Require `config_dir` to exist (its absence is a `NotFound` I/O error)
/// 2. Create `app_dir` with `install_mode` if absent
/// 3. Open the database with `install_mode` and close it again
pub fn install(config: &Config) -> Result<()> {
    fs::metadata(&config.config_dir)?;

    match fs::metadata(&config.app_dir) {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            dir_builder(config.install_mode).create(&config.app_dir)?;
            info!(path = %config.app_dir.display(), "created tool directory");
        }
        Err(e) => return Err(e.into()),
    }

    Db::open(&config.db_path, config.install_mode)?.close()?;
    info!(path = %config.db_path.display(), "database ready");
    Ok(())
}

fn dir_builder(mode: u32) -> DirBuilder {
    let mut builder = DirBuilder::new();

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    builder
}
