//! Database handle
//!
//! Owns the open file and its exclusive lock. Transactions borrow the
//! handle mutably, so at most one is active at a time.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::error::Result;
use crate::BoltError;

use super::{Image, Tx};

/// Reopen attempts when commits keep replacing the file during `open`
const MAX_OPEN_ATTEMPTS: u32 = 8;

/// An open database file
pub struct Db {
    /// Path the handle was opened with
    path: PathBuf,

    /// Locked file currently at `path`
    file: File,

    /// Set once `close()` has released the lock
    closed: bool,
}

impl Db {
    /// Open the database at `path`, creating it with `mode` if absent
    ///
    /// Steps:
    /// 1. Open read/write (creating with `mode`)
    /// 2. Take the exclusive lock, failing fast if another handle holds it
    /// 3. Reopen if a commit renamed a new file over `path` in between
    /// 4. Initialize an empty file, or validate an existing one
    ///
    /// The descriptor is always read/write, so write transactions work even
    /// when `mode` only grants owner read on a freshly created file.
    pub fn open(path: impl AsRef<Path>, mode: u32) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let mut file = open_locked(&path, mode)?;

        if file.metadata()?.len() == 0 {
            file.write_all(&Image::default().encode()?)?;
            file.sync_all()?;
            debug!(path = %path.display(), "initialized new database");
        } else {
            let image = read_image(&mut file)?;
            debug!(path = %path.display(), txid = image.txid, "opened database");
        }

        Ok(Self {
            path,
            file,
            closed: false,
        })
    }

    /// Begin a transaction over the current contents
    pub fn begin(&mut self, writable: bool) -> Result<Tx<'_>> {
        let image = read_image(&mut self.file)?;
        debug!(txid = image.txid, writable, "begin transaction");
        Ok(Tx::new(self, image, writable))
    }

    /// Run `f` in a write transaction; commit on `Ok`, roll back on `Err`
    pub fn update<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Tx<'_>) -> Result<T>,
    {
        let mut tx = self.begin(true)?;
        match f(&mut tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(e) => {
                tx.rollback();
                Err(e)
            }
        }
    }

    /// Run `f` in a read-only transaction
    pub fn view<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Tx<'_>) -> Result<T>,
    {
        let mut tx = self.begin(false)?;
        let result = f(&mut tx);
        tx.rollback();
        result
    }

    /// Sync and release the file and its lock
    pub fn close(mut self) -> Result<()> {
        self.file.sync_all()?;
        self.file.unlock()?;
        self.closed = true;
        debug!(path = %self.path.display(), "closed database");
        Ok(())
    }

    /// Get the database path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the file contents with `image`
    ///
    /// The image goes to `<path>.tmp` (same permissions as the live file),
    /// is synced, then renamed over `path`. The handle swaps to the new file
    /// so the lock stays held across the rename.
    pub(crate) fn write_image(&mut self, image: &Image) -> Result<()> {
        let bytes = image.encode()?;
        let tmp_path = temp_path(&self.path);
        let permissions = self.file.metadata()?.permissions();

        match fs::remove_file(&tmp_path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e.into()),
            _ => {}
        }

        let written = (|| -> Result<File> {
            let mut tmp = OpenOptions::new()
                .read(true)
                .write(true)
                .create_new(true)
                .open(&tmp_path)?;
            lock_exclusive(&tmp, &tmp_path)?;
            tmp.write_all(&bytes)?;
            tmp.sync_all()?;
            tmp.set_permissions(permissions)?;
            fs::rename(&tmp_path, &self.path)?;
            Ok(tmp)
        })();

        match written {
            Ok(tmp) => {
                // Dropping the old descriptor releases the lock on the old inode.
                let _old = std::mem::replace(&mut self.file, tmp);
                debug!(txid = image.txid, bytes = bytes.len(), "wrote database image");
                Ok(())
            }
            Err(e) => {
                let _ = fs::remove_file(&tmp_path);
                Err(e)
            }
        }
    }
}

impl Drop for Db {
    fn drop(&mut self) {
        if !self.closed {
            let _ = self.file.unlock();
            debug!(path = %self.path.display(), "released database without close");
        }
    }
}

// =============================================================================
// Private Helpers
// =============================================================================

fn open_options(mode: u32) -> OpenOptions {
    let mut options = OpenOptions::new();
    options.read(true).write(true).create(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    options
}

/// Open and lock the file currently at `path`
///
/// A descriptor opened just before another handle's commit points at the
/// replaced inode; locking it would read stale data. Retry until the locked
/// file is the one at `path`.
fn open_locked(path: &Path, mode: u32) -> Result<File> {
    for attempt in 1..=MAX_OPEN_ATTEMPTS {
        let file = open_options(mode).open(path)?;
        lock_exclusive(&file, path)?;

        if is_current(&file, path)? {
            return Ok(file);
        }
        debug!(path = %path.display(), attempt, "database replaced while locking, reopening");
    }
    Err(BoltError::DatabaseLocked(path.to_path_buf()))
}

/// Whether `file` is still the file linked at `path`
#[cfg(unix)]
fn is_current(file: &File, path: &Path) -> Result<bool> {
    use std::os::unix::fs::MetadataExt;

    let held = file.metadata()?;
    match fs::metadata(path) {
        Ok(linked) => Ok(held.dev() == linked.dev() && held.ino() == linked.ino()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

#[cfg(not(unix))]
fn is_current(_file: &File, _path: &Path) -> Result<bool> {
    Ok(true)
}

fn lock_exclusive(file: &File, path: &Path) -> Result<()> {
    file.try_lock_exclusive().map_err(|e| {
        if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() {
            BoltError::DatabaseLocked(path.to_path_buf())
        } else {
            BoltError::Io(e)
        }
    })
}

fn read_image(file: &mut File) -> Result<Image> {
    file.seek(SeekFrom::Start(0))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Image::decode(&bytes)
}

/// "local.bbolt" → "local.bbolt.tmp"
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
