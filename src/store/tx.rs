//! Transactions and buckets
//!
//! A `Tx` works on a private copy of the database image. `commit()` writes
//! the copy back through the owning `Db`; `rollback()` or dropping the
//! transaction throws it away.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::Result;
use crate::BoltError;

use super::{Db, Image, MAX_KEY_SIZE, MAX_VALUE_SIZE};

/// A transaction over one `Db`
pub struct Tx<'db> {
    db: &'db mut Db,

    /// Working copy of the database
    image: Image,

    writable: bool,

    /// Set by any mutation; a clean transaction commits without I/O
    dirty: bool,

    /// Set by commit or rollback
    done: bool,
}

impl<'db> Tx<'db> {
    pub(crate) fn new(db: &'db mut Db, image: Image, writable: bool) -> Self {
        Self {
            db,
            image,
            writable,
            dirty: false,
            done: false,
        }
    }

    /// Id of the image this transaction started from
    pub fn id(&self) -> u64 {
        self.image.txid
    }

    /// Whether this transaction may mutate the database
    pub fn writable(&self) -> bool {
        self.writable
    }

    // =========================================================================
    // Buckets
    // =========================================================================

    /// Look up an existing bucket
    pub fn bucket(&mut self, name: &[u8]) -> Option<Bucket<'_>> {
        let entries = self.image.buckets.get_mut(name)?;
        Some(Bucket {
            entries,
            writable: self.writable,
            dirty: &mut self.dirty,
        })
    }

    /// Create a new bucket; fails if it already exists
    pub fn create_bucket(&mut self, name: &[u8]) -> Result<Bucket<'_>> {
        self.check_bucket_create(name)?;
        if self.image.buckets.contains_key(name) {
            return Err(BoltError::BucketExists(
                String::from_utf8_lossy(name).into_owned(),
            ));
        }
        Ok(self.insert_bucket(name))
    }

    /// Return the bucket, creating it empty if absent
    pub fn create_bucket_if_not_exists(&mut self, name: &[u8]) -> Result<Bucket<'_>> {
        self.check_bucket_create(name)?;
        Ok(self.insert_bucket(name))
    }

    /// Bucket names in ascending byte order
    pub fn bucket_names(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.image.buckets.keys().map(Vec::as_slice)
    }

    // =========================================================================
    // Completion
    // =========================================================================

    /// Persist the working copy
    ///
    /// Read-only and unmodified transactions finish without touching the file.
    pub fn commit(mut self) -> Result<()> {
        self.done = true;

        if !(self.writable && self.dirty) {
            debug!(txid = self.image.txid, "commit without changes");
            return Ok(());
        }

        self.image.txid += 1;
        self.db.write_image(&self.image)?;
        debug!(txid = self.image.txid, "committed transaction");
        Ok(())
    }

    /// Discard the working copy
    pub fn rollback(mut self) {
        self.done = true;
        debug!(txid = self.image.txid, dirty = self.dirty, "rolled back transaction");
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn check_bucket_create(&self, name: &[u8]) -> Result<()> {
        if !self.writable {
            return Err(BoltError::TxNotWritable);
        }
        if name.is_empty() {
            return Err(BoltError::BucketNameRequired);
        }
        Ok(())
    }

    fn insert_bucket(&mut self, name: &[u8]) -> Bucket<'_> {
        if !self.image.buckets.contains_key(name) {
            self.dirty = true;
            debug!(bucket = %String::from_utf8_lossy(name), "created bucket");
        }
        let entries = self.image.buckets.entry(name.to_vec()).or_default();
        Bucket {
            entries,
            writable: self.writable,
            dirty: &mut self.dirty,
        }
    }
}

impl Drop for Tx<'_> {
    fn drop(&mut self) {
        if !self.done {
            debug!(txid = self.image.txid, "transaction dropped without commit");
        }
    }
}

/// A bucket inside a transaction
pub struct Bucket<'tx> {
    entries: &'tx mut BTreeMap<Vec<u8>, Vec<u8>>,
    writable: bool,
    dirty: &'tx mut bool,
}

impl Bucket<'_> {
    /// Get a value by key
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Insert or overwrite a key
    pub fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        if !self.writable {
            return Err(BoltError::TxNotWritable);
        }
        if key.is_empty() {
            return Err(BoltError::KeyRequired);
        }
        if key.len() > MAX_KEY_SIZE {
            return Err(BoltError::KeyTooLarge(key.len()));
        }
        if value.len() > MAX_VALUE_SIZE {
            return Err(BoltError::ValueTooLarge(value.len()));
        }

        self.entries.insert(key.to_vec(), value.to_vec());
        *self.dirty = true;
        Ok(())
    }

    /// Remove a key; removing an absent key is a no-op
    pub fn delete(&mut self, key: &[u8]) -> Result<()> {
        if !self.writable {
            return Err(BoltError::TxNotWritable);
        }
        if self.entries.remove(key).is_some() {
            *self.dirty = true;
        }
        Ok(())
    }

    /// Keys in ascending byte order
    pub fn keys(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.entries.keys().map(Vec::as_slice)
    }

    /// Entries in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> + '_ {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_slice(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
