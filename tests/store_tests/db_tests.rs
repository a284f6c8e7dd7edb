//! Tests for the database handle
//!
//! These tests verify:
//! - Open creates and initializes a new file
//! - Data persists across close/reopen
//! - Exclusive locking between handles
//! - Corrupt files are rejected
//! - File modes on creation
//! - update/view commit and rollback behavior

use std::fs;
use std::path::PathBuf;

use bboltci::store::{Db, Image, MAGIC};
use bboltci::BoltError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_db_path() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("test.bbolt");
    (temp_dir, path)
}

fn put(db: &mut Db, bucket: &[u8], key: &[u8], value: &[u8]) {
    db.update(|tx| tx.create_bucket_if_not_exists(bucket)?.put(key, value))
        .unwrap();
}

fn get(db: &mut Db, bucket: &[u8], key: &[u8]) -> Option<Vec<u8>> {
    db.view(|tx| Ok(tx.bucket(bucket).and_then(|b| b.get(key).map(<[u8]>::to_vec))))
        .unwrap()
}

// =============================================================================
// Open / Close Tests
// =============================================================================

#[test]
fn test_open_creates_initialized_file() {
    let (_temp, path) = setup_temp_db_path();

    let db = Db::open(&path, 0o600).unwrap();
    assert_eq!(db.path(), path.as_path());
    db.close().unwrap();

    let bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[0..4], MAGIC);

    let image = Image::decode(&bytes).unwrap();
    assert_eq!(image.txid, 0);
    assert!(image.buckets.is_empty());
}

#[test]
fn test_open_missing_directory_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing").join("test.bbolt");

    match Db::open(&path, 0o600) {
        Err(BoltError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        Err(e) => panic!("expected NotFound, got {}", e),
        Ok(_) => panic!("expected NotFound, got an open handle"),
    }
}

#[test]
fn test_reopen_existing_file() {
    let (_temp, path) = setup_temp_db_path();

    let mut db = Db::open(&path, 0o600).unwrap();
    put(&mut db, b"b", b"k", b"v");
    db.close().unwrap();

    let mut db = Db::open(&path, 0o600).unwrap();
    assert_eq!(get(&mut db, b"b", b"k"), Some(b"v".to_vec()));
    db.close().unwrap();
}

#[test]
fn test_open_rejects_corrupt_file() {
    let (_temp, path) = setup_temp_db_path();
    fs::write(&path, b"this is not a database file at all").unwrap();

    match Db::open(&path, 0o600) {
        Err(BoltError::Corruption(_)) => {}
        Err(e) => panic!("expected corruption, got {}", e),
        Ok(_) => panic!("expected corruption, got an open handle"),
    }
}

#[test]
fn test_open_initializes_empty_existing_file() {
    let (_temp, path) = setup_temp_db_path();
    fs::write(&path, b"").unwrap();

    let db = Db::open(&path, 0o600).unwrap();
    db.close().unwrap();

    assert!(Image::decode(&fs::read(&path).unwrap()).is_ok());
}

#[cfg(unix)]
#[test]
fn test_open_applies_mode_to_new_file() {
    use std::os::unix::fs::PermissionsExt;

    let (_temp, path) = setup_temp_db_path();

    Db::open(&path, 0o600).unwrap().close().unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode & !0o600, 0);
    assert_ne!(mode & 0o400, 0);
}

#[cfg(unix)]
#[test]
fn test_read_mode_still_allows_writes_on_new_file() {
    use std::os::unix::fs::PermissionsExt;

    let (_temp, path) = setup_temp_db_path();

    let mut db = Db::open(&path, 0o400).unwrap();
    put(&mut db, b"b", b"k", b"v");
    assert_eq!(get(&mut db, b"b", b"k"), Some(b"v".to_vec()));
    db.close().unwrap();

    // commit keeps the permissions of the file it replaced
    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o400);
}

// =============================================================================
// Locking Tests
// =============================================================================

#[test]
fn test_second_handle_is_locked_out() {
    let (_temp, path) = setup_temp_db_path();

    let db = Db::open(&path, 0o600).unwrap();

    match Db::open(&path, 0o600) {
        Err(BoltError::DatabaseLocked(p)) => assert_eq!(p, path),
        Err(e) => panic!("expected lock error, got {}", e),
        Ok(_) => panic!("expected lock error, got a second handle"),
    }

    db.close().unwrap();
    Db::open(&path, 0o600).unwrap().close().unwrap();
}

#[test]
fn test_lock_survives_commit() {
    let (_temp, path) = setup_temp_db_path();

    let mut db = Db::open(&path, 0o600).unwrap();
    put(&mut db, b"b", b"k", b"v");

    assert!(matches!(
        Db::open(&path, 0o600),
        Err(BoltError::DatabaseLocked(_))
    ));

    db.close().unwrap();
}

#[test]
fn test_open_follows_replaced_file() {
    let (temp, path) = setup_temp_db_path();

    let mut db = Db::open(&path, 0o600).unwrap();
    put(&mut db, b"b", b"k", b"old");
    db.close().unwrap();

    // another writer's commit renames a fresh image over the path
    let replacement = temp.path().join("replacement.bbolt");
    let mut db = Db::open(&replacement, 0o600).unwrap();
    put(&mut db, b"b", b"k", b"new");
    db.close().unwrap();
    fs::rename(&replacement, &path).unwrap();

    let mut db = Db::open(&path, 0o600).unwrap();
    assert_eq!(get(&mut db, b"b", b"k"), Some(b"new".to_vec()));
    put(&mut db, b"b", b"k2", b"v");
    db.close().unwrap();

    let mut db = Db::open(&path, 0o600).unwrap();
    assert_eq!(get(&mut db, b"b", b"k"), Some(b"new".to_vec()));
    assert_eq!(get(&mut db, b"b", b"k2"), Some(b"v".to_vec()));
    db.close().unwrap();
}

#[test]
fn test_drop_releases_lock() {
    let (_temp, path) = setup_temp_db_path();

    {
        let _db = Db::open(&path, 0o600).unwrap();
    }

    Db::open(&path, 0o600).unwrap().close().unwrap();
}

// =============================================================================
// update / view Tests
// =============================================================================

#[test]
fn test_update_error_rolls_back() {
    let (_temp, path) = setup_temp_db_path();
    let mut db = Db::open(&path, 0o600).unwrap();

    let result: bboltci::Result<()> = db.update(|tx| {
        tx.create_bucket(b"doomed")?.put(b"k", b"v")?;
        Err(BoltError::KeyRequired)
    });
    assert!(matches!(result, Err(BoltError::KeyRequired)));

    let names = db
        .view(|tx| Ok(tx.bucket_names().map(<[u8]>::to_vec).collect::<Vec<_>>()))
        .unwrap();
    assert!(names.is_empty());
    db.close().unwrap();
}

#[test]
fn test_update_returns_closure_value() {
    let (_temp, path) = setup_temp_db_path();
    let mut db = Db::open(&path, 0o600).unwrap();

    let count = db
        .update(|tx| {
            let mut bucket = tx.create_bucket(b"b")?;
            bucket.put(b"1", b"a")?;
            bucket.put(b"2", b"b")?;
            Ok(bucket.len())
        })
        .unwrap();

    assert_eq!(count, 2);
    db.close().unwrap();
}

#[test]
fn test_view_rejects_writes() {
    let (_temp, path) = setup_temp_db_path();
    let mut db = Db::open(&path, 0o600).unwrap();

    let result = db.view(|tx| tx.create_bucket(b"b").map(|_| ()));
    assert!(matches!(result, Err(BoltError::TxNotWritable)));
    db.close().unwrap();
}

#[test]
fn test_commit_leaves_no_temp_file() {
    let (temp, path) = setup_temp_db_path();
    let mut db = Db::open(&path, 0o600).unwrap();

    put(&mut db, b"b", b"k", b"v");
    db.close().unwrap();

    let entries: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("test.bbolt")]);
}

#[test]
fn test_commit_increments_txid() {
    let (_temp, path) = setup_temp_db_path();
    let mut db = Db::open(&path, 0o600).unwrap();

    put(&mut db, b"b", b"k1", b"v");
    put(&mut db, b"b", b"k2", b"v");
    db.close().unwrap();

    let image = Image::decode(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(image.txid, 2);
}
