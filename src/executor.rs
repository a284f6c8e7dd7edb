//! Transaction Executor
//!
//! Runs one `Command` as exactly one write transaction and formats its
//! result.
//!
//! ## Bucket policy
//! Every command that names a bucket first calls `ensure_bucket`, which
//! creates the bucket if it is missing. This includes `get` and
//! `list-keys`: inspecting a bucket that does not exist materializes it
//! empty. That is why every command uses a write transaction.

use std::io::Write;

use tracing::debug;

use crate::command::Command;
use crate::error::Result;
use crate::store::{Bucket, Db, Tx};

/// Printed to the error sink when `get` finds no value or an empty one
pub const EMPTY_VALUE: &str = "empty value";

/// Execute `command` against `db`
///
/// Output lines go to `out`; the `get` miss notice goes to `err`. The
/// transaction commits when the operation succeeds and is rolled back
/// otherwise. Listing commands may have written some lines before a
/// failure.
pub fn execute<O, E>(db: &mut Db, command: &Command, out: &mut O, err: &mut E) -> Result<()>
where
    O: Write,
    E: Write,
{
    debug!(command = command.name(), "executing");

    db.update(|tx| match command {
        Command::ListBuckets => {
            for name in tx.bucket_names() {
                write_line(out, name)?;
            }
            Ok(())
        }

        Command::ListKeys { bucket } => {
            let bucket = ensure_bucket(tx, bucket)?;
            for key in bucket.keys() {
                write_line(out, key)?;
            }
            Ok(())
        }

        Command::Get { bucket, key } => {
            let bucket = ensure_bucket(tx, bucket)?;
            match bucket.get(key) {
                Some(value) if !value.is_empty() => write_line(out, value),
                _ => {
                    writeln!(err, "{}", EMPTY_VALUE)?;
                    Ok(())
                }
            }
        }

        Command::Put { bucket, key, value } => ensure_bucket(tx, bucket)?.put(key, value),

        Command::Delete { bucket, key } => ensure_bucket(tx, bucket)?.delete(key),
    })
}

/// Return the named bucket, creating it empty if it does not exist yet
pub fn ensure_bucket<'tx>(tx: &'tx mut Tx<'_>, name: &[u8]) -> Result<Bucket<'tx>> {
    tx.create_bucket_if_not_exists(name)
}

fn write_line<O: Write>(out: &mut O, bytes: &[u8]) -> Result<()> {
    out.write_all(bytes)?;
    out.write_all(b"\n")?;
    Ok(())
}
