//! Store Module
//!
//! Single-file, bucketed, ordered key-value store with one exclusive writer.
//!
//! ## Responsibilities
//! - Open (creating if absent) the database file with a given mode
//! - Hold an exclusive file lock for the lifetime of the handle
//! - Explicit begin / operate / commit-or-rollback transactions
//! - Atomic commit by writing a full image and renaming it into place
//!
//! ## File Format (V1)
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │ Header                                                     │
//! │ ┌──────────┬───────────┬─────────┬────────────┬──────────┐ │
//! │ │Magic (4) │Version (2)│TxId (8) │PayloadLen 8│ CRC32 (4)│ │
//! │ └──────────┴───────────┴─────────┴────────────┴──────────┘ │
//! ├────────────────────────────────────────────────────────────┤
//! │ Payload (bincode)                                          │
//! │   bucket name → ( key → value ), both ordered by bytes     │
//! └────────────────────────────────────────────────────────────┘
//! ```

mod format;
mod db;
mod tx;

pub use format::{Image, FORMAT_VERSION, HEADER_SIZE, MAGIC};
pub use db::Db;
pub use tx::{Bucket, Tx};

/// Largest key the store accepts, in bytes
pub const MAX_KEY_SIZE: usize = 32768;

/// Largest value the store accepts, in bytes
pub const MAX_VALUE_SIZE: usize = (1 << 31) - 2;
