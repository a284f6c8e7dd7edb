//! Command definitions
//!
//! What the dispatcher can ask for. Every variant except `Install` runs as
//! one transaction against an open database.

/// Bucket used when `--bucket` is not given
pub const DEFAULT_BUCKET: &str = "default";

/// A single store operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List every bucket name
    ListBuckets,

    /// List every key in a bucket
    ListKeys { bucket: Vec<u8> },

    /// Get a value by key
    Get { bucket: Vec<u8>, key: Vec<u8> },

    /// Put a key-value pair
    Put {
        bucket: Vec<u8>,
        key: Vec<u8>,
        value: Vec<u8>,
    },

    /// Delete a key
    Delete { bucket: Vec<u8>, key: Vec<u8> },
}

impl Command {
    /// Bucket the command refers to, if any
    pub fn bucket(&self) -> Option<&[u8]> {
        match self {
            Command::ListBuckets => None,
            Command::ListKeys { bucket }
            | Command::Get { bucket, .. }
            | Command::Put { bucket, .. }
            | Command::Delete { bucket, .. } => Some(bucket),
        }
    }

    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::ListBuckets => "list",
            Command::ListKeys { .. } => "bucket list-keys",
            Command::Get { .. } => "get",
            Command::Put { .. } => "put",
            Command::Delete { .. } => "delete",
        }
    }
}

/// Everything the binary can dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Create the tool directory and database file
    Install,

    /// Run one store operation
    Command(Command),
}
