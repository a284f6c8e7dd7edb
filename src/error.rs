//! Error types for bbolt-ci
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using BoltError
pub type Result<T> = std::result::Result<T, BoltError>;

/// Unified error type for bbolt-ci operations
#[derive(Debug, Error)]
pub enum BoltError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Database File Errors
    // -------------------------------------------------------------------------
    #[error("Database corruption detected: {0}")]
    Corruption(String),

    #[error("Database is locked by another handle: {}", .0.display())]
    DatabaseLocked(PathBuf),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Transaction Errors
    // -------------------------------------------------------------------------
    #[error("Transaction is not writable")]
    TxNotWritable,

    #[error("Bucket already exists: {0}")]
    BucketExists(String),

    #[error("Bucket name required")]
    BucketNameRequired,

    #[error("Key required")]
    KeyRequired,

    #[error("Key too large: {0} bytes")]
    KeyTooLarge(usize),

    #[error("Value too large: {0} bytes")]
    ValueTooLarge(usize),

    // -------------------------------------------------------------------------
    // Command-Line Errors
    // -------------------------------------------------------------------------
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),
}

impl From<bincode::Error> for BoltError {
    fn from(err: bincode::Error) -> Self {
        BoltError::Serialization(err.to_string())
    }
}
