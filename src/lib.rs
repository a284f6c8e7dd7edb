//! # bbolt-ci
//!
//! A command-line tool for a local, single-file, bucketed key-value store:
//! - One database file under `$HOME/.config/bbolt-ci`
//! - Named buckets of ordered byte keys
//! - Exactly one transaction per invocation
//! - Exclusive file lock held while the database is open
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  CLI (bbolt-ci binary)                       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  Config resolved once
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   Dispatcher                                 │
//! │             (install | one command)                          │
//! └──────────┬──────────────────────────────┬───────────────────┘
//!            │                              │
//!            ▼                              ▼
//!   ┌─────────────────┐           ┌──────────────────┐
//!   │     Setup       │           │    Executor      │
//!   │   (install)     │           │ (ensure_bucket)  │
//!   └────────┬────────┘           └────────┬─────────┘
//!            │                             │
//!            └──────────────┬──────────────┘
//!                           ▼
//!                   ┌───────────────┐
//!                   │  Store (Db)   │
//!                   │  Tx / Bucket  │
//!                   └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod path;
pub mod config;

pub mod store;
pub mod command;
pub mod executor;
pub mod setup;
pub mod dispatch;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{BoltError, Result};
pub use config::Config;
pub use command::{Command, Request};
pub use store::Db;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of bbolt-ci
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
