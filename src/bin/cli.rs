//! bbolt-ci CLI
//!
//! Command-line interface for the local bbolt-ci database.

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;

use bboltci::command::{Command, Request, DEFAULT_BUCKET};
use bboltci::{dispatch, BoltError, Config};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

/// bbolt-ci CLI
#[derive(Parser, Debug)]
#[command(name = "bbolt-ci")]
#[command(about = "Inspect and edit the local bbolt-ci key-value database")]
#[command(version)]
struct Args {
    /// Database file (default: $HOME/.config/bbolt-ci/local.bbolt)
    ///
    /// A missing file is created owner-read-only (0400), as commands open
    /// with read mode; run `chmod u+w` on it before a later non-root run.
    /// Use `install` for the default path, which creates it with 0700.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the tool directory and database file
    Install,

    /// Put a key-value pair
    Put {
        /// Bucket to write into
        #[arg(short, long, default_value = DEFAULT_BUCKET)]
        bucket: String,

        /// The key to set
        #[arg(short, long, default_value = "")]
        key: String,

        /// The value to set
        #[arg(short, long, default_value = "")]
        value: String,
    },

    /// Get a value by key
    Get {
        /// Bucket to read from
        #[arg(short, long, default_value = DEFAULT_BUCKET)]
        bucket: String,

        /// The key to get
        #[arg(short, long, default_value = "")]
        key: String,
    },

    /// Delete a key
    Delete {
        /// Bucket to delete from
        #[arg(short, long, default_value = DEFAULT_BUCKET)]
        bucket: String,

        /// The key to delete
        #[arg(short, long, default_value = "")]
        key: String,
    },

    /// List buckets
    List,

    /// Bucket subcommands
    Bucket {
        #[command(subcommand)]
        command: BucketCommands,
    },
}

#[derive(Subcommand, Debug)]
enum BucketCommands {
    /// List the keys in a bucket
    ListKeys {
        /// Bucket to list
        #[arg(short, long, default_value = DEFAULT_BUCKET)]
        bucket: String,
    },
}

impl Commands {
    fn into_request(self) -> Request {
        let command = match self {
            Commands::Install => return Request::Install,
            Commands::Put { bucket, key, value } => Command::Put {
                bucket: bucket.into_bytes(),
                key: key.into_bytes(),
                value: value.into_bytes(),
            },
            Commands::Get { bucket, key } => Command::Get {
                bucket: bucket.into_bytes(),
                key: key.into_bytes(),
            },
            Commands::Delete { bucket, key } => Command::Delete {
                bucket: bucket.into_bytes(),
                key: key.into_bytes(),
            },
            Commands::List => Command::ListBuckets,
            Commands::Bucket {
                command: BucketCommands::ListKeys { bucket },
            } => Command::ListKeys {
                bucket: bucket.into_bytes(),
            },
        };
        Request::Command(command)
    }
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        // --help and --version
        Err(e) if !e.use_stderr() => {
            let _ = e.print();
            return;
        }
        Err(e) => fail(BoltError::InvalidArgs(e.to_string().trim_end().to_string())),
    };

    let mut builder = Config::builder();
    if let Some(db) = args.db {
        builder = builder.db_path(db);
    }
    let config = builder.build();

    let request = args.command.into_request();
    tracing::debug!(?request, db = %config.db_path.display(), "dispatching");

    let stdout = io::stdout();
    let stderr = io::stderr();
    if let Err(e) = dispatch::run(&config, &request, &mut stdout.lock(), &mut stderr.lock()) {
        fail(e);
    }
}

/// Log the error once and exit nonzero
fn fail(error: BoltError) -> ! {
    tracing::error!(error = %error, "error");
    process::exit(1);
}
