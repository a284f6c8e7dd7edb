//! Command Dispatcher
//!
//! Routes a `Request` to setup or to one executor run, opening and closing
//! the database around it.

use std::io::Write;

use tracing::debug;

use crate::command::Request;
use crate::config::Config;
use crate::error::Result;
use crate::executor;
use crate::setup;
use crate::store::Db;

/// Run one request to completion
///
/// The database is closed on every path. If both the operation and the
/// close fail, the operation's error is returned.
pub fn run<O, E>(config: &Config, request: &Request, out: &mut O, err: &mut E) -> Result<()>
where
    O: Write,
    E: Write,
{
    let command = match request {
        Request::Install => return setup::install(config),
        Request::Command(command) => command,
    };

    debug!(path = %config.db_path.display(), "opening database");
    let mut db = Db::open(&config.db_path, config.open_mode)?;

    let result = executor::execute(&mut db, command, out, err);
    let closed = db.close();

    result.and(closed)?;
    out.flush()?;
    Ok(())
}
