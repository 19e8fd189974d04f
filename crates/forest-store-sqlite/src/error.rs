//! Error type for `forest-store-sqlite`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] forest_core::Error),

  /// The database could not be opened or initialised. Fatal at startup.
  #[error("cannot open database {path:?}: {source}")]
  Connection {
    path:   PathBuf,
    #[source]
    source: tokio_rusqlite::Error,
  },

  /// A single statement failed.
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
