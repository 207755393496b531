//! SQLite backend for the TFT match tracker.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use schema::{MATCHES_DDL, Migration, RANK_HISTORY_DDL, SCHEMA_VERSION};
pub use store::{ResetMode, SqliteStore, Table, TableDump};
