//! Infrastructure: SQLite connection and schema.

pub mod db;
mod schema;

pub(crate) use db::{ensure_schema, get_connection};
pub use db::{init_db, init_memory_db, DbPool};
