//! Database module: models and schema for the session table.
//!
//! Layout:
//! - `models.rs`: the session row and the encode/decode pair for `sessionData`
//! - `schema.rs`: SQL DDL for initializing the table (SQLite-first)
//! - `sqlite.rs`: the `SessionStore` seam and its sqlx implementation

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::SessionRecord;
pub use schema::SQLITE_INIT;
pub use sqlite::{SessionStorage, SessionStore, SqlitePool};
