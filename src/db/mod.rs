//! Database module
//!
//! In-memory SQLite store and its schema.

pub mod connection;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};
