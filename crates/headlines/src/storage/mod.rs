//! Durable store implementations.
//!
//! Articles are persisted in SQLite through `rusqlite`, with `tokio-rusqlite`
//! moving each call onto the connection's dedicated thread.

pub mod sqlite;

pub use sqlite::SqliteRepository;
