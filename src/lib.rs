//! # Feedstore - URI-addressable data access over embedded SQLite
//!
//! Feedstore sits between a stable public resource contract (resource names,
//! logical column names, content identifiers) and a private SQLite schema
//! that is free to differ from it.
//!
//! Feedstore provides:
//! - Bidirectional mapping between public and physical column names
//! - Strict, injection-safe projection and ordering
//! - Idempotent ingestion via ignore-on-conflict inserts
//! - Attachment resolution from a row's primary key to a read-only file

pub mod contract;
pub mod uri;
pub mod column;
pub mod projection;
pub mod dao;
pub mod attachment;
pub mod provider;
pub mod storage;
pub mod config;

// Re-exports for convenient access
pub use column::{ColumnDef, ColumnMap, ColumnType, Value, ValueMap};
pub use dao::{InsertOutcome, ResourceDao, ResourceKind, Row};
pub use provider::{KindId, ResourceProvider};
pub use storage::{ConflictPolicy, Store};
pub use uri::ResourceUri;

/// Result type alias for feedstore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for feedstore operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A kind's column declarations break the public/physical bijection.
    #[error("Invalid column map: {0}")]
    InvalidColumnMap(String),

    /// A projection or order term referenced an undeclared column.
    #[error("Invalid projection: {0}")]
    InvalidProjection(String),

    /// A negative primary key where a non-negative one is required.
    #[error("Malformed identifier: {0}")]
    MalformedId(i64),

    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    /// Recoverable failure in the underlying store.
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Zero or ambiguous rows where exactly one was required, or an
    /// unreadable attachment.
    #[error("Resource not found")]
    NotFound,
}
