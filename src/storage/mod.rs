//! Storage Layer - embedded SQLite behind a borrowed handle
//!
//! Physical tables:
//! - tags(id, uri, title, description, icon_path)
//! - feed(id, uri, title, author, pub_date, description, icon_path)
//!
//! The physical layout is an internal detail; callers only ever see the
//! public column names declared in the contract.

pub mod schema;
pub mod sqlite;

pub use sqlite::{ConflictPolicy, Store};
