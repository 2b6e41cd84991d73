//! SQLite storage handle
//!
//! Thin wrapper around a rusqlite connection carrying the three operations
//! the DAOs need: raw DDL execution, conflict-aware inserts, and prepared
//! SELECTs with bound arguments. The handle's lifecycle (open, upgrade,
//! close) belongs to the hosting process; DAOs borrow it per call and never
//! cache it.

use crate::Result;
use crate::column::Value;
use rusqlite::Connection;
use std::collections::BTreeMap;
use std::path::Path;

/// What happens when a write collides with a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Fail the statement and surface a storage error.
    Abort,
    /// Drop the write silently; the insert reports no row.
    Ignore,
}

impl ConflictPolicy {
    fn insert_verb(self) -> &'static str {
        match self {
            ConflictPolicy::Abort => "INSERT OR ABORT",
            ConflictPolicy::Ignore => "INSERT OR IGNORE",
        }
    }
}

/// Handle to the embedded store, borrowed by DAOs per call.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open a database file (creates if it doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Execute one DDL or DML statement with no parameters.
    pub fn execute(&self, sql: &str) -> Result<()> {
        self.conn.execute(sql, [])?;
        Ok(())
    }

    /// Insert a row of physical (column, value) pairs under the given
    /// conflict policy. Returns the new primary key, or `None` when the
    /// policy swallowed a uniqueness collision and no row was written.
    pub fn insert_with_policy(
        &self,
        table: &str,
        values: &BTreeMap<&'static str, Value>,
        policy: ConflictPolicy,
    ) -> Result<Option<i64>> {
        let sql = if values.is_empty() {
            format!("{} INTO {} DEFAULT VALUES", policy.insert_verb(), table)
        } else {
            let columns: Vec<&str> = values.keys().copied().collect();
            let placeholders: Vec<String> =
                (1..=columns.len()).map(|i| format!("?{}", i)).collect();
            format!(
                "{} INTO {} ({}) VALUES ({})",
                policy.insert_verb(),
                table,
                columns.join(", "),
                placeholders.join(", ")
            )
        };

        let params: Vec<&dyn rusqlite::ToSql> =
            values.values().map(|v| v as &dyn rusqlite::ToSql).collect();
        let changed = self.conn.execute(&sql, params.as_slice())?;
        if changed == 0 {
            return Ok(None);
        }
        Ok(Some(self.conn.last_insert_rowid()))
    }

    /// Borrow the underlying connection for prepared statements.
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::schema;

    fn tag_values(uri: &str) -> BTreeMap<&'static str, Value> {
        let mut values = BTreeMap::new();
        values.insert("uri", Value::from(uri));
        values.insert("title", Value::from("A tag"));
        values
    }

    #[test]
    fn test_insert_ignore_swallows_conflict() {
        let store = Store::open_in_memory().unwrap();
        store.execute(schema::CREATE_TAGS_TABLE).unwrap();

        let first = store
            .insert_with_policy("tags", &tag_values("http://x"), ConflictPolicy::Ignore)
            .unwrap();
        assert!(first.is_some());

        let second = store
            .insert_with_policy("tags", &tag_values("http://x"), ConflictPolicy::Ignore)
            .unwrap();
        assert_eq!(second, None);
    }

    #[test]
    fn test_insert_abort_surfaces_conflict() {
        let store = Store::open_in_memory().unwrap();
        store.execute(schema::CREATE_TAGS_TABLE).unwrap();

        store
            .insert_with_policy("tags", &tag_values("http://x"), ConflictPolicy::Abort)
            .unwrap();
        let result =
            store.insert_with_policy("tags", &tag_values("http://x"), ConflictPolicy::Abort);
        assert!(result.is_err());
    }
}
