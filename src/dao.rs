//! Resource DAO - per-kind translation and dispatch
//!
//! One `ResourceDao` per resource kind. The DAO owns the kind's table name,
//! column map, default order, and conflict policy; it borrows the storage
//! handle on every call so the host may reopen or upgrade the connection
//! between calls.
//!
//! Rows are insert-only: there is no update and no per-row delete. Tables
//! are destroyed only by `drop_schema`, and idempotent re-ingestion happens
//! through the ignore-on-conflict insert path.

use crate::column::{ColumnMap, Value, ValueMap};
use crate::projection::{PK_COLUMN, SelectBuilder};
use crate::storage::{ConflictPolicy, Store};
use crate::uri::ResourceUri;
use crate::{Error, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Static description of one resource kind.
pub struct ResourceKind {
    /// Kind name as it appears in resource URIs ("tags", "feed")
    pub name: &'static str,
    /// Physical table
    pub table: &'static str,
    /// Public/physical column table
    pub columns: ColumnMap,
    /// Public-shape order applied when the caller supplies none
    pub default_order: &'static str,
    /// Write behavior on uniqueness collision
    pub conflict_policy: ConflictPolicy,
    /// Physical column holding the attachment filename, if any
    pub attachment_column: Option<&'static str>,
    /// Content type of the collection form
    pub content_type_dir: &'static str,
    /// Content type of a single resource
    pub content_type_item: &'static str,
    /// Statements that create the table and its indexes
    pub create_sql: &'static [&'static str],
    /// Statement that drops the table
    pub drop_sql: &'static str,
}

impl ResourceKind {
    /// Content identifier for one row of this kind.
    pub fn item_uri(&self, pk: i64) -> ResourceUri {
        ResourceUri::item(self.name, pk)
    }
}

/// Result of an insert under the kind's conflict policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A row was written; carries its primary key.
    Inserted(i64),
    /// A uniqueness collision was ignored; nothing was written.
    Skipped,
}

impl InsertOutcome {
    /// The new primary key, if a row was written.
    pub fn key(&self) -> Option<i64> {
        match self {
            InsertOutcome::Inserted(pk) => Some(*pk),
            InsertOutcome::Skipped => None,
        }
    }
}

/// A row in public-column shape, in projection order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<(String, Value)>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(name, _)| name.as_str())
    }
}

impl Serialize for Row {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Data access for one resource kind.
pub struct ResourceDao {
    kind: ResourceKind,
}

impl ResourceDao {
    pub fn new(kind: ResourceKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> &ResourceKind {
        &self.kind
    }

    /// Create the kind's table and indexes. Safe to run on every startup.
    pub fn create_schema(&self, store: &Store) -> Result<()> {
        for sql in self.kind.create_sql {
            tracing::debug!("create {}: {}", self.kind.table, sql.trim());
            store.execute(sql)?;
        }
        Ok(())
    }

    /// Drop the kind's table. The only destructive path.
    pub fn drop_schema(&self, store: &Store) -> Result<()> {
        tracing::debug!("drop {}: {}", self.kind.table, self.kind.drop_sql);
        store.execute(self.kind.drop_sql)
    }

    /// Insert a public-shaped value map. Unknown public keys are dropped;
    /// a uniqueness collision under the IGNORE policy reports `Skipped`
    /// rather than an error. Any other storage failure is returned to the
    /// caller, who decides whether to retry.
    pub fn insert(&self, store: &Store, values: &ValueMap) -> Result<InsertOutcome> {
        let physical = self.kind.columns.translate_values(values);
        match store.insert_with_policy(self.kind.table, &physical, self.kind.conflict_policy) {
            Ok(Some(pk)) => Ok(InsertOutcome::Inserted(pk)),
            Ok(None) => {
                tracing::debug!("insert into {} skipped on conflict", self.kind.table);
                Ok(InsertOutcome::Skipped)
            }
            Err(e) => {
                tracing::warn!("insert into {} failed: {}", self.kind.table, e);
                Err(e)
            }
        }
    }

    /// Query rows in public shape.
    ///
    /// `selection` is executed as a parameterized WHERE fragment with
    /// `selection_args` bound to its placeholders; caller text is never
    /// concatenated with values. `pk` of `Some(k)` adds an equality
    /// constraint on the primary key; a negative `k` is malformed and is
    /// rejected before the store is touched.
    pub fn query(
        &self,
        store: &Store,
        columns: &[String],
        selection: Option<&str>,
        selection_args: &[Value],
        order: Option<&str>,
        pk: Option<i64>,
    ) -> Result<Vec<Row>> {
        let statement =
            SelectBuilder::new(self.kind.table, &self.kind.columns, self.kind.default_order)
                .build(columns, selection, order, pk)?;
        tracing::debug!("query {}: {}", self.kind.table, statement.sql);

        let mut stmt = store.connection().prepare(&statement.sql)?;
        let params: Vec<&dyn rusqlite::ToSql> =
            selection_args.iter().map(|v| v as &dyn rusqlite::ToSql).collect();
        let mut rows = stmt.query(params.as_slice())?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(statement.columns.len());
            for (idx, public) in statement.columns.iter().enumerate() {
                values.push((public.clone(), read_value(row, idx)?));
            }
            out.push(Row { values });
        }
        Ok(out)
    }

    /// Look up the attachment filename for one row. Exactly one row must
    /// match and carry a filename; anything else is `NotFound`.
    pub fn attachment_name(&self, store: &Store, pk: i64) -> Result<String> {
        if pk < 0 {
            return Err(Error::MalformedId(pk));
        }
        let column = self.kind.attachment_column.ok_or(Error::NotFound)?;

        // The key constraint comes from a trusted integer, not caller text.
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = {}",
            column, self.kind.table, PK_COLUMN, pk
        );
        let mut stmt = store.connection().prepare(&sql)?;
        let mut rows = stmt.query([])?;

        let row = rows.next()?.ok_or(Error::NotFound)?;
        let name: Option<String> = row.get(0)?;
        if rows.next()?.is_some() {
            return Err(Error::NotFound);
        }
        name.ok_or(Error::NotFound)
    }
}

/// Read one result column into a public value. Only the declared storage
/// classes can appear through a declared projection.
fn read_value(row: &rusqlite::Row<'_>, idx: usize) -> Result<Value> {
    use rusqlite::types::ValueRef;
    let value = match row.get_ref(idx)? {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::Integer(v),
        ValueRef::Text(v) => Value::Text(String::from_utf8_lossy(v).into_owned()),
        other => {
            return Err(Error::Storage(rusqlite::Error::InvalidColumnType(
                idx,
                "undeclared storage class".to_string(),
                other.data_type(),
            )));
        }
    };
    Ok(value)
}
