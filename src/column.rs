//! Column translation - public contract names to physical storage columns
//!
//! Each resource kind declares a `ColumnMap`: a bijection between the column
//! names callers see and the columns its table actually carries. Reads are
//! strict (the projection builder rejects undeclared columns); writes drop
//! unknown keys so a newer contract can send fields this build does not know
//! about yet. That asymmetry is deliberate.

use crate::{Error, Result};
use rusqlite::ToSql;
use rusqlite::types::{self, ToSqlOutput};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Storage type of a declared column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// 64-bit integer column
    Integer,
    /// UTF-8 text column
    Text,
}

/// A typed value, in either public or physical column shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Text(String),
    Null,
}

impl Value {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Value::Integer(v) => v.to_sql(),
            Value::Text(v) => v.to_sql(),
            Value::Null => Ok(ToSqlOutput::Owned(types::Value::Null)),
        }
    }
}

/// Public-shaped value map supplied by callers on insert.
pub type ValueMap = BTreeMap<String, Value>;

/// One declared column: public name, physical column backing it, storage
/// type. A write-only column is accepted on the write path under its
/// physical name but never appears in a projection.
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub public: &'static str,
    pub physical: &'static str,
    pub kind: ColumnType,
    pub write_only: bool,
}

impl ColumnDef {
    /// A column exposed to readers under its public name.
    pub const fn new(public: &'static str, physical: &'static str, kind: ColumnType) -> Self {
        Self { public, physical, kind, write_only: false }
    }

    /// A column writable under its physical name but excluded from every
    /// projection (attachment filenames).
    pub const fn write_only(physical: &'static str, kind: ColumnType) -> Self {
        Self { public: physical, physical, kind, write_only: true }
    }
}

/// Bijective public/physical column table for one resource kind.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    defs: Vec<ColumnDef>,
}

impl ColumnMap {
    /// Build a map, rejecting duplicate public or physical names.
    pub fn new(defs: Vec<ColumnDef>) -> Result<Self> {
        for (i, def) in defs.iter().enumerate() {
            for other in &defs[..i] {
                if other.public == def.public {
                    return Err(Error::InvalidColumnMap(format!(
                        "duplicate public column: {}",
                        def.public
                    )));
                }
                if other.physical == def.physical {
                    return Err(Error::InvalidColumnMap(format!(
                        "duplicate physical column: {}",
                        def.physical
                    )));
                }
            }
        }
        Ok(Self { defs })
    }

    /// Look up the declaration backing a public name. Absence is `None`, not
    /// an error; the caller decides whether absence is fatal.
    pub fn to_physical(&self, public: &str) -> Option<&ColumnDef> {
        self.defs.iter().find(|d| d.public == public)
    }

    /// Look up the public name a physical column is exposed as.
    pub fn to_public(&self, physical: &str) -> Option<&str> {
        self.defs.iter().find(|d| d.physical == physical).map(|d| d.public)
    }

    /// All declarations, in declaration order.
    pub fn defs(&self) -> &[ColumnDef] {
        &self.defs
    }

    /// Translate a public value map into physical shape. Unknown public keys
    /// are dropped, not rejected; each omission is recorded at debug level.
    pub fn translate_values(&self, values: &ValueMap) -> BTreeMap<&'static str, Value> {
        let mut out = BTreeMap::new();
        for (public, value) in values {
            match self.to_physical(public) {
                Some(def) => {
                    out.insert(def.physical, value.clone());
                }
                None => {
                    tracing::debug!("dropping unmapped column on write: {}", public);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_map() -> ColumnMap {
        ColumnMap::new(vec![
            ColumnDef::new("id", "id", ColumnType::Integer),
            ColumnDef::new("link", "uri", ColumnType::Text),
            ColumnDef::new("title", "title", ColumnType::Text),
            ColumnDef::write_only("icon_path", ColumnType::Text),
        ])
        .unwrap()
    }

    #[test]
    fn test_bijection_roundtrip() {
        let map = sample_map();
        for def in map.defs() {
            let physical = map.to_physical(def.public).unwrap().physical;
            assert_eq!(map.to_public(physical).unwrap(), def.public);
        }
    }

    #[test]
    fn test_duplicate_public_rejected() {
        let result = ColumnMap::new(vec![
            ColumnDef::new("link", "uri", ColumnType::Text),
            ColumnDef::new("link", "url", ColumnType::Text),
        ]);
        assert!(matches!(result, Err(Error::InvalidColumnMap(_))));
    }

    #[test]
    fn test_duplicate_physical_rejected() {
        let result = ColumnMap::new(vec![
            ColumnDef::new("link", "uri", ColumnType::Text),
            ColumnDef::new("source", "uri", ColumnType::Text),
        ]);
        assert!(matches!(result, Err(Error::InvalidColumnMap(_))));
    }

    #[test]
    fn test_unknown_lookup_is_none() {
        let map = sample_map();
        assert!(map.to_physical("bogus").is_none());
        assert!(map.to_public("bogus").is_none());
    }

    #[test]
    fn test_translate_drops_unknown_keys() {
        let map = sample_map();
        let mut values = ValueMap::new();
        values.insert("link".to_string(), "http://example.com".into());
        values.insert("bogus".to_string(), "ignored".into());

        let physical = map.translate_values(&values);
        assert_eq!(physical.len(), 1);
        assert_eq!(physical.get("uri").unwrap().as_text().unwrap(), "http://example.com");
    }

    #[test]
    fn test_translate_passes_write_only_column() {
        let map = sample_map();
        let mut values = ValueMap::new();
        values.insert("icon_path".to_string(), "icon.png".into());

        let physical = map.translate_values(&values);
        assert_eq!(physical.get("icon_path").unwrap().as_text().unwrap(), "icon.png");
    }
}
