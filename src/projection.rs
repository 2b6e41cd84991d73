//! Strict SELECT building
//!
//! Builds the physical SELECT for a public query request. Only declared,
//! readable columns may appear in the projection or the ORDER BY; the
//! primary-key constraint is generated from a trusted integer. Caller
//! selection text is carried verbatim into the statement but only ever
//! executed as a parameterized WHERE fragment with bound arguments.

use crate::column::ColumnMap;
use crate::{Error, Result};

/// Physical column holding the rowid primary key on every table.
pub const PK_COLUMN: &str = "id";

/// A fully built physical SELECT. Selection args are bound by the store at
/// execution time, never spliced into the SQL.
#[derive(Debug, Clone)]
pub struct SelectStatement {
    pub sql: String,
    /// Public names of the projected columns, in projection order.
    pub columns: Vec<String>,
}

/// Builder for one query against one resource kind's table.
pub struct SelectBuilder<'a> {
    table: &'a str,
    map: &'a ColumnMap,
    default_order: &'a str,
}

impl<'a> SelectBuilder<'a> {
    pub fn new(table: &'a str, map: &'a ColumnMap, default_order: &'a str) -> Self {
        Self { table, map, default_order }
    }

    /// Build the SELECT. An empty `requested` list projects every readable
    /// declared column; an absent order falls back to the kind's default.
    pub fn build(
        &self,
        requested: &[String],
        selection: Option<&str>,
        order: Option<&str>,
        pk: Option<i64>,
    ) -> Result<SelectStatement> {
        // Reject a malformed key before any SQL exists.
        if let Some(pk) = pk {
            if pk < 0 {
                return Err(Error::MalformedId(pk));
            }
        }

        let (projection, columns) = self.projection(requested)?;
        let order_sql = match order {
            Some(o) if !o.trim().is_empty() => self.translate_order(o)?,
            _ => self.translate_order(self.default_order)?,
        };

        let mut sql = format!("SELECT {} FROM {}", projection, self.table);
        let mut constraints: Vec<String> = Vec::new();
        if let Some(pk) = pk {
            // Trusted integer, not caller text.
            constraints.push(format!("{} = {}", PK_COLUMN, pk));
        }
        if let Some(sel) = selection {
            if !sel.trim().is_empty() {
                constraints.push(format!("({})", sel));
            }
        }
        if !constraints.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&constraints.join(" AND "));
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(&order_sql);

        Ok(SelectStatement { sql, columns })
    }

    fn projection(&self, requested: &[String]) -> Result<(String, Vec<String>)> {
        let mut parts = Vec::new();
        let mut columns = Vec::new();
        if requested.is_empty() {
            for def in self.map.defs().iter().filter(|d| !d.write_only) {
                parts.push(format!("{} AS {}", def.physical, def.public));
                columns.push(def.public.to_string());
            }
        } else {
            for public in requested {
                let def = self
                    .map
                    .to_physical(public)
                    .filter(|d| !d.write_only)
                    .ok_or_else(|| Error::InvalidProjection(public.clone()))?;
                parts.push(format!("{} AS {}", def.physical, def.public));
                columns.push(def.public.to_string());
            }
        }
        Ok((parts.join(", "), columns))
    }

    /// Translate a public order expression ("title ASC, id") into physical
    /// columns. Anything but `<declared column> [ASC|DESC]` terms is
    /// rejected.
    fn translate_order(&self, order: &str) -> Result<String> {
        let mut terms = Vec::new();
        for term in order.split(',') {
            let mut words = term.split_whitespace();
            let column = words
                .next()
                .ok_or_else(|| Error::InvalidProjection(order.to_string()))?;
            let def = self
                .map
                .to_physical(column)
                .filter(|d| !d.write_only)
                .ok_or_else(|| Error::InvalidProjection(column.to_string()))?;
            let direction = match words.next() {
                None => "",
                Some(w) if w.eq_ignore_ascii_case("asc") => " ASC",
                Some(w) if w.eq_ignore_ascii_case("desc") => " DESC",
                Some(w) => return Err(Error::InvalidProjection(w.to_string())),
            };
            if words.next().is_some() {
                return Err(Error::InvalidProjection(term.trim().to_string()));
            }
            terms.push(format!("{}{}", def.physical, direction));
        }
        Ok(terms.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{ColumnDef, ColumnType};

    fn sample_map() -> ColumnMap {
        ColumnMap::new(vec![
            ColumnDef::new("id", "id", ColumnType::Integer),
            ColumnDef::new("link", "uri", ColumnType::Text),
            ColumnDef::new("title", "title", ColumnType::Text),
            ColumnDef::write_only("icon_path", ColumnType::Text),
        ])
        .unwrap()
    }

    fn builder(map: &ColumnMap) -> SelectBuilder<'_> {
        SelectBuilder::new("tags", map, "title ASC")
    }

    #[test]
    fn test_full_projection_with_default_order() {
        let map = sample_map();
        let stmt = builder(&map).build(&[], None, None, None).unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT id AS id, uri AS link, title AS title FROM tags ORDER BY title ASC"
        );
        assert_eq!(stmt.columns, vec!["id", "link", "title"]);
    }

    #[test]
    fn test_requested_projection_is_aliased() {
        let map = sample_map();
        let stmt = builder(&map)
            .build(&["link".to_string()], None, None, None)
            .unwrap();
        assert_eq!(stmt.sql, "SELECT uri AS link FROM tags ORDER BY title ASC");
    }

    #[test]
    fn test_undeclared_column_rejected() {
        let map = sample_map();
        let result = builder(&map).build(&["uri; DROP TABLE tags".to_string()], None, None, None);
        assert!(matches!(result, Err(Error::InvalidProjection(_))));
    }

    #[test]
    fn test_write_only_column_not_projectable() {
        let map = sample_map();
        let result = builder(&map).build(&["icon_path".to_string()], None, None, None);
        assert!(matches!(result, Err(Error::InvalidProjection(_))));
        // And it never shows up in the full projection either.
        let stmt = builder(&map).build(&[], None, None, None).unwrap();
        assert!(!stmt.columns.iter().any(|c| c == "icon_path"));
    }

    #[test]
    fn test_order_is_translated_to_physical() {
        let map = sample_map();
        let stmt = builder(&map)
            .build(&[], None, Some("link DESC, id"), None)
            .unwrap();
        assert!(stmt.sql.ends_with("ORDER BY uri DESC, id"));
    }

    #[test]
    fn test_order_rejects_undeclared_and_garbage() {
        let map = sample_map();
        let b = builder(&map);
        assert!(matches!(
            b.build(&[], None, Some("bogus ASC"), None),
            Err(Error::InvalidProjection(_))
        ));
        assert!(matches!(
            b.build(&[], None, Some("title ASC; DELETE FROM tags"), None),
            Err(Error::InvalidProjection(_))
        ));
        assert!(matches!(
            b.build(&[], None, Some("title ASC extra"), None),
            Err(Error::InvalidProjection(_))
        ));
    }

    #[test]
    fn test_pk_constraint_and_selection_compose() {
        let map = sample_map();
        let stmt = builder(&map)
            .build(&[], Some("title = ?1"), None, Some(7))
            .unwrap();
        assert!(stmt.sql.contains("WHERE id = 7 AND (title = ?1)"));
    }

    #[test]
    fn test_negative_pk_rejected_before_sql() {
        let map = sample_map();
        match builder(&map).build(&[], None, None, Some(-1)) {
            Err(Error::MalformedId(-1)) => {}
            other => panic!("expected MalformedId, got {:?}", other),
        }
    }
}
