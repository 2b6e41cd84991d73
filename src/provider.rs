//! Resource provider - kind registry and operation dispatch
//!
//! The single entry point the outer request router talks to. Owns one DAO
//! per resource kind, with every column map validated for the bijection
//! property when the provider is built, plus the private attachment root.
//! The storage handle is borrowed on every call; its lifecycle belongs to
//! the host.

use crate::attachment::AttachmentRoot;
use crate::column::{ColumnDef, ColumnMap, ColumnType, Value, ValueMap};
use crate::contract;
use crate::dao::{InsertOutcome, ResourceDao, ResourceKind, Row};
use crate::storage::{ConflictPolicy, Store, schema};
use crate::uri::ResourceUri;
use crate::{Error, Result};
use std::fs::File;
use std::path::{Path, PathBuf};

/// The resource kinds this provider serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindId {
    Tags,
    Feed,
}

impl KindId {
    /// All served kinds
    pub fn all() -> &'static [KindId] {
        &[KindId::Tags, KindId::Feed]
    }
}

/// Registry of resource DAOs plus the private attachment root.
pub struct ResourceProvider {
    tags: ResourceDao,
    feed: ResourceDao,
    attachments: AttachmentRoot,
}

impl ResourceProvider {
    /// Build the provider, validating every kind's column map. A bijection
    /// violation in a declaration fails here, before any request is served.
    pub fn new(file_root: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            tags: ResourceDao::new(tags_kind()?),
            feed: ResourceDao::new(feed_kind()?),
            attachments: AttachmentRoot::new(file_root),
        })
    }

    fn dao(&self, kind: KindId) -> &ResourceDao {
        match kind {
            KindId::Tags => &self.tags,
            KindId::Feed => &self.feed,
        }
    }

    /// Map a URI path segment to the kind it addresses.
    pub fn kind_for_path(&self, path: &str) -> Option<KindId> {
        KindId::all()
            .iter()
            .copied()
            .find(|k| self.dao(*k).kind().name == path)
    }

    /// Content identifier for one row.
    pub fn item_uri(&self, kind: KindId, pk: i64) -> ResourceUri {
        self.dao(kind).kind().item_uri(pk)
    }

    /// Content type of the collection form, passed through unexamined.
    pub fn content_type_dir(&self, kind: KindId) -> &'static str {
        self.dao(kind).kind().content_type_dir
    }

    /// Content type of a single resource, passed through unexamined.
    pub fn content_type_item(&self, kind: KindId) -> &'static str {
        self.dao(kind).kind().content_type_item
    }

    /// Physical column a kind stores attachment filenames under, writable
    /// on insert.
    pub fn attachment_column(&self, kind: KindId) -> Option<&'static str> {
        self.dao(kind).kind().attachment_column
    }

    /// Directory attachment filenames resolve under.
    pub fn attachment_root(&self) -> &Path {
        self.attachments.path()
    }

    /// Create every kind's schema. Invoked by the host's storage
    /// initialization/upgrade path, not by request-time callers.
    pub fn create_schema(&self, store: &Store) -> Result<()> {
        for kind in KindId::all() {
            self.dao(*kind).create_schema(store)?;
        }
        Ok(())
    }

    /// Drop every kind's table.
    pub fn drop_schema(&self, store: &Store) -> Result<()> {
        for kind in KindId::all() {
            self.dao(*kind).drop_schema(store)?;
        }
        Ok(())
    }

    /// Create one kind's schema.
    pub fn create_schema_for(&self, store: &Store, kind: KindId) -> Result<()> {
        self.dao(kind).create_schema(store)
    }

    /// Drop one kind's table.
    pub fn drop_schema_for(&self, store: &Store, kind: KindId) -> Result<()> {
        self.dao(kind).drop_schema(store)
    }

    /// Insert a public-shaped value map into a kind's table.
    pub fn insert(&self, store: &Store, kind: KindId, values: &ValueMap) -> Result<InsertOutcome> {
        self.dao(kind).insert(store, values)
    }

    /// Query a kind's rows in public shape.
    pub fn query(
        &self,
        store: &Store,
        kind: KindId,
        columns: &[String],
        selection: Option<&str>,
        selection_args: &[Value],
        order: Option<&str>,
        pk: Option<i64>,
    ) -> Result<Vec<Row>> {
        self.dao(kind)
            .query(store, columns, selection, selection_args, order, pk)
    }

    /// Resolve a row's attachment to a read-only file handle.
    ///
    /// A malformed key is rejected before any I/O. Past that, a missing
    /// row and a missing file are the same condition to the caller.
    pub fn open_attachment(&self, store: &Store, kind: KindId, pk: i64) -> Result<File> {
        if pk < 0 {
            return Err(Error::MalformedId(pk));
        }
        let name = match self.dao(kind).attachment_name(store, pk) {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!(
                    "attachment lookup failed for {}/{}: {}",
                    self.dao(kind).kind().name,
                    pk,
                    e
                );
                return Err(Error::NotFound);
            }
        };
        self.attachments.open(&name)
    }

    /// Resolve an attachment from a full content URI.
    pub fn open_attachment_uri(&self, store: &Store, uri: &str) -> Result<File> {
        let parsed = ResourceUri::parse(uri)?;
        let kind = self.kind_for_path(&parsed.path).ok_or(Error::NotFound)?;
        let pk = parsed.id.ok_or_else(|| Error::InvalidUri(uri.to_string()))?;
        self.open_attachment(store, kind, pk)
    }

    /// Newest ingested post timestamp, `None` while the feed is empty.
    /// Ingestion uses this to skip items it already holds.
    pub fn latest_feed_timestamp(&self, store: &Store) -> Result<Option<i64>> {
        let max = store
            .connection()
            .query_row("SELECT max(pub_date) FROM feed", [], |row| row.get(0))?;
        Ok(max)
    }
}

fn tags_kind() -> Result<ResourceKind> {
    Ok(ResourceKind {
        name: contract::tags::PATH,
        table: "tags",
        columns: ColumnMap::new(vec![
            ColumnDef::new(contract::tags::columns::ID, "id", ColumnType::Integer),
            ColumnDef::new(contract::tags::columns::LINK, "uri", ColumnType::Text),
            ColumnDef::new(contract::tags::columns::TITLE, "title", ColumnType::Text),
            ColumnDef::new(contract::tags::columns::DESC, "description", ColumnType::Text),
            ColumnDef::write_only("icon_path", ColumnType::Text),
        ])?,
        default_order: "title ASC",
        conflict_policy: ConflictPolicy::Ignore,
        attachment_column: Some("icon_path"),
        content_type_dir: contract::tags::CONTENT_TYPE_DIR,
        content_type_item: contract::tags::CONTENT_TYPE_ITEM,
        create_sql: schema::TAGS_SCHEMA,
        drop_sql: schema::DROP_TAGS_TABLE,
    })
}

fn feed_kind() -> Result<ResourceKind> {
    Ok(ResourceKind {
        name: contract::feed::PATH,
        table: "feed",
        columns: ColumnMap::new(vec![
            ColumnDef::new(contract::feed::columns::ID, "id", ColumnType::Integer),
            ColumnDef::new(contract::feed::columns::LINK, "uri", ColumnType::Text),
            ColumnDef::new(contract::feed::columns::TITLE, "title", ColumnType::Text),
            ColumnDef::new(contract::feed::columns::AUTHOR, "author", ColumnType::Text),
            ColumnDef::new(contract::feed::columns::PUB_DATE, "pub_date", ColumnType::Integer),
            ColumnDef::new(contract::feed::columns::DESC, "description", ColumnType::Text),
            ColumnDef::write_only("icon_path", ColumnType::Text),
        ])?,
        default_order: "pub_date DESC",
        conflict_policy: ConflictPolicy::Ignore,
        attachment_column: Some("icon_path"),
        content_type_dir: contract::feed::CONTENT_TYPE_DIR,
        content_type_item: contract::feed::CONTENT_TYPE_ITEM,
        create_sql: schema::FEED_SCHEMA,
        drop_sql: schema::DROP_FEED_TABLE,
    })
}
