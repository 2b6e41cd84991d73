//! Table DDL for the physical schema

/// SQL to create the tags table
pub const CREATE_TAGS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS tags (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    uri TEXT UNIQUE,
    title TEXT,
    description TEXT,
    icon_path TEXT
)
"#;

/// SQL to drop the tags table
pub const DROP_TAGS_TABLE: &str = "DROP TABLE IF EXISTS tags";

/// SQL to create the feed table
pub const CREATE_FEED_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS feed (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    uri TEXT UNIQUE,
    title TEXT,
    author TEXT,
    pub_date INTEGER,
    description TEXT,
    icon_path TEXT
)
"#;

/// SQL to drop the feed table
pub const DROP_FEED_TABLE: &str = "DROP TABLE IF EXISTS feed";

/// Statements run to create the tags schema, in order.
pub const TAGS_SCHEMA: &[&str] = &[CREATE_TAGS_TABLE];

/// Statements run to create the feed schema, in order. The pub_date index
/// backs the default sort and the latest-timestamp lookup.
pub const FEED_SCHEMA: &[&str] = &[
    CREATE_FEED_TABLE,
    "CREATE INDEX IF NOT EXISTS idx_feed_pub_date ON feed(pub_date)",
];
