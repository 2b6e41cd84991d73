//! Public resource contract
//!
//! The externally stable naming surface: URI scheme and authority, resource
//! path segments, public column names, and content-type strings. Everything
//! in this module is visible to callers; the physical schema behind it is
//! not, and may change without touching these names.

/// URI scheme for resource identifiers.
pub const SCHEME: &str = "feedstore";

/// Authority all resource URIs live under.
pub const AUTHORITY: &str = "org.feedstore.provider";

/// Tags: named sources the reader follows.
pub mod tags {
    /// URI path segment for the tags resource.
    pub const PATH: &str = "tags";

    /// Content type of the tag collection.
    pub const CONTENT_TYPE_DIR: &str = "application/vnd.feedstore.tag-list";
    /// Content type of a single tag.
    pub const CONTENT_TYPE_ITEM: &str = "application/vnd.feedstore.tag";

    /// Public column names.
    pub mod columns {
        /// Row primary key.
        pub const ID: &str = "id";
        /// Source URI of the tag; unique per tag.
        pub const LINK: &str = "link";
        /// Display title.
        pub const TITLE: &str = "title";
        /// Longer description.
        pub const DESC: &str = "description";
    }
}

/// Feed: ingested posts.
pub mod feed {
    /// URI path segment for the feed resource.
    pub const PATH: &str = "feed";

    /// Content type of the post collection.
    pub const CONTENT_TYPE_DIR: &str = "application/vnd.feedstore.post-list";
    /// Content type of a single post.
    pub const CONTENT_TYPE_ITEM: &str = "application/vnd.feedstore.post";

    /// Public column names.
    pub mod columns {
        /// Row primary key.
        pub const ID: &str = "id";
        /// Post permalink; unique per post.
        pub const LINK: &str = "link";
        /// Post title.
        pub const TITLE: &str = "title";
        /// Post author.
        pub const AUTHOR: &str = "author";
        /// Publication time, unix seconds.
        pub const PUB_DATE: &str = "pub_date";
        /// Post body or summary.
        pub const DESC: &str = "description";
    }
}
