//! Resource URIs - stable identifiers for collections and single rows
//!
//! Format: `feedstore://<authority>/<path>[/<id>]`
//!
//! Examples:
//! - `feedstore://org.feedstore.provider/tags` - the tag collection
//! - `feedstore://org.feedstore.provider/tags/42` - one tag row

use crate::contract;
use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// Parsed resource identifier: a kind path plus an optional row key.
///
/// The outer request router maps the path to a resource kind; the core only
/// ever consumes the parsed primary key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceUri {
    /// Resource path segment ("tags", "feed")
    pub path: String,
    /// Row primary key, absent for collection URIs
    pub id: Option<i64>,
}

impl ResourceUri {
    /// URI for a whole collection
    pub fn collection(path: impl Into<String>) -> Self {
        Self { path: path.into(), id: None }
    }

    /// URI for a single row
    pub fn item(path: impl Into<String>, id: i64) -> Self {
        Self { path: path.into(), id: Some(id) }
    }

    /// Parse a URI string into a ResourceUri
    ///
    /// Expected format: `feedstore://<authority>/<path>[/<id>]`
    pub fn parse(uri: &str) -> Result<Self> {
        let prefix = format!("{}://", contract::SCHEME);
        let rest = uri.strip_prefix(&prefix)
            .ok_or_else(|| Error::InvalidUri(format!("URI must start with {}", prefix)))?;

        let (authority, rest) = rest.split_once('/')
            .ok_or_else(|| Error::InvalidUri("URI must contain authority/path".to_string()))?;
        if authority != contract::AUTHORITY {
            return Err(Error::InvalidUri(format!("Unknown authority: {}", authority)));
        }

        let (path, id) = match rest.split_once('/') {
            None => (rest, None),
            Some((path, id_str)) => {
                let id: i64 = id_str.parse()
                    .map_err(|_| Error::InvalidUri(format!("Invalid row id: {}", id_str)))?;
                if id < 0 {
                    return Err(Error::MalformedId(id));
                }
                (path, Some(id))
            }
        };

        if path.is_empty() {
            return Err(Error::InvalidUri("Empty resource path".to_string()));
        }

        Ok(Self { path: path.to_string(), id })
    }

    /// Convert to URI string
    pub fn to_uri_string(&self) -> String {
        match self.id {
            Some(id) => format!("{}://{}/{}/{}", contract::SCHEME, contract::AUTHORITY, self.path, id),
            None => format!("{}://{}/{}", contract::SCHEME, contract::AUTHORITY, self.path),
        }
    }
}

impl fmt::Display for ResourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uri_string())
    }
}

impl FromStr for ResourceUri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for ResourceUri {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_uri_string())
    }
}

impl<'de> Deserialize<'de> for ResourceUri {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ResourceUri::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_roundtrip() {
        let uri = ResourceUri::item("tags", 42);
        let uri_str = uri.to_uri_string();
        assert_eq!(uri_str, "feedstore://org.feedstore.provider/tags/42");

        let parsed = ResourceUri::parse(&uri_str).unwrap();
        assert_eq!(parsed, uri);
    }

    #[test]
    fn test_collection_uri() {
        let uri = ResourceUri::parse("feedstore://org.feedstore.provider/feed").unwrap();
        assert_eq!(uri.path, "feed");
        assert_eq!(uri.id, None);
    }

    #[test]
    fn test_invalid_uri() {
        assert!(ResourceUri::parse("invalid").is_err());
        assert!(ResourceUri::parse("http://example.com/tags/1").is_err());
        assert!(ResourceUri::parse("feedstore://wrong.authority/tags/1").is_err());
        assert!(ResourceUri::parse("feedstore://org.feedstore.provider/tags/abc").is_err());
    }

    #[test]
    fn test_negative_id_is_malformed() {
        match ResourceUri::parse("feedstore://org.feedstore.provider/tags/-1") {
            Err(Error::MalformedId(-1)) => {}
            other => panic!("expected MalformedId, got {:?}", other),
        }
    }
}
