//! Well-known names and the reserved-database policy used by bulk drops.

use mongodb::bson::{Document, doc};

use crate::error::{MongoExtError, Result};

pub struct DatabaseNames;

impl DatabaseNames {
    pub const ADMIN: &'static str = "admin";
    pub const LOCAL: &'static str = "local";

    /// Databases skipped when `drop_all_databases` is called without names.
    pub const RESERVED: &'static [&'static str] = &[Self::ADMIN, Self::LOCAL];
}

/// Validate a database or collection name passed explicitly to a bulk drop.
///
/// Only rejects the empty string; everything else is left to the server.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(MongoExtError::InvalidInput(
            "database or collection name must not be empty".into(),
        ));
    }
    Ok(())
}

/// Set of database names excluded from the default "drop everything" path.
///
/// Keeps insertion order and ignores duplicates and blank entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReservedDatabases {
    names: Vec<String>,
}

impl ReservedDatabases {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for name in names {
            let name: String = name.into();
            let name = name.trim();
            if name.is_empty() || out.iter().any(|n| n == name) {
                continue;
            }
            out.push(name.to_string());
        }
        Self { names: out }
    }

    /// A policy that reserves nothing.
    pub fn none() -> Self {
        Self { names: Vec::new() }
    }

    /// Parse a comma-separated list such as `admin,local,config`.
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(','))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Drop reserved entries from an enumerated name list.
    pub fn exclude_from(&self, names: Vec<String>) -> Vec<String> {
        names.into_iter().filter(|n| !self.contains(n)).collect()
    }
}

impl Default for ReservedDatabases {
    fn default() -> Self {
        Self::new(DatabaseNames::RESERVED.iter().copied())
    }
}

/// Filter documents passed to `listCollections`.
pub struct CollectionFilter;

impl CollectionFilter {
    /// Exact-match filter on the collection name.
    pub fn by_name(name: &str) -> Document {
        doc! { "name": name }
    }
}
