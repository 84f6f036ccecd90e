//! Blocking counterparts of [`crate::handle`] and [`crate::admin`].
//!
//! The traits are always available; implementations for the driver's
//! `mongodb::sync` types need the `sync` feature. Bulk drops here are
//! sequential and stop at the first failing request.

use mongodb::bson::Document;
use tracing::{debug, trace};

use crate::admin::explicit_targets;
use crate::error::Result;
use crate::meta::{CollectionFilter, ReservedDatabases};

/// Blocking capability over a single database.
pub trait SyncDatabaseHandle {
    fn database_name(&self) -> &str;

    fn list_collection_names_matching(&self, filter: Option<Document>) -> Result<Vec<String>>;

    fn drop_collection(&self, name: &str) -> Result<()>;
}

/// Blocking capability over a client connection.
pub trait SyncClientHandle {
    type Database: SyncDatabaseHandle;

    fn list_database_names(&self) -> Result<Vec<String>>;

    fn database_handle(&self, name: &str) -> Self::Database;

    fn drop_database(&self, name: &str) -> Result<()>;
}

/// Blocking bulk helpers for anything implementing [`SyncDatabaseHandle`].
pub trait SyncDatabaseExt: SyncDatabaseHandle {
    fn collection_names(&self) -> Result<Vec<String>> {
        self.list_collection_names_matching(None)
    }

    fn collection_exists(&self, name: &str) -> Result<bool> {
        let found = self.list_collection_names_matching(Some(CollectionFilter::by_name(name)))?;
        Ok(!found.is_empty())
    }

    /// Drop the named collections in order, or every current collection
    /// when `names` is empty. Returns the first error unchanged.
    fn drop_all_collections(&self, names: &[&str]) -> Result<()> {
        let targets = match explicit_targets(names)? {
            Some(targets) => targets,
            None => self.collection_names()?,
        };
        debug!(
            database = self.database_name(),
            count = targets.len(),
            all = names.is_empty(),
            "dropping collections"
        );

        for name in &targets {
            trace!(database = self.database_name(), collection = %name, "drop collection");
            self.drop_collection(name)?;
        }
        Ok(())
    }
}

impl<T: SyncDatabaseHandle + ?Sized> SyncDatabaseExt for T {}

/// Blocking bulk helpers for anything implementing [`SyncClientHandle`].
pub trait SyncClientExt: SyncClientHandle {
    fn database_names(&self) -> Result<Vec<String>> {
        self.list_database_names()
    }

    fn drop_all_databases(&self, names: &[&str]) -> Result<()> {
        self.drop_all_databases_with(names, &ReservedDatabases::default())
    }

    /// Explicit names bypass `reserved`; it only filters the default path.
    fn drop_all_databases_with(&self, names: &[&str], reserved: &ReservedDatabases) -> Result<()> {
        let targets = match explicit_targets(names)? {
            Some(targets) => targets,
            None => reserved.exclude_from(self.database_names()?),
        };
        debug!(count = targets.len(), all = names.is_empty(), "dropping databases");

        for name in &targets {
            trace!(database = %name, "drop database");
            self.drop_database(name)?;
        }
        Ok(())
    }
}

impl<T: SyncClientHandle + ?Sized> SyncClientExt for T {}

#[cfg(feature = "sync")]
impl SyncDatabaseHandle for mongodb::sync::Database {
    fn database_name(&self) -> &str {
        self.name()
    }

    fn list_collection_names_matching(&self, filter: Option<Document>) -> Result<Vec<String>> {
        let mut action = self.list_collection_names();
        if let Some(filter) = filter {
            action = action.filter(filter);
        }
        Ok(action.run()?)
    }

    fn drop_collection(&self, name: &str) -> Result<()> {
        self.collection::<Document>(name).drop().run()?;
        Ok(())
    }
}

#[cfg(feature = "sync")]
impl SyncClientHandle for mongodb::sync::Client {
    type Database = mongodb::sync::Database;

    fn list_database_names(&self) -> Result<Vec<String>> {
        Ok(mongodb::sync::Client::list_database_names(self).run()?)
    }

    fn database_handle(&self, name: &str) -> mongodb::sync::Database {
        self.database(name)
    }

    fn drop_database(&self, name: &str) -> Result<()> {
        self.database(name).drop().run()?;
        Ok(())
    }
}
