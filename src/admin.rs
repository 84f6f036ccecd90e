use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, trace, warn};

use crate::config::ServerConfig;
use crate::error::{DropFailure, MongoExtError, Result};
use crate::handle::{ClientHandle, DatabaseHandle};
use crate::meta::{CollectionFilter, ReservedDatabases, validate_name};

/// Bulk helpers for anything implementing [`DatabaseHandle`].
#[async_trait]
pub trait DatabaseExt: DatabaseHandle {
    /// All collection names currently in the database.
    async fn collection_names(&self) -> Result<Vec<String>> {
        self.list_collection_names_matching(None).await
    }

    /// Whether a collection with exactly this name exists.
    ///
    /// The name filter is evaluated by the server.
    async fn collection_exists(&self, name: &str) -> Result<bool> {
        let found = self
            .list_collection_names_matching(Some(CollectionFilter::by_name(name)))
            .await?;
        Ok(!found.is_empty())
    }

    /// Drop the named collections, or every current collection when `names`
    /// is empty.
    ///
    /// All drop requests run concurrently and the call returns once each one
    /// has settled. Failures are collected into [`MongoExtError::Drop`].
    async fn drop_all_collections(&self, names: &[&str]) -> Result<()> {
        let targets = match explicit_targets(names)? {
            Some(targets) => targets,
            None => self.collection_names().await?,
        };
        debug!(
            database = self.database_name(),
            count = targets.len(),
            all = names.is_empty(),
            "dropping collections"
        );

        let outcomes = join_all(targets.iter().map(|name| async move {
            trace!(database = self.database_name(), collection = %name, "drop collection");
            self.drop_collection(name).await
        }))
        .await;
        settle(targets, outcomes)
    }
}

impl<T: DatabaseHandle + ?Sized> DatabaseExt for T {}

/// Bulk helpers for anything implementing [`ClientHandle`].
#[async_trait]
pub trait ClientExt: ClientHandle {
    /// All database names visible to the client.
    async fn database_names(&self) -> Result<Vec<String>> {
        self.list_database_names().await
    }

    /// Drop the named databases, or every current non-reserved database when
    /// `names` is empty. See [`ClientExt::drop_all_databases_with`].
    async fn drop_all_databases(&self, names: &[&str]) -> Result<()> {
        self.drop_all_databases_with(names, &ReservedDatabases::default())
            .await
    }

    /// Same as [`ClientExt::drop_all_databases`] with a custom reserved set.
    ///
    /// `reserved` only narrows the default path; explicitly named databases
    /// are dropped even when reserved.
    async fn drop_all_databases_with(
        &self,
        names: &[&str],
        reserved: &ReservedDatabases,
    ) -> Result<()> {
        let targets = match explicit_targets(names)? {
            Some(targets) => targets,
            None => reserved.exclude_from(self.database_names().await?),
        };
        debug!(count = targets.len(), all = names.is_empty(), "dropping databases");

        let outcomes = join_all(targets.iter().map(|name| async move {
            trace!(database = %name, "drop database");
            self.drop_database(name).await
        }))
        .await;
        settle(targets, outcomes)
    }
}

impl<T: ClientHandle + ?Sized> ClientExt for T {}

/// Explicit selector as owned names, or `None` for the "everything" path.
pub(crate) fn explicit_targets(names: &[&str]) -> Result<Option<Vec<String>>> {
    if names.is_empty() {
        return Ok(None);
    }
    for name in names {
        validate_name(name)?;
    }
    Ok(Some(names.iter().map(|n| n.to_string()).collect()))
}

/// Pair each target with its outcome and aggregate the failures.
fn settle(targets: Vec<String>, outcomes: Vec<Result<()>>) -> Result<()> {
    let attempted = targets.len();
    let failures: Vec<DropFailure> = targets
        .into_iter()
        .zip(outcomes)
        .filter_map(|(name, outcome)| outcome.err().map(|error| DropFailure { name, error }))
        .collect();

    if failures.is_empty() {
        return Ok(());
    }
    warn!(attempted, failed = failures.len(), "bulk drop finished with failures");
    Err(MongoExtError::Drop {
        attempted,
        failures,
    })
}

/// Thin proxy that applies a configured reserved-database policy to an
/// underlying client.
pub struct AdminClient<C = mongodb::Client> {
    inner: Arc<C>,
    reserved: ReservedDatabases,
}

impl<C> Clone for AdminClient<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            reserved: self.reserved.clone(),
        }
    }
}

impl<C: ClientHandle> AdminClient<C> {
    pub fn new(inner: Arc<C>) -> Self {
        Self {
            inner,
            reserved: ReservedDatabases::default(),
        }
    }

    pub fn with_reserved(mut self, reserved: ReservedDatabases) -> Self {
        self.reserved = reserved;
        self
    }

    pub fn reserved(&self) -> &ReservedDatabases {
        &self.reserved
    }

    pub fn client(&self) -> &C {
        &self.inner
    }

    pub fn database(&self, name: &str) -> C::Database {
        self.inner.database_handle(name)
    }

    pub async fn database_names(&self) -> Result<Vec<String>> {
        self.inner.database_names().await
    }

    pub async fn drop_all_databases(&self, names: &[&str]) -> Result<()> {
        self.inner
            .drop_all_databases_with(names, &self.reserved)
            .await
    }
}

impl AdminClient<mongodb::Client> {
    /// Connect using `config.uri` and adopt its reserved-database policy.
    pub async fn from_config(config: &ServerConfig) -> Result<Self> {
        let client = config.connect().await?;
        Ok(Self::new(Arc::new(client)).with_reserved(config.reserved_databases.clone()))
    }
}
