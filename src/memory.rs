//! In-memory handles used by unit tests.
//!
//! Mirrors the server semantics the helpers rely on: dropping a missing
//! database or collection succeeds, and `listCollections` honours an exact
//! `{ name: .. }` filter.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;
use mongodb::bson::Document;

use crate::error::{MongoExtError, Result};
use crate::handle::{ClientHandle, DatabaseHandle};
use crate::sync::{SyncClientHandle, SyncDatabaseHandle};

type Catalog = Arc<Mutex<BTreeMap<String, BTreeSet<String>>>>;

/// Counts async drops that have started but not finished.
#[derive(Clone, Default)]
struct InFlight {
    current: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl InFlight {
    /// Hold a slot across one yield to the executor.
    async fn yield_while_held(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
pub(crate) struct MemoryDatabase {
    name: String,
    catalog: Catalog,
    failing: HashSet<String>,
    fail_listing: bool,
    yields: bool,
    in_flight: InFlight,
    drops: Arc<Mutex<Vec<String>>>,
    filters: Arc<Mutex<Vec<Option<Document>>>>,
}

impl MemoryDatabase {
    fn attach(name: &str, catalog: Catalog) -> Self {
        Self {
            name: name.to_string(),
            catalog,
            failing: HashSet::new(),
            fail_listing: false,
            yields: false,
            in_flight: InFlight::default(),
            drops: Arc::default(),
            filters: Arc::default(),
        }
    }

    pub(crate) fn with_collections(name: &str, collections: &[&str]) -> Self {
        let catalog: Catalog = Arc::default();
        catalog.lock().unwrap().insert(
            name.to_string(),
            collections.iter().map(|c| c.to_string()).collect(),
        );
        Self::attach(name, catalog)
    }

    /// Make drops of `collection` fail without removing it.
    pub(crate) fn fail_on(mut self, collection: &str) -> Self {
        self.failing.insert(collection.to_string());
        self
    }

    pub(crate) fn fail_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    /// Yield to the executor inside each async drop so requests interleave.
    pub(crate) fn with_yields(mut self) -> Self {
        self.yields = true;
        self
    }

    /// Every drop attempted so far, in call order.
    pub(crate) fn drop_log(&self) -> Vec<String> {
        self.drops.lock().unwrap().clone()
    }

    /// Most async drops in progress at the same time.
    pub(crate) fn peak_in_flight(&self) -> usize {
        self.in_flight.peak()
    }

    /// Filters passed to `listCollections` so far.
    pub(crate) fn filters_seen(&self) -> Vec<Option<Document>> {
        self.filters.lock().unwrap().clone()
    }

    fn list(&self, filter: Option<Document>) -> Result<Vec<String>> {
        self.filters.lock().unwrap().push(filter.clone());
        if self.fail_listing {
            return Err(MongoExtError::Other(anyhow!("listCollections failed")));
        }
        let wanted = filter
            .as_ref()
            .and_then(|f| f.get_str("name").ok())
            .map(str::to_string);
        let catalog = self.catalog.lock().unwrap();
        let names: Vec<String> = catalog
            .get(&self.name)
            .map(|colls| {
                colls
                    .iter()
                    .filter(|c| wanted.as_ref().is_none_or(|w| w == *c))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(names)
    }

    fn remove(&self, collection: &str) -> Result<()> {
        self.drops.lock().unwrap().push(collection.to_string());
        if self.failing.contains(collection) {
            return Err(MongoExtError::Other(anyhow!("drop of {collection} refused")));
        }
        if let Some(colls) = self.catalog.lock().unwrap().get_mut(&self.name) {
            colls.remove(collection);
        }
        Ok(())
    }
}

#[async_trait]
impl DatabaseHandle for MemoryDatabase {
    fn database_name(&self) -> &str {
        &self.name
    }

    async fn list_collection_names_matching(
        &self,
        filter: Option<Document>,
    ) -> Result<Vec<String>> {
        self.list(filter)
    }

    async fn drop_collection(&self, name: &str) -> Result<()> {
        if self.yields {
            self.in_flight.yield_while_held().await;
        }
        self.remove(name)
    }
}

impl SyncDatabaseHandle for MemoryDatabase {
    fn database_name(&self) -> &str {
        &self.name
    }

    fn list_collection_names_matching(&self, filter: Option<Document>) -> Result<Vec<String>> {
        self.list(filter)
    }

    fn drop_collection(&self, name: &str) -> Result<()> {
        self.remove(name)
    }
}

pub(crate) struct MemoryClient {
    catalog: Catalog,
    failing: HashSet<String>,
    fail_listing: bool,
    in_flight: InFlight,
    drops: Mutex<Vec<String>>,
}

impl MemoryClient {
    pub(crate) fn with_databases(names: &[&str]) -> Self {
        let catalog: Catalog = Arc::default();
        {
            let mut guard = catalog.lock().unwrap();
            for name in names {
                guard.insert(name.to_string(), BTreeSet::new());
            }
        }
        Self {
            catalog,
            failing: HashSet::new(),
            fail_listing: false,
            in_flight: InFlight::default(),
            drops: Mutex::default(),
        }
    }

    /// Make drops of `database` fail without removing it.
    pub(crate) fn fail_on(mut self, database: &str) -> Self {
        self.failing.insert(database.to_string());
        self
    }

    pub(crate) fn fail_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub(crate) fn create_collection(&self, database: &str, collection: &str) {
        self.catalog
            .lock()
            .unwrap()
            .entry(database.to_string())
            .or_default()
            .insert(collection.to_string());
    }

    /// Every drop attempted so far, in call order.
    pub(crate) fn drop_log(&self) -> Vec<String> {
        self.drops.lock().unwrap().clone()
    }

    /// Most async drops in progress at the same time.
    pub(crate) fn peak_in_flight(&self) -> usize {
        self.in_flight.peak()
    }

    fn names(&self) -> Result<Vec<String>> {
        if self.fail_listing {
            return Err(MongoExtError::Other(anyhow!("listDatabases failed")));
        }
        Ok(self.catalog.lock().unwrap().keys().cloned().collect())
    }

    fn remove(&self, name: &str) -> Result<()> {
        self.drops.lock().unwrap().push(name.to_string());
        if self.failing.contains(name) {
            return Err(MongoExtError::Other(anyhow!("drop of {name} refused")));
        }
        self.catalog.lock().unwrap().remove(name);
        Ok(())
    }
}

#[async_trait]
impl ClientHandle for MemoryClient {
    type Database = MemoryDatabase;

    async fn list_database_names(&self) -> Result<Vec<String>> {
        self.names()
    }

    fn database_handle(&self, name: &str) -> MemoryDatabase {
        MemoryDatabase::attach(name, Arc::clone(&self.catalog))
    }

    async fn drop_database(&self, name: &str) -> Result<()> {
        self.in_flight.yield_while_held().await;
        self.remove(name)
    }
}

impl SyncClientHandle for MemoryClient {
    type Database = MemoryDatabase;

    fn list_database_names(&self) -> Result<Vec<String>> {
        self.names()
    }

    fn database_handle(&self, name: &str) -> MemoryDatabase {
        MemoryDatabase::attach(name, Arc::clone(&self.catalog))
    }

    fn drop_database(&self, name: &str) -> Result<()> {
        self.remove(name)
    }
}
