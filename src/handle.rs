use async_trait::async_trait;
use mongodb::bson::Document;

use crate::error::Result;

/// Asynchronous capability over a single database.
///
/// The bulk helpers in [`crate::admin`] only depend on this trait, so any
/// handle exposing enumerate and drop primitives can use them. The driver's
/// [`mongodb::Database`] implements it directly.
#[async_trait]
pub trait DatabaseHandle: Send + Sync {
    /// Name of the database this handle points at (used for logging).
    fn database_name(&self) -> &str;

    /// List collection names, optionally narrowed by a server-side filter.
    async fn list_collection_names_matching(
        &self,
        filter: Option<Document>,
    ) -> Result<Vec<String>>;

    /// Drop one collection by name.
    async fn drop_collection(&self, name: &str) -> Result<()>;
}

/// Asynchronous capability over a client connection.
#[async_trait]
pub trait ClientHandle: Send + Sync {
    type Database: DatabaseHandle;

    async fn list_database_names(&self) -> Result<Vec<String>>;

    /// Open a handle to the named database. Does not touch the server.
    fn database_handle(&self, name: &str) -> Self::Database;

    /// Drop one database by name.
    async fn drop_database(&self, name: &str) -> Result<()>;
}

#[async_trait]
impl DatabaseHandle for mongodb::Database {
    fn database_name(&self) -> &str {
        self.name()
    }

    async fn list_collection_names_matching(
        &self,
        filter: Option<Document>,
    ) -> Result<Vec<String>> {
        let mut action = self.list_collection_names();
        if let Some(filter) = filter {
            action = action.filter(filter);
        }
        Ok(action.await?)
    }

    async fn drop_collection(&self, name: &str) -> Result<()> {
        self.collection::<Document>(name).drop().await?;
        Ok(())
    }
}

#[async_trait]
impl ClientHandle for mongodb::Client {
    type Database = mongodb::Database;

    async fn list_database_names(&self) -> Result<Vec<String>> {
        Ok(mongodb::Client::list_database_names(self).await?)
    }

    fn database_handle(&self, name: &str) -> mongodb::Database {
        self.database(name)
    }

    async fn drop_database(&self, name: &str) -> Result<()> {
        self.database(name).drop().await?;
        Ok(())
    }
}
