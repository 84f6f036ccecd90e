use std::env;

use crate::error::{MongoExtError, Result};
use crate::meta::ReservedDatabases;

/// Connection settings plus the reserved-database policy for bulk drops.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub uri: String,
    pub reserved_databases: ReservedDatabases,
}

impl ServerConfig {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            reserved_databases: ReservedDatabases::default(),
        }
    }

    /// Build configuration from environment variables:
    /// `MONGO_URI` (required) and `MONGO_RESERVED_DATABASES`
    /// (optional, comma-separated, default `admin,local`).
    pub fn from_env() -> Result<Self> {
        let uri = require_env("MONGO_URI")?;
        let reserved_databases = reserved_from(env::var("MONGO_RESERVED_DATABASES").ok());

        Ok(Self {
            uri,
            reserved_databases,
        })
    }

    pub fn reserved_databases(mut self, reserved: ReservedDatabases) -> Self {
        self.reserved_databases = reserved;
        self
    }

    /// Open an async driver client for the configured URI.
    pub async fn connect(&self) -> Result<mongodb::Client> {
        let client = mongodb::Client::with_uri_str(&self.uri).await?;
        Ok(client)
    }

    /// Open a blocking driver client for the configured URI.
    #[cfg(feature = "sync")]
    pub fn connect_sync(&self) -> Result<mongodb::sync::Client> {
        let client = mongodb::sync::Client::with_uri_str(&self.uri)?;
        Ok(client)
    }
}

/// A value naming no databases keeps the default set; reserving nothing
/// takes [`ReservedDatabases::none`] in code.
fn reserved_from(value: Option<String>) -> ReservedDatabases {
    value
        .map(|v| ReservedDatabases::parse(&v))
        .filter(|reserved| !reserved.names().is_empty())
        .unwrap_or_default()
}

fn require_env(key: &str) -> Result<String> {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(MongoExtError::Config(format!("missing env: {key}"))),
    }
}
