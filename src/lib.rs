//! Bulk administration helpers for the MongoDB Rust driver.
//!
//! Extension traits add name listing, collection existence checks and bulk
//! drops to [`mongodb::Database`] and [`mongodb::Client`]. Blocking variants
//! for `mongodb::sync` live in [`sync`] (driver impls need the `sync` feature).

pub mod admin;
pub mod config;
pub mod error;
pub mod handle;
pub mod meta;
pub mod sync;

#[cfg(test)]
mod memory;

pub use crate::admin::{AdminClient, ClientExt, DatabaseExt};
pub use crate::config::ServerConfig;
pub use crate::error::{DropFailure, MongoExtError};
pub use crate::handle::{ClientHandle, DatabaseHandle};
pub use crate::meta::{CollectionFilter, DatabaseNames, ReservedDatabases, validate_name};
pub use crate::sync::{SyncClientExt, SyncClientHandle, SyncDatabaseExt, SyncDatabaseHandle};
