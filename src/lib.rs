//! storage-events - typed dispatch of cloud storage change notifications
//!
//! This crate provides:
//! - Project / bucket / object resource names with key and parent derivation
//! - Typed storage object events (finalize, archive, delete, metadata update)
//! - A Pub/Sub push dispatcher that decodes notifications and invokes a handler
//! - An object catalog handler persisted in redb, served over a REST API

pub mod api;
pub mod catalog;
pub mod config;
pub mod dispatcher;
pub mod event;
pub mod pubsub;
pub mod resource;
#[cfg(test)]
pub mod testutil;

use catalog::{Catalog, CatalogHandler};
use config::Config;
use dispatcher::StorageEventPubsubService;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub catalog: Catalog,
    pub service: StorageEventPubsubService<CatalogHandler>,
}

impl AppState {
    pub fn new(config: Config, catalog: Catalog) -> Self {
        let handler = CatalogHandler::new(catalog.clone(), config.project_id.clone());
        Self {
            config,
            catalog,
            service: StorageEventPubsubService::new(handler),
        }
    }
}
