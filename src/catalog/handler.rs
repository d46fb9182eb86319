use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::db::{Catalog, DatabaseError};
use super::models::Applied;
use crate::event::{ObjectEvent, StorageObjectEvent, StorageObjectEventHandler};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Event handling was cancelled")]
    Cancelled,
    #[error("Event carries no storage object")]
    MissingObject,
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Keeps the catalog in step with the storage event stream.
pub struct CatalogHandler {
    catalog: Catalog,
    project_id: String,
}

impl CatalogHandler {
    pub fn new(catalog: Catalog, project_id: impl Into<String>) -> Self {
        Self {
            catalog,
            project_id: project_id.into(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

#[async_trait]
impl StorageObjectEventHandler for CatalogHandler {
    type Error = CatalogError;

    async fn handle_storage_object_event(
        &self,
        cancel: &CancellationToken,
        event: StorageObjectEvent,
    ) -> Result<(), CatalogError> {
        if cancel.is_cancelled() {
            return Err(CatalogError::Cancelled);
        }

        let object = event.object().ok_or(CatalogError::MissingObject)?;
        let name = object.object_name(&self.project_id);
        let event_type = event.event_type();

        match self.catalog.apply_event(&name, event_type, object)? {
            Applied::Stale => {
                tracing::debug!(
                    object = %name,
                    event_type = %event_type,
                    generation = object.generation,
                    metageneration = object.metageneration,
                    "Ignoring stale storage event"
                );
            }
            applied => {
                tracing::info!(
                    object = %name,
                    event_type = %event_type,
                    generation = object.generation,
                    ?applied,
                    "Applied storage event"
                );
            }
        }

        Ok(())
    }
}
