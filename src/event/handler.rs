use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::types::StorageObjectEvent;

/// Application callback for decoded storage object events.
///
/// `cancel` is the caller's cancellation context: it fires when the delivery
/// is abandoned or its deadline passes, and implementations should stop work
/// when it does. Errors are returned to the dispatcher's caller unchanged.
#[async_trait]
pub trait StorageObjectEventHandler: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn handle_storage_object_event(
        &self,
        cancel: &CancellationToken,
        event: StorageObjectEvent,
    ) -> Result<(), Self::Error>;
}
