//! Typed storage object change events and the handler contract.

mod handler;
mod object;
mod types;

pub use handler::StorageObjectEventHandler;
pub use object::StorageObject;
pub use types::{
    ObjectEvent, StorageObjectArchivedEvent, StorageObjectDeletedEvent, StorageObjectEvent,
    StorageObjectEventType, StorageObjectFinalizedEvent, StorageObjectMetadataUpdatedEvent,
    UnknownEventType,
};
