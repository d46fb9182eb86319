use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::object::StorageObject;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown storage event type: {0:?}")]
pub struct UnknownEventType(pub String);

/// Notification kinds, named as they appear in the `eventType` message attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageObjectEventType {
    #[serde(rename = "OBJECT_FINALIZE")]
    ObjectFinalize,
    #[serde(rename = "OBJECT_ARCHIVE")]
    ObjectArchive,
    #[serde(rename = "OBJECT_DELETE")]
    ObjectDelete,
    #[serde(rename = "OBJECT_METADATA_UPDATE")]
    ObjectMetadataUpdate,
}

impl StorageObjectEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageObjectEventType::ObjectFinalize => "OBJECT_FINALIZE",
            StorageObjectEventType::ObjectArchive => "OBJECT_ARCHIVE",
            StorageObjectEventType::ObjectDelete => "OBJECT_DELETE",
            StorageObjectEventType::ObjectMetadataUpdate => "OBJECT_METADATA_UPDATE",
        }
    }
}

impl fmt::Display for StorageObjectEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageObjectEventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EVENT_TYPES
            .iter()
            .find(|(event_type, _)| event_type.as_str() == s)
            .map(|(event_type, _)| *event_type)
            .ok_or_else(|| UnknownEventType(s.to_string()))
    }
}

// ============================================================================
// Capability contract
// ============================================================================

/// Access to the storage object attached to an event.
pub trait ObjectEvent {
    /// The attached object, or `None` before one has been set.
    fn object(&self) -> Option<&StorageObject>;
    fn set_object(&mut self, object: StorageObject);
}

// ============================================================================
// Event variants
// ============================================================================

/// A new object (or a new generation of one) was successfully created.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorageObjectFinalizedEvent {
    pub object: Option<StorageObject>,
}

/// The live version of an object became noncurrent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorageObjectArchivedEvent {
    pub object: Option<StorageObject>,
}

/// An object was permanently deleted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorageObjectDeletedEvent {
    pub object: Option<StorageObject>,
}

/// The metadata of an existing object changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorageObjectMetadataUpdatedEvent {
    pub object: Option<StorageObject>,
}

macro_rules! impl_object_event {
    ($($ty:ty),*) => {
        $(
            impl ObjectEvent for $ty {
                fn object(&self) -> Option<&StorageObject> {
                    self.object.as_ref()
                }

                fn set_object(&mut self, object: StorageObject) {
                    self.object = Some(object);
                }
            }
        )*
    };
}

impl_object_event!(
    StorageObjectFinalizedEvent,
    StorageObjectArchivedEvent,
    StorageObjectDeletedEvent,
    StorageObjectMetadataUpdatedEvent
);

/// A storage object change notification of one of the four known kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageObjectEvent {
    Finalized(StorageObjectFinalizedEvent),
    Archived(StorageObjectArchivedEvent),
    Deleted(StorageObjectDeletedEvent),
    MetadataUpdated(StorageObjectMetadataUpdatedEvent),
}

/// Wire name -> empty event constructor.
const EVENT_TYPES: [(StorageObjectEventType, fn() -> StorageObjectEvent); 4] = [
    (StorageObjectEventType::ObjectFinalize, || {
        StorageObjectEvent::Finalized(StorageObjectFinalizedEvent::default())
    }),
    (StorageObjectEventType::ObjectArchive, || {
        StorageObjectEvent::Archived(StorageObjectArchivedEvent::default())
    }),
    (StorageObjectEventType::ObjectDelete, || {
        StorageObjectEvent::Deleted(StorageObjectDeletedEvent::default())
    }),
    (StorageObjectEventType::ObjectMetadataUpdate, || {
        StorageObjectEvent::MetadataUpdated(StorageObjectMetadataUpdatedEvent::default())
    }),
];

impl StorageObjectEvent {
    /// Build the empty event for an `eventType` attribute value.
    /// Matching is exact and case-sensitive.
    pub fn for_event_type(value: &str) -> Result<Self, UnknownEventType> {
        EVENT_TYPES
            .iter()
            .find(|(event_type, _)| event_type.as_str() == value)
            .map(|(_, new_event)| new_event())
            .ok_or_else(|| UnknownEventType(value.to_string()))
    }

    pub fn event_type(&self) -> StorageObjectEventType {
        match self {
            StorageObjectEvent::Finalized(_) => StorageObjectEventType::ObjectFinalize,
            StorageObjectEvent::Archived(_) => StorageObjectEventType::ObjectArchive,
            StorageObjectEvent::Deleted(_) => StorageObjectEventType::ObjectDelete,
            StorageObjectEvent::MetadataUpdated(_) => StorageObjectEventType::ObjectMetadataUpdate,
        }
    }

    fn as_object_event(&self) -> &dyn ObjectEvent {
        match self {
            StorageObjectEvent::Finalized(e) => e,
            StorageObjectEvent::Archived(e) => e,
            StorageObjectEvent::Deleted(e) => e,
            StorageObjectEvent::MetadataUpdated(e) => e,
        }
    }

    fn as_object_event_mut(&mut self) -> &mut dyn ObjectEvent {
        match self {
            StorageObjectEvent::Finalized(e) => e,
            StorageObjectEvent::Archived(e) => e,
            StorageObjectEvent::Deleted(e) => e,
            StorageObjectEvent::MetadataUpdated(e) => e,
        }
    }
}

impl ObjectEvent for StorageObjectEvent {
    fn object(&self) -> Option<&StorageObject> {
        self.as_object_event().object()
    }

    fn set_object(&mut self, object: StorageObject) {
        self.as_object_event_mut().set_object(object)
    }
}
