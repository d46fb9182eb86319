use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::{StorageObject, StorageObjectEventType};
use crate::resource::ObjectName;

/// Whether the recorded generation is the object's live version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectState {
    Live,
    Archived,
    /// Tombstone for a deleted generation. Never returned by reads.
    Deleted,
}

/// Latest known state of one object, as stored in redb
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub name: ObjectName,
    pub object: StorageObject,
    pub state: ObjectState,
    pub last_event: StorageObjectEventType,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of applying one event to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Stored,
    Removed,
    /// The catalog already holds a newer version of the object.
    Stale,
}

/// Rows removed by a purge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeStats {
    pub objects: u64,
    pub tombstones: u64,
}
