use chrono::Utc;
use redb::ReadableTable;

use super::db::{Catalog, DatabaseError};
use super::models::{Applied, ObjectRecord, ObjectState, PurgeStats};
use super::tables::*;
use crate::event::{StorageObject, StorageObjectEventType};
use crate::resource::{BucketName, ObjectName};

impl Catalog {
    // ========================================================================
    // Object operations
    // ========================================================================

    /// Apply one storage event for `name`, ignoring it if the catalog already
    /// holds a newer version of the object.
    ///
    /// Deletes leave a tombstone so that a late event for the deleted
    /// generation cannot bring the object back.
    pub fn apply_event(
        &self,
        name: &ObjectName,
        event_type: StorageObjectEventType,
        object: &StorageObject,
    ) -> Result<Applied, DatabaseError> {
        let key = name.to_string();
        let write_txn = self.begin_write()?;

        let applied = {
            let mut table = write_txn.open_table(OBJECTS)?;
            let existing: Option<ObjectRecord> = match table.get(key.as_str())? {
                Some(data) => Some(rmp_serde::from_slice(data.value())?),
                None => None,
            };

            let stale = existing.as_ref().is_some_and(|record| {
                match (record.state, event_type) {
                    // A delete removes the whole generation, whatever its metageneration.
                    (_, StorageObjectEventType::ObjectDelete) => {
                        record.object.generation > object.generation
                    }
                    (ObjectState::Deleted, _) => record.object.generation >= object.generation,
                    _ => record.object.version() > object.version(),
                }
            });

            let (state, outcome) = match event_type {
                StorageObjectEventType::ObjectDelete => (ObjectState::Deleted, Applied::Removed),
                StorageObjectEventType::ObjectArchive => (ObjectState::Archived, Applied::Stored),
                _ => (ObjectState::Live, Applied::Stored),
            };

            if stale {
                Applied::Stale
            } else {
                let record = ObjectRecord {
                    name: name.clone(),
                    object: object.clone(),
                    state,
                    last_event: event_type,
                    updated_at: Utc::now(),
                };
                let data = rmp_serde::to_vec_named(&record)?;
                table.insert(key.as_str(), data.as_slice())?;
                outcome
            }
        };

        write_txn.commit()?;
        Ok(applied)
    }

    pub fn get_object(&self, name: &ObjectName) -> Result<Option<ObjectRecord>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(OBJECTS)?;

        match table.get(name.to_string().as_str())? {
            Some(data) => {
                let record: ObjectRecord = rmp_serde::from_slice(data.value())?;
                Ok((record.state != ObjectState::Deleted).then_some(record))
            }
            None => Ok(None),
        }
    }

    /// List a bucket's objects in name order, optionally restricted to object
    /// ids starting with `prefix`.
    pub fn list_objects(
        &self,
        bucket: &BucketName,
        prefix: Option<&str>,
    ) -> Result<Vec<ObjectRecord>, DatabaseError> {
        let start = format!("{}{}", bucket.objects_prefix(), prefix.unwrap_or_default());
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(OBJECTS)?;

        let mut records = Vec::new();
        for result in table.range(start.as_str()..)? {
            let (key, value) = result?;
            if !key.value().starts_with(start.as_str()) {
                break;
            }
            let record: ObjectRecord = rmp_serde::from_slice(value.value())?;
            if record.state != ObjectState::Deleted {
                records.push(record);
            }
        }

        Ok(records)
    }

    /// Drop every record, tombstones included. Test mode only.
    pub fn purge_all(&self) -> Result<PurgeStats, DatabaseError> {
        let write_txn = self.begin_write()?;
        let mut stats = PurgeStats::default();
        {
            let table = write_txn.open_table(OBJECTS)?;
            for result in table.iter()? {
                let (_, value) = result?;
                let record: ObjectRecord = rmp_serde::from_slice(value.value())?;
                match record.state {
                    ObjectState::Deleted => stats.tombstones += 1,
                    _ => stats.objects += 1,
                }
            }
        }
        write_txn.delete_table(OBJECTS)?;
        write_txn.open_table(OBJECTS)?;
        write_txn.commit()?;
        Ok(stats)
    }
}
