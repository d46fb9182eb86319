use storage_events::catalog::models::{Applied, ObjectState, PurgeStats};
use storage_events::catalog::{Catalog, CatalogError, CatalogHandler};
use storage_events::event::{
    ObjectEvent, StorageObject, StorageObjectEvent, StorageObjectEventHandler,
    StorageObjectEventType,
};
use storage_events::resource::{BucketName, ObjectName};
use tokio_util::sync::CancellationToken;

fn test_catalog() -> (tempfile::TempDir, Catalog) {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::open(dir.path().join("data")).unwrap();
    (dir, catalog)
}

fn sample_object(bucket: &str, name: &str, generation: i64, metageneration: i64) -> StorageObject {
    StorageObject {
        bucket: bucket.to_string(),
        name: name.to_string(),
        generation,
        metageneration,
        size: 512,
        content_type: "image/png".to_string(),
        ..Default::default()
    }
}

fn event(event_type: &str, object: StorageObject) -> StorageObjectEvent {
    let mut event = StorageObjectEvent::for_event_type(event_type).unwrap();
    event.set_object(object);
    event
}

#[test]
fn test_finalize_stores_live_record() {
    let (_dir, catalog) = test_catalog();
    let object = sample_object("b1", "cat.png", 1, 1);
    let name = object.object_name("p");

    let applied = catalog
        .apply_event(&name, StorageObjectEventType::ObjectFinalize, &object)
        .unwrap();
    assert_eq!(applied, Applied::Stored);

    let record = catalog.get_object(&name).unwrap().expect("record should exist");
    assert_eq!(record.name, name);
    assert_eq!(record.object, object);
    assert_eq!(record.state, ObjectState::Live);
    assert_eq!(record.last_event, StorageObjectEventType::ObjectFinalize);
}

#[test]
fn test_get_object_not_found() {
    let (_dir, catalog) = test_catalog();
    let name = ObjectName::new("p", "b1", "missing");
    assert!(catalog.get_object(&name).unwrap().is_none());
}

#[test]
fn test_archive_marks_record_archived() {
    let (_dir, catalog) = test_catalog();
    let object = sample_object("b1", "cat.png", 1, 1);
    let name = object.object_name("p");

    catalog
        .apply_event(&name, StorageObjectEventType::ObjectFinalize, &object)
        .unwrap();
    catalog
        .apply_event(&name, StorageObjectEventType::ObjectArchive, &object)
        .unwrap();

    let record = catalog.get_object(&name).unwrap().unwrap();
    assert_eq!(record.state, ObjectState::Archived);
    assert_eq!(record.last_event, StorageObjectEventType::ObjectArchive);
}

#[test]
fn test_delete_removes_record() {
    let (_dir, catalog) = test_catalog();
    let object = sample_object("b1", "cat.png", 1, 1);
    let name = object.object_name("p");

    catalog
        .apply_event(&name, StorageObjectEventType::ObjectFinalize, &object)
        .unwrap();
    let applied = catalog
        .apply_event(&name, StorageObjectEventType::ObjectDelete, &object)
        .unwrap();
    assert_eq!(applied, Applied::Removed);
    assert!(catalog.get_object(&name).unwrap().is_none());
}

#[test]
fn test_archive_of_old_generation_after_overwrite_is_stale() {
    let (_dir, catalog) = test_catalog();
    let old = sample_object("b1", "cat.png", 1, 1);
    let new = sample_object("b1", "cat.png", 2, 1);
    let name = new.object_name("p");

    catalog
        .apply_event(&name, StorageObjectEventType::ObjectFinalize, &new)
        .unwrap();
    let applied = catalog
        .apply_event(&name, StorageObjectEventType::ObjectArchive, &old)
        .unwrap();
    assert_eq!(applied, Applied::Stale);

    let record = catalog.get_object(&name).unwrap().unwrap();
    assert_eq!(record.object.generation, 2);
    assert_eq!(record.state, ObjectState::Live);
}

#[test]
fn test_older_metadata_update_is_stale() {
    let (_dir, catalog) = test_catalog();
    let newer = sample_object("b1", "cat.png", 5, 3);
    let older = sample_object("b1", "cat.png", 5, 2);
    let name = newer.object_name("p");

    catalog
        .apply_event(&name, StorageObjectEventType::ObjectMetadataUpdate, &newer)
        .unwrap();
    let applied = catalog
        .apply_event(&name, StorageObjectEventType::ObjectMetadataUpdate, &older)
        .unwrap();
    assert_eq!(applied, Applied::Stale);
    assert_eq!(
        catalog.get_object(&name).unwrap().unwrap().object.metageneration,
        3
    );
}

#[test]
fn test_delete_ignores_metageneration() {
    let (_dir, catalog) = test_catalog();
    let updated = sample_object("b1", "cat.png", 5, 4);
    let deleted = sample_object("b1", "cat.png", 5, 1);
    let name = updated.object_name("p");

    catalog
        .apply_event(&name, StorageObjectEventType::ObjectMetadataUpdate, &updated)
        .unwrap();
    let applied = catalog
        .apply_event(&name, StorageObjectEventType::ObjectDelete, &deleted)
        .unwrap();
    assert_eq!(applied, Applied::Removed);
}

#[test]
fn test_delete_of_older_generation_is_stale() {
    let (_dir, catalog) = test_catalog();
    let live = sample_object("b1", "cat.png", 9, 1);
    let old = sample_object("b1", "cat.png", 8, 1);
    let name = live.object_name("p");

    catalog
        .apply_event(&name, StorageObjectEventType::ObjectFinalize, &live)
        .unwrap();
    let applied = catalog
        .apply_event(&name, StorageObjectEventType::ObjectDelete, &old)
        .unwrap();
    assert_eq!(applied, Applied::Stale);
    assert!(catalog.get_object(&name).unwrap().is_some());
}

#[test]
fn test_late_events_after_delete_are_stale() {
    let (_dir, catalog) = test_catalog();
    let object = sample_object("b1", "cat.png", 5, 1);
    let name = object.object_name("p");

    catalog
        .apply_event(&name, StorageObjectEventType::ObjectFinalize, &object)
        .unwrap();
    catalog
        .apply_event(&name, StorageObjectEventType::ObjectDelete, &object)
        .unwrap();

    let applied = catalog
        .apply_event(&name, StorageObjectEventType::ObjectFinalize, &object)
        .unwrap();
    assert_eq!(applied, Applied::Stale);

    let updated = sample_object("b1", "cat.png", 5, 2);
    let applied = catalog
        .apply_event(&name, StorageObjectEventType::ObjectMetadataUpdate, &updated)
        .unwrap();
    assert_eq!(applied, Applied::Stale);

    assert!(catalog.get_object(&name).unwrap().is_none());
    assert!(catalog
        .list_objects(&BucketName::new("p", "b1"), None)
        .unwrap()
        .is_empty());
}

#[test]
fn test_newer_generation_after_delete_is_live() {
    let (_dir, catalog) = test_catalog();
    let old = sample_object("b1", "cat.png", 5, 1);
    let new = sample_object("b1", "cat.png", 6, 1);
    let name = old.object_name("p");

    catalog
        .apply_event(&name, StorageObjectEventType::ObjectDelete, &old)
        .unwrap();
    let applied = catalog
        .apply_event(&name, StorageObjectEventType::ObjectFinalize, &new)
        .unwrap();
    assert_eq!(applied, Applied::Stored);

    let record = catalog.get_object(&name).unwrap().unwrap();
    assert_eq!(record.state, ObjectState::Live);
    assert_eq!(record.object.generation, 6);
}

#[test]
fn test_list_objects_is_scoped_to_bucket_and_prefix() {
    let (_dir, catalog) = test_catalog();
    for (bucket, name) in [
        ("b1", "docs/a.txt"),
        ("b1", "docs/b.txt"),
        ("b1", "images/c.png"),
        ("b10", "docs/z.txt"),
        ("b2", "docs/a.txt"),
    ] {
        let object = sample_object(bucket, name, 1, 1);
        catalog
            .apply_event(
                &object.object_name("p"),
                StorageObjectEventType::ObjectFinalize,
                &object,
            )
            .unwrap();
    }

    let bucket = BucketName::new("p", "b1");
    let all: Vec<String> = catalog
        .list_objects(&bucket, None)
        .unwrap()
        .into_iter()
        .map(|r| r.name.key().to_string())
        .collect();
    assert_eq!(all, vec!["docs/a.txt", "docs/b.txt", "images/c.png"]);

    let docs = catalog.list_objects(&bucket, Some("docs/")).unwrap();
    assert_eq!(docs.len(), 2);

    let other_project = BucketName::new("q", "b1");
    assert!(catalog.list_objects(&other_project, None).unwrap().is_empty());
}

#[test]
fn test_purge_all() {
    let (_dir, catalog) = test_catalog();
    for name in ["one", "two"] {
        let object = sample_object("b1", name, 1, 1);
        catalog
            .apply_event(
                &object.object_name("p"),
                StorageObjectEventType::ObjectFinalize,
                &object,
            )
            .unwrap();
    }

    let gone = sample_object("b1", "gone", 1, 1);
    catalog
        .apply_event(
            &gone.object_name("p"),
            StorageObjectEventType::ObjectDelete,
            &gone,
        )
        .unwrap();

    let stats = catalog.purge_all().unwrap();
    assert_eq!(
        stats,
        PurgeStats {
            objects: 2,
            tombstones: 1
        }
    );
    assert!(catalog
        .list_objects(&BucketName::new("p", "b1"), None)
        .unwrap()
        .is_empty());

    // The deleted generation is no longer remembered after a purge.
    let applied = catalog
        .apply_event(
            &gone.object_name("p"),
            StorageObjectEventType::ObjectFinalize,
            &gone,
        )
        .unwrap();
    assert_eq!(applied, Applied::Stored);
}

#[test]
fn test_catalog_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let object = sample_object("b1", "persist.bin", 3, 1);
    let name = object.object_name("p");
    {
        let catalog = Catalog::open(dir.path()).unwrap();
        catalog
            .apply_event(&name, StorageObjectEventType::ObjectFinalize, &object)
            .unwrap();
    }

    let catalog = Catalog::open(dir.path()).unwrap();
    assert_eq!(catalog.get_object(&name).unwrap().unwrap().object, object);
}

// ============================================================================
// CatalogHandler tests
// ============================================================================

#[tokio::test]
async fn test_handler_applies_events_in_project() {
    let (_dir, catalog) = test_catalog();
    let handler = CatalogHandler::new(catalog.clone(), "proj");
    let cancel = CancellationToken::new();

    handler
        .handle_storage_object_event(
            &cancel,
            event("OBJECT_FINALIZE", sample_object("b1", "obj1", 1, 1)),
        )
        .await
        .unwrap();

    let name = ObjectName::new("proj", "b1", "obj1");
    assert!(catalog.get_object(&name).unwrap().is_some());

    handler
        .handle_storage_object_event(
            &cancel,
            event("OBJECT_DELETE", sample_object("b1", "obj1", 1, 1)),
        )
        .await
        .unwrap();
    assert!(catalog.get_object(&name).unwrap().is_none());
}

#[tokio::test]
async fn test_handler_respects_cancellation() {
    let (_dir, catalog) = test_catalog();
    let handler = CatalogHandler::new(catalog.clone(), "proj");
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = handler
        .handle_storage_object_event(
            &cancel,
            event("OBJECT_FINALIZE", sample_object("b1", "obj1", 1, 1)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Cancelled));
    assert!(catalog
        .get_object(&ObjectName::new("proj", "b1", "obj1"))
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_handler_rejects_event_without_object() {
    let (_dir, catalog) = test_catalog();
    let handler = CatalogHandler::new(catalog, "proj");

    let empty = StorageObjectEvent::for_event_type("OBJECT_FINALIZE").unwrap();
    let err = handler
        .handle_storage_object_event(&CancellationToken::new(), empty)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::MissingObject));
}
