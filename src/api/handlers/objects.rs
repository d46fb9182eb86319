use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::response::{ApiError, AppQuery, JSend, JSendPaginated, Pagination};
use crate::catalog::models::{ObjectRecord, ObjectState};
use crate::event::StorageObjectEventType;
use crate::resource::{BucketName, ObjectName};
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ObjectResponse {
    pub bucket: String,
    pub content_type: String,
    pub crc32c: String,
    pub generation: i64,
    pub last_event: StorageObjectEventType,
    pub md5_hash: String,
    pub metadata: HashMap<String, String>,
    pub metageneration: i64,
    pub name: String,
    pub object: String,
    pub size: i64,
    pub state: ObjectState,
    pub storage_class: String,
    pub time_created: Option<String>,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct ListObjectsParams {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub prefix: Option<String>,
}

fn default_limit() -> u32 {
    100
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn get_object(
    State(state): State<Arc<AppState>>,
    Path((bucket, object)): Path<(String, String)>,
) -> Result<Json<JSend<ObjectResponse>>, ApiError> {
    let name = ObjectName::new(&state.config.project_id, bucket, object);
    let record = state
        .catalog
        .get_object(&name)
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Object not found"))?;

    Ok(JSend::success(record_to_response(&record)))
}

pub async fn list_objects(
    State(state): State<Arc<AppState>>,
    Path(bucket): Path<String>,
    AppQuery(params): AppQuery<ListObjectsParams>,
) -> Result<Json<JSendPaginated<ObjectResponse>>, ApiError> {
    if params.limit == 0 {
        return Err(ApiError::bad_request("limit must be greater than 0"));
    }

    let bucket = BucketName::new(&state.config.project_id, bucket);
    let records = state
        .catalog
        .list_objects(&bucket, params.prefix.as_deref())
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let total = records.len() as u64;
    let items: Vec<ObjectResponse> = records
        .iter()
        .skip(params.offset as usize)
        .take(params.limit as usize)
        .map(record_to_response)
        .collect();

    Ok(JSend::paginated(
        items,
        Pagination {
            limit: params.limit,
            offset: params.offset,
            total,
        },
    ))
}

// ============================================================================
// Helpers
// ============================================================================

fn record_to_response(record: &ObjectRecord) -> ObjectResponse {
    let object = &record.object;
    ObjectResponse {
        bucket: record.name.bucket_id.clone(),
        content_type: object.content_type.clone(),
        crc32c: object.crc32c.clone(),
        generation: object.generation,
        last_event: record.last_event,
        md5_hash: object.md5_hash.clone(),
        metadata: object.metadata.clone(),
        metageneration: object.metageneration,
        name: record.name.to_string(),
        object: record.name.key().to_string(),
        size: object.size,
        state: record.state,
        storage_class: object.storage_class.clone(),
        time_created: object.time_created.map(|t| t.to_rfc3339()),
        updated_at: record.updated_at.to_rfc3339(),
    }
}
