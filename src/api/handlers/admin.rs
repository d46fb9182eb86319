use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use crate::api::response::{ApiError, JSend};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub project_id: String,
}

#[derive(Debug, Serialize)]
pub struct PurgeResponse {
    pub objects_deleted: u64,
    pub tombstones_deleted: u64,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<JSend<HealthResponse>> {
    JSend::success(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        project_id: state.config.project_id.clone(),
    })
}

/// Wipe the catalog. Only routed when `TEST_MODE` is on.
pub async fn admin_purge(
    State(state): State<Arc<AppState>>,
) -> Result<Json<JSend<PurgeResponse>>, ApiError> {
    let stats = state.catalog.purge_all().map_err(|e| {
        tracing::error!(error = %e, "Catalog purge failed");
        ApiError::internal(e.to_string())
    })?;

    tracing::warn!(
        objects = stats.objects,
        tombstones = stats.tombstones,
        "Purged catalog"
    );

    Ok(JSend::success(PurgeResponse {
        objects_deleted: stats.objects,
        tombstones_deleted: stats.tombstones,
    }))
}
