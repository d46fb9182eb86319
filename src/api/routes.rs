use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let message_limit = state.config.pubsub.max_message_size as usize;

    let mut router = Router::new()
        // Pub/Sub push endpoint
        .route(
            "/pubsub/push",
            post(handlers::push_message).layer(DefaultBodyLimit::max(message_limit)),
        )
        // Catalog
        .route("/buckets/:bucket/objects", get(handlers::list_objects))
        .route("/buckets/:bucket/objects/*object", get(handlers::get_object))
        // Internal
        .route("/_internal/health", get(handlers::health));

    // Test-only routes
    if state.config.test_mode {
        tracing::warn!("Test mode enabled, purge route is available.");
        router = router.route("/admin/purge", delete(handlers::admin_purge));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
