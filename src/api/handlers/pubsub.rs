use axum::extract::State;
use axum::Json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::dispatch_error;
use crate::api::response::{ApiError, AppJson, JSend};
use crate::pubsub::PushPubsubMessageRequest;
use crate::AppState;

/// Receive one push delivery from a Pub/Sub subscription.
/// Route: POST /pubsub/push
///
/// Any 2xx acknowledges the message; everything else leaves it for redelivery.
pub async fn push_message(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<PushPubsubMessageRequest>,
) -> Result<Json<JSend<()>>, ApiError> {
    let cancel = CancellationToken::new();
    // Cancelled when this request is dropped, e.g. on client disconnect.
    let _guard = cancel.clone().drop_guard();

    let message_id = req.message.message_id.clone();
    let deadline = state.config.pubsub.ack_deadline;

    match tokio::time::timeout(deadline, state.service.push_pubsub_message(&cancel, req)).await {
        Ok(Ok(_)) => Ok(JSend::success(())),
        Ok(Err(e)) => Err(dispatch_error(e)),
        Err(_) => {
            cancel.cancel();
            tracing::warn!(
                message_id = %message_id,
                deadline_ms = deadline.as_millis() as u64,
                "Push delivery exceeded its ack deadline"
            );
            Err(ApiError::gateway_timeout(
                "Event handling did not finish within the ack deadline",
            ))
        }
    }
}
