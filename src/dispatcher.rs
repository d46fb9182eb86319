//! Turns Pub/Sub deliveries into typed storage object events.

use serde_json::error::Category;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::event::{ObjectEvent, StorageObject, StorageObjectEvent, StorageObjectEventHandler};
use crate::pubsub::{PushPubsubMessageRequest, PushPubsubMessageResponse};

/// Message attribute that names the notification kind.
pub const EVENT_TYPE_ATTRIBUTE: &str = "eventType";

#[derive(Debug, Error)]
pub enum DispatchError<E> {
    #[error("Unknown storage event type: {0:?}")]
    UnknownEventType(String),
    #[error("Malformed storage object payload: {kind} error at line {line}, column {column}")]
    PayloadDecode {
        kind: &'static str,
        line: usize,
        column: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Handler(E),
}

impl<E> DispatchError<E> {
    /// Whether the delivery itself is bad. Redelivering it cannot succeed.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            DispatchError::UnknownEventType(_) | DispatchError::PayloadDecode { .. }
        )
    }

    fn payload_decode(source: serde_json::Error) -> Self {
        let kind = match source.classify() {
            Category::Io => "io",
            Category::Syntax => "syntax",
            Category::Data => "data",
            Category::Eof => "eof",
        };
        DispatchError::PayloadDecode {
            kind,
            line: source.line(),
            column: source.column(),
            source,
        }
    }
}

/// Pub/Sub push service that dispatches storage notifications to a handler.
pub struct StorageEventPubsubService<H> {
    handler: H,
}

impl<H: StorageObjectEventHandler> StorageEventPubsubService<H> {
    pub fn new(handler: H) -> Self {
        Self { handler }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Classify, decode and hand one delivery to the handler.
    ///
    /// The handler runs at most once, and only with a fully decoded event.
    pub async fn push_pubsub_message(
        &self,
        cancel: &CancellationToken,
        request: PushPubsubMessageRequest,
    ) -> Result<PushPubsubMessageResponse, DispatchError<H::Error>> {
        let message = request.message;
        let event_type = message.attribute(EVENT_TYPE_ATTRIBUTE).unwrap_or_default();

        let mut event = StorageObjectEvent::for_event_type(event_type).map_err(|e| {
            tracing::warn!(
                event_type = %e.0,
                message_id = %message.message_id,
                "Rejecting message with unknown event type"
            );
            DispatchError::<H::Error>::UnknownEventType(e.0)
        })?;

        let object: StorageObject = serde_json::from_slice(&message.data).map_err(|e| {
            let err = DispatchError::<H::Error>::payload_decode(e);
            tracing::warn!(
                event_type = %event_type,
                message_id = %message.message_id,
                error = %err,
                "Rejecting message with malformed payload"
            );
            err
        })?;

        tracing::debug!(
            event_type = %event_type,
            bucket = %object.bucket,
            object = %object.name,
            generation = object.generation,
            message_id = %message.message_id,
            "Dispatching storage object event"
        );

        event.set_object(object);
        self.handler
            .handle_storage_object_event(cancel, event)
            .await
            .map_err(DispatchError::Handler)?;

        Ok(PushPubsubMessageResponse::default())
    }
}
