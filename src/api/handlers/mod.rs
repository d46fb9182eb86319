mod admin;
mod objects;
mod pubsub;

use crate::api::response::ApiError;
use crate::catalog::CatalogError;
use crate::dispatcher::DispatchError;

pub use admin::{admin_purge, health};
pub use objects::{get_object, list_objects};
pub use pubsub::push_message;

/// Map a DispatchError to an ApiError
fn dispatch_error(e: DispatchError<CatalogError>) -> ApiError {
    if e.is_invalid_argument() {
        return ApiError::bad_request(e.to_string());
    }
    match e {
        DispatchError::Handler(CatalogError::Cancelled) => {
            ApiError::unavailable("Delivery was cancelled before it was handled")
        }
        _ => {
            tracing::error!(error = %e, "Storage event handler failed");
            ApiError::internal(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::dispatch_error;
    use crate::catalog::CatalogError;
    use crate::dispatcher::DispatchError;

    #[test]
    fn test_dispatch_error_status() {
        let unknown = dispatch_error(DispatchError::UnknownEventType("BOGUS".into()));
        assert_eq!(unknown.status, StatusCode::BAD_REQUEST);

        let cancelled = dispatch_error(DispatchError::Handler(CatalogError::Cancelled));
        assert_eq!(cancelled.status, StatusCode::SERVICE_UNAVAILABLE);

        let missing = dispatch_error(DispatchError::Handler(CatalogError::MissingObject));
        assert_eq!(missing.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(missing.message, "Event carries no storage object");
    }
}
