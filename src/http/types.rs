use axum::http::StatusCode;

use crate::domain::store::StoreError;

/// Map a store failure onto a response: malformed date/time input is the
/// caller's fault, anything touching the backing store is ours.
pub fn store_error(e: StoreError) -> (StatusCode, String) {
    match e {
        StoreError::InvalidDateTimeFormat { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
        StoreError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}
