use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::store::StoreError;

/// Response body for lookups that match nothing the caller owns.
pub const NOT_FOUND_MESSAGE: &str = "Item not found";

/// A general purpose HTTP error type that can be converted into an `IntoResponse`.
///
/// The body is a fixed plain-text message; internal details only go to the log.
#[derive(Debug)]
pub struct HTTPError {
    status: StatusCode,
    message: String,
}

impl HTTPError {
    /// Creates a new HTTP error with the given status code and message.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        HTTPError {
            status,
            message: message.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

/// Converts our `HTTPError` into an HTTP response.
impl IntoResponse for HTTPError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

/// Maps store errors to a 500 with the given fixed message, logging the cause.
pub fn map_store_error(message: &'static str) -> impl FnOnce(StoreError) -> HTTPError {
    move |e| {
        error!(error = %e, "{}", message);
        HTTPError::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_become_fixed_500() {
        let err = map_store_error("Error loading item")(StoreError::Unavailable(
            "connection refused".to_string(),
        ));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Error loading item");
    }

    #[test]
    fn test_not_found() {
        let response = HTTPError::not_found().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
