//! Error types and helpers for mapping errors to HTTP responses.
//!
//! The [`ApiError`] type carries both an HTTP status code and a message.
//! Use [`ResultExt`] to attach status codes to `anyhow::Error` chains,
//! or the [`client_bail!`](crate::client_bail) and
//! [`status_bail!`](crate::status_bail) macros for early returns.
//! [`ApiError::from_error`] recovers the status of any such chain.

use http::StatusCode;
use serde::Serialize;
use std::fmt::{Debug, Display, Formatter};

/// An error that is returned to the caller as a JSON envelope.
///
/// Serializes as `{"message": "..."}`; the `status` becomes the status code
/// of the envelope.
#[derive(Clone, Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// HTTP status code for the response (not serialized).
    #[serde(skip)]
    pub status: StatusCode,
    /// Human-readable error message.
    pub message: String,
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Creates a new API error with the given HTTP status and message.
    pub fn new(status: StatusCode, message: impl ToString) -> Self {
        ApiError {
            status,
            message: message.to_string(),
        }
    }

    /// Determines the API error for an arbitrary error chain.
    ///
    /// The outermost [`ApiError`] attached via [`ResultExt`] wins. Errors without
    /// one are reported as `500 Internal Server Error` carrying the whole chain.
    pub fn from_error(err: &anyhow::Error) -> ApiError {
        match err.downcast_ref::<ApiError>() {
            Some(api_error) => api_error.clone(),
            None => ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", err)),
        }
    }
}

/// Extension trait for attaching HTTP status codes to error results.
pub trait ResultExt<T> {
    /// Wraps the error with an [`ApiError`] carrying the given status code.
    fn with_status(self, status: StatusCode) -> Result<T, anyhow::Error>;

    /// Convenience method for `with_status(StatusCode::BAD_REQUEST)`.
    fn mark_client_error(self) -> Result<T, anyhow::Error>;
}

impl<T> ResultExt<T> for Result<T, anyhow::Error> {
    fn with_status(self, status: StatusCode) -> Result<T, anyhow::Error> {
        match self {
            Ok(t) => Ok(t),
            Err(err) => {
                let message = format!("{:#}", err);
                Err(err.context(ApiError { status, message }))
            }
        }
    }

    fn mark_client_error(self) -> Result<T, anyhow::Error> {
        self.with_status(StatusCode::BAD_REQUEST)
    }
}

/// Early return with a 400 Bad Request error.
#[macro_export]
macro_rules! client_bail {
    ($err:expr $(,)?) => {
        return $crate::web::error::ResultExt::mark_client_error(Err(::anyhow::anyhow!($err)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return $crate::web::error::ResultExt::mark_client_error(Err(::anyhow::anyhow!($fmt, $($arg)*)))
    };
}

/// Early return with a custom HTTP status code.
#[macro_export]
macro_rules! status_bail {
    ($status:expr, $msg:literal $(,)?) => {
        return $crate::web::error::ResultExt::with_status(Err(::anyhow::anyhow!($msg)), $status)
    };
    ($status:expr, $fmt:literal, $($arg:tt)*) => {
        return $crate::web::error::ResultExt::with_status(Err(::anyhow::anyhow!($fmt, $($arg)*)), $status)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    fn not_found(id: &str) -> anyhow::Result<()> {
        status_bail!(StatusCode::NOT_FOUND, "Item with ID {} not found", id);
    }

    fn missing_id() -> anyhow::Result<()> {
        client_bail!("User ID is required");
    }

    #[test]
    fn status_bail_attaches_status_and_message() {
        let err = not_found("42").unwrap_err();
        let api_error = ApiError::from_error(&err);

        assert_eq!(api_error.status, StatusCode::NOT_FOUND);
        assert_eq!(api_error.message, "Item with ID 42 not found");
    }

    #[test]
    fn client_bail_yields_bad_request() {
        let api_error = ApiError::from_error(&missing_id().unwrap_err());

        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.message, "User ID is required");
    }

    #[test]
    fn with_status_keeps_the_full_context_chain() {
        let result: anyhow::Result<()> = Err(anyhow::anyhow!("connection refused"));
        let err = result
            .context("Error retrieving item")
            .with_status(StatusCode::INTERNAL_SERVER_ERROR)
            .unwrap_err();

        assert_eq!(
            ApiError::from_error(&err).message,
            "Error retrieving item: connection refused"
        );
    }

    #[test]
    fn untagged_errors_become_internal_errors() {
        let err = anyhow::anyhow!("boom").context("Failed to do things");
        let api_error = ApiError::from_error(&err);

        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.message, "Failed to do things: boom");
    }

    #[test]
    fn api_error_serializes_only_the_message() {
        let api_error = ApiError::new(StatusCode::NOT_FOUND, "gone");

        assert_eq!(
            serde_json::to_value(&api_error).unwrap(),
            serde_json::json!({ "message": "gone" })
        );
    }
}
