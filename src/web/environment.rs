//! Derives the environment label of a request from its API Gateway stage.

use crate::web::request::Request;

/// Label used when a request carries no stage.
pub const DEFAULT_ENVIRONMENT: &str = "dev";

/// Returns the lowercased stage of the request, or [`DEFAULT_ENVIRONMENT`].
pub fn resolve_environment(request: &Request) -> String {
    request
        .stage()
        .unwrap_or(DEFAULT_ENVIRONMENT)
        .to_lowercase()
}
