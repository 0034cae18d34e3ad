//! Checks on the path parameters of a request.
//!
//! Identifiers are passed to the stores as is: any non-empty value is looked
//! up, so that an unknown id yields 404 rather than a rejection.

use crate::client_bail;

/// Fetches a required path parameter.
///
/// A missing or empty parameter is a client error (400) carrying
/// `missing_message`.
pub fn require_id<'a>(value: Option<&'a str>, missing_message: &str) -> anyhow::Result<&'a str> {
    match value {
        Some(id) if !id.is_empty() => Ok(id),
        _ => client_bail!("{}", missing_message),
    }
}
