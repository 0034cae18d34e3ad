//! The uniform response envelope returned by every handler.
//!
//! API Gateway maps the envelope verbatim onto the HTTP response, therefore it
//! is serialized using the proxy integration field names:
//!
//! ```json
//! {"statusCode": 200, "headers": {"Content-Type": "application/json"}, "body": "{\"message\":\"...\"}"}
//! ```
//!
//! The body is serialized exactly once, here. Callers hand in structured values
//! only. A value which serializes into a bare JSON string is rejected, as this
//! is what an already serialized payload looks like and passing it on would
//! yield a double encoded body.

use crate::web::error::ApiError;
use anyhow::Context;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const HEADER_ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";

const CONTENT_TYPE_JSON: &str = "application/json";
const ALLOW_ANY_ORIGIN: &str = "*";

/// A status code, JSON body and headers as expected by API Gateway.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    status_code: u16,
    headers: BTreeMap<String, String>,
    body: String,
}

impl Response {
    /// Builds an envelope with the default headers and the given body serialized to JSON.
    ///
    /// # Errors
    ///
    /// Fails if the status is not within `100..=599`, if the body cannot be
    /// serialized or if it is a plain string rather than a structured value.
    pub fn json<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> anyhow::Result<Response> {
        anyhow::ensure!(
            status.as_u16() <= 599,
            "Invalid status code for a response: {}",
            status.as_u16()
        );

        let value = serde_json::to_value(body).context("Failed to serialize response body")?;
        if let Value::String(_) = value {
            anyhow::bail!("Refusing to encode a pre-serialized string as response body");
        }

        let body = serde_json::to_string(&value).context("Failed to serialize response body")?;

        let mut headers = BTreeMap::new();
        headers.insert(HEADER_CONTENT_TYPE.to_string(), CONTENT_TYPE_JSON.to_string());
        headers.insert(HEADER_ALLOW_ORIGIN.to_string(), ALLOW_ANY_ORIGIN.to_string());

        Ok(Response {
            status_code: status.as_u16(),
            headers,
            body,
        })
    }

    /// Shorthand for a `200 OK` envelope.
    pub fn ok<T: Serialize + ?Sized>(body: &T) -> anyhow::Result<Response> {
        Self::json(StatusCode::OK, body)
    }

    /// Converts an error chain into an envelope carrying `{"message": ...}`.
    ///
    /// The status is taken from the attached [`ApiError`], defaulting to 500.
    pub fn from_error(err: &anyhow::Error) -> anyhow::Result<Response> {
        let api_error = ApiError::from_error(err);
        Self::json(api_error.status, &api_error)
    }

    /// Adds or replaces a header. Names are compared case-insensitively so
    /// that `content-type` replaces the default `Content-Type`.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers
            .retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
        self
    }

    /// Merges the given headers on top of the present ones.
    pub fn with_headers<K, V>(self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        headers
            .into_iter()
            .fold(self, |response, (name, value)| response.with_header(name, value))
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Returns the value of a header, ignoring the case of its name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the serialized JSON body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Parses the body back into a JSON value.
    pub fn body_json(&self) -> anyhow::Result<Value> {
        serde_json::from_str(&self.body).context("Response body is not valid JSON")
    }
}
