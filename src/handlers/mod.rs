//! The greeting endpoints.
//!
//! A [`Handler`] returns the JSON body of a successful (200) response. Every
//! other outcome is an error carrying an [`ApiError`](crate::web::error::ApiError)
//! status, which [`into_response`] turns into the matching envelope.
//!
//! | Handler | Lookup | Path parameter |
//! |---------|--------|----------------|
//! | [`hello::HelloHandler`] | – | – |
//! | [`goodbye::GoodbyeHandler`] | – | – |
//! | [`hello_item::HelloItemHandler`] | item store | `itemId` |
//! | [`goodbye_item::GoodbyeItemHandler`] | item store | `id` |

use crate::status_bail;
use crate::store::{Item, ItemStore, LookupOutcome};
use crate::web::error::ApiError;
use crate::web::request::Request;
use crate::web::response::Response;
use crate::web::validation::require_id;
use async_trait::async_trait;
use http::StatusCode;
use serde_json::Value;

pub mod goodbye;
pub mod goodbye_item;
pub mod hello;
pub mod hello_item;

#[async_trait]
pub trait Handler: Send + Sync {
    /// Name of the endpoint, used in logs.
    fn name(&self) -> &'static str;

    async fn handle(&self, request: &Request) -> anyhow::Result<Value>;
}

/// Runs the handler and wraps its outcome into an envelope.
///
/// # Errors
///
/// Only fails if the envelope itself cannot be built.
pub async fn respond(handler: &dyn Handler, request: &Request) -> anyhow::Result<Response> {
    into_response(handler.handle(request).await)
}

/// Converts the result of a handler into an envelope.
pub fn into_response(result: anyhow::Result<Value>) -> anyhow::Result<Response> {
    match result {
        Ok(body) => Response::ok(&body),
        Err(err) => {
            let api_error = ApiError::from_error(&err);
            if api_error.status.is_server_error() {
                tracing::error!("Request failed: {:#}", err);
            } else {
                tracing::info!("Request rejected: {}", api_error);
            }

            Response::from_error(&err)
        }
    }
}

/// Describes the path parameter an item endpoint is addressed by.
pub(crate) struct ItemParameter {
    pub name: &'static str,
    pub missing_message: &'static str,
    pub failure_context: &'static str,
}

/// Resolves the item addressed by the request with at most one store read.
///
/// Missing ids are rejected (400) without touching the store, unknown ids
/// yield 404 and failing stores 500.
pub(crate) async fn find_required_item(
    store: &dyn ItemStore,
    request: &Request,
    parameter: &ItemParameter,
) -> anyhow::Result<Item> {
    let id = require_id(request.path_param(parameter.name), parameter.missing_message)?;

    let outcome = LookupOutcome::from(store.find_item(id).await);
    tracing::debug!("Lookup of '{}' in {} store: {}", id, store.kind(), outcome);

    match outcome {
        LookupOutcome::Found(item) => Ok(item),
        LookupOutcome::NotFound => {
            status_bail!(StatusCode::NOT_FOUND, "Item with ID {} not found", id)
        }
        LookupOutcome::AdapterError(message) => status_bail!(
            StatusCode::INTERNAL_SERVER_ERROR,
            "{}: {}",
            parameter.failure_context,
            message
        ),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::store::{Item, ItemStore};
    use crate::web::request::Request;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts lookups and answers them from a fixed set of items.
    #[derive(Default)]
    pub struct CountingStore {
        items: HashMap<String, Item>,
        lookups: AtomicUsize,
    }

    impl CountingStore {
        pub fn with_items(items: &[(&str, &str)]) -> Self {
            CountingStore {
                items: items
                    .iter()
                    .map(|(id, name)| (id.to_string(), Item::new(*id, *name)))
                    .collect(),
                lookups: AtomicUsize::new(0),
            }
        }

        pub fn lookups(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ItemStore for CountingStore {
        async fn find_item(&self, id: &str) -> anyhow::Result<Option<Item>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self.items.get(id).cloned())
        }

        fn kind(&self) -> &'static str {
            "counting"
        }
    }

    pub struct FailingStore;

    #[async_trait]
    impl ItemStore for FailingStore {
        async fn find_item(&self, _id: &str) -> anyhow::Result<Option<Item>> {
            Err(anyhow!("connection refused").context("Failed to reach the database"))
        }

        fn kind(&self) -> &'static str {
            "failing"
        }
    }

    pub fn request(stage: Option<&str>, path_parameters: Value) -> Request {
        serde_json::from_value(json!({
            "httpMethod": "GET",
            "pathParameters": path_parameters,
            "requestContext": { "httpMethod": "GET", "stage": stage }
        }))
        .unwrap()
    }
}
