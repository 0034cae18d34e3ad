//! `GET /hello/{itemId}`, greeting an item looked up in the item store.

use crate::handlers::{Handler, ItemParameter, find_required_item};
use crate::store::ItemStore;
use crate::web::environment::resolve_environment;
use crate::web::request::Request;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;

const ITEM_ID: ItemParameter = ItemParameter {
    name: "itemId",
    missing_message: "Item ID is required",
    failure_context: "Error retrieving item",
};

pub struct HelloItemHandler {
    store: Arc<dyn ItemStore>,
}

impl HelloItemHandler {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        HelloItemHandler { store }
    }
}

#[async_trait]
impl Handler for HelloItemHandler {
    fn name(&self) -> &'static str {
        "hello_item"
    }

    #[tracing::instrument(level = "debug", name = "hello_item", skip_all)]
    async fn handle(&self, request: &Request) -> anyhow::Result<Value> {
        let environment = resolve_environment(request);
        let item = find_required_item(self.store.as_ref(), request, &ITEM_ID).await?;

        Ok(json!({
            "message": format!("Hello, {}! (Environment: {})", item.name, environment)
        }))
    }
}
