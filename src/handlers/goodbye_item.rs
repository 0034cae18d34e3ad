//! `GET /goodbye/{id}`, saying goodbye to a user stored in the item store.

use crate::handlers::{Handler, ItemParameter, find_required_item};
use crate::store::ItemStore;
use crate::web::environment::resolve_environment;
use crate::web::request::Request;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;

const USER_ID: ItemParameter = ItemParameter {
    name: "id",
    missing_message: "User ID is required",
    failure_context: "Error retrieving user",
};

pub struct GoodbyeItemHandler {
    store: Arc<dyn ItemStore>,
}

impl GoodbyeItemHandler {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        GoodbyeItemHandler { store }
    }
}

#[async_trait]
impl Handler for GoodbyeItemHandler {
    fn name(&self) -> &'static str {
        "goodbye_item"
    }

    #[tracing::instrument(level = "debug", name = "goodbye_item", skip_all)]
    async fn handle(&self, request: &Request) -> anyhow::Result<Value> {
        let environment = resolve_environment(request);
        let user = find_required_item(self.store.as_ref(), request, &USER_ID).await?;

        Ok(json!({
            "message": format!("Goodbye, {}! (Environment: {})", user.name, environment),
            "user": {
                "id": user.id,
                "name": user.name,
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::respond;
    use crate::handlers::test_support::{CountingStore, FailingStore, request};
    use crate::store::memory::InMemoryItemStore;
    use crate::store::Item;

    #[tokio::test]
    async fn says_goodbye_to_the_user_found() {
        let store = Arc::new(InMemoryItemStore::from_items([Item::new("7", "Ada")]));
        let response = respond(
            &GoodbyeItemHandler::new(store),
            &request(Some("Prod"), json!({ "id": "7" })),
        )
        .await
        .unwrap();

        assert_eq!(response.status_code(), 200);
        assert_eq!(
            response.body_json().unwrap(),
            json!({
                "message": "Goodbye, Ada! (Environment: prod)",
                "user": { "id": "7", "name": "Ada" }
            })
        );
    }

    #[tokio::test]
    async fn requires_a_user_id() {
        let store = Arc::new(CountingStore::default());
        let response = respond(
            &GoodbyeItemHandler::new(store.clone()),
            &request(Some("Prod"), json!(null)),
        )
        .await
        .unwrap();

        assert_eq!(response.status_code(), 400);
        assert_eq!(
            response.body_json().unwrap(),
            json!({ "message": "User ID is required" })
        );
        assert_eq!(store.lookups(), 0);
    }

    #[tokio::test]
    async fn reports_unknown_users() {
        let store = Arc::new(CountingStore::default());
        let response = respond(
            &GoodbyeItemHandler::new(store.clone()),
            &request(Some("Dev"), json!({ "id": "42" })),
        )
        .await
        .unwrap();

        assert_eq!(response.status_code(), 404);
        assert_eq!(
            response.body_json().unwrap(),
            json!({ "message": "Item with ID 42 not found" })
        );
        assert_eq!(store.lookups(), 1);
    }

    #[tokio::test]
    async fn reports_store_failures() {
        let response = respond(
            &GoodbyeItemHandler::new(Arc::new(FailingStore)),
            &request(None, json!({ "id": "7" })),
        )
        .await
        .unwrap();

        assert_eq!(response.status_code(), 500);
        assert!(
            response.body_json().unwrap()["message"]
                .as_str()
                .unwrap()
                .starts_with("Error retrieving user: ")
        );
    }
}
