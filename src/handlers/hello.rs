//! `GET /hello`

use crate::handlers::Handler;
use crate::web::environment::resolve_environment;
use crate::web::request::Request;
use async_trait::async_trait;
use serde_json::{Value, json};

pub struct HelloHandler;

#[async_trait]
impl Handler for HelloHandler {
    fn name(&self) -> &'static str {
        "hello"
    }

    async fn handle(&self, request: &Request) -> anyhow::Result<Value> {
        let environment = resolve_environment(request);

        Ok(json!({
            "message": format!("Hello, World! (Environment: {})", environment)
        }))
    }
}
