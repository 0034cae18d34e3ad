//! `GET /goodbye`, addressed to the caller identified by the authorizer.

use crate::handlers::Handler;
use crate::web::claims::Claims;
use crate::web::environment::resolve_environment;
use crate::web::request::Request;
use async_trait::async_trait;
use serde_json::{Value, json};

pub struct GoodbyeHandler;

#[async_trait]
impl Handler for GoodbyeHandler {
    fn name(&self) -> &'static str {
        "goodbye"
    }

    #[tracing::instrument(level = "debug", name = "goodbye", skip_all)]
    async fn handle(&self, request: &Request) -> anyhow::Result<Value> {
        let environment = resolve_environment(request);
        let claims = Claims::from_request(request);
        tracing::debug!("Saying goodbye to {:?} in {}", claims, environment);

        Ok(json!({
            "message": format!("Goodbye, {}!", claims.username()),
            "user": {
                "username": claims.username(),
                "email": claims.email(),
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::respond;

    #[tokio::test]
    async fn says_goodbye_to_the_authenticated_user() {
        let request: Request = serde_json::from_value(json!({
            "httpMethod": "GET",
            "path": "/goodbye",
            "requestContext": {
                "httpMethod": "GET",
                "stage": "Dev",
                "authorizer": { "claims": { "username": "alice", "email": "a@x.com" } }
            }
        }))
        .unwrap();

        let response = respond(&GoodbyeHandler, &request).await.unwrap();
        let body = response.body_json().unwrap();

        assert_eq!(response.status_code(), 200);
        assert_eq!(body["message"], json!("Goodbye, alice!"));
        assert_eq!(
            body["user"],
            json!({ "username": "alice", "email": "a@x.com" })
        );
    }

    #[tokio::test]
    async fn anonymous_callers_get_defaults() {
        let response = respond(&GoodbyeHandler, &Request::default()).await.unwrap();
        let body = response.body_json().unwrap();

        assert_eq!(body["message"], json!("Goodbye, User!"));
        assert_eq!(body["user"], json!({ "username": "User", "email": "" }));
    }
}
