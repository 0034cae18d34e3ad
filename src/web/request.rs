//! Inbound API Gateway proxy events.
//!
//! The event itself is decoded by `aws_lambda_events`. [`Request`] wraps it
//! and exposes what the handlers look at: path parameters, the stage and the
//! claims of an upstream authorizer.

use aws_lambda_events::apigw::ApiGatewayProxyRequest;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An API Gateway (REST, payload format 1.0) proxy event.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Request {
    event: ApiGatewayProxyRequest,
}

impl From<ApiGatewayProxyRequest> for Request {
    fn from(event: ApiGatewayProxyRequest) -> Self {
        Request { event }
    }
}

impl Request {
    pub fn event(&self) -> &ApiGatewayProxyRequest {
        &self.event
    }

    pub fn http_method(&self) -> &str {
        self.event.http_method.as_str()
    }

    pub fn path(&self) -> Option<&str> {
        self.event.path.as_deref()
    }

    /// Returns the given path parameter unless it is absent or empty.
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.event
            .path_parameters
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Returns the stage as sent by API Gateway (not normalized).
    pub fn stage(&self) -> Option<&str> {
        self.event.request_context.stage.as_deref()
    }

    pub fn request_id(&self) -> Option<&str> {
        self.event.request_context.request_id.as_deref()
    }

    /// Returns the raw authorizer claims, if any were attached.
    ///
    /// Cognito authorizers put them into `claims`, JWT authorizers into
    /// `jwt.claims`.
    pub fn claims(&self) -> Option<&Map<String, Value>> {
        let fields = &self.event.request_context.authorizer.fields;

        fields
            .get("claims")
            .and_then(Value::as_object)
            .or_else(|| {
                fields
                    .get("jwt")
                    .and_then(|jwt| jwt.get("claims"))
                    .and_then(Value::as_object)
            })
    }
}
