//! Connects a [`Handler`] to the Lambda runtime.
//!
//! Each invocation carries an API Gateway proxy event. It is decoded into a
//! [`Request`], dispatched to the handler and answered with the JSON envelope.
//! An event which cannot be decoded is answered with `400 Bad Request` rather
//! than failing the invocation.

use crate::handlers::{Handler, into_response};
use crate::logging::{INVOCATION_SPAN, flush_traces};
use crate::web::error::ResultExt;
use crate::web::request::Request;
use crate::web::response::Response;
use anyhow::Context;
use lambda_runtime::{LambdaEvent, service_fn};
use serde_json::Value;
use std::sync::Arc;
use tracing::Instrument;

/// Identifies a single invocation in logs and traces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Invocation {
    pub request_id: String,
    pub function_name: String,
    pub invoked_function_arn: String,
}

impl From<&lambda_runtime::Context> for Invocation {
    fn from(context: &lambda_runtime::Context) -> Self {
        Invocation {
            request_id: context.request_id.clone(),
            function_name: context.env_config.function_name.clone(),
            invoked_function_arn: context.invoked_function_arn.clone(),
        }
    }
}

/// Serves invocations with the given handler until the runtime shuts down.
///
/// Anything expensive (clients, pools) must be set up by the caller before,
/// so that it is shared by all invocations of the process.
pub async fn run(handler: Arc<dyn Handler>) -> Result<(), lambda_runtime::Error> {
    tracing::info!(
        "Starting '{}' ({} {})....",
        handler.name(),
        crate::APP_NAME.as_str(),
        crate::APP_VERSION.as_str()
    );

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let handler = handler.clone();
        async move {
            let invocation = Invocation::from(&event.context);
            let response = handle_event(handler.as_ref(), event.payload, &invocation).await;
            flush_traces().await;

            response.map_err(lambda_runtime::Error::from)
        }
    }))
    .await
}

/// Handles one raw event within an `invocation` span.
///
/// # Errors
///
/// Only fails if no envelope can be built at all.
pub async fn handle_event(
    handler: &dyn Handler,
    event: Value,
    invocation: &Invocation,
) -> anyhow::Result<Response> {
    let span = tracing::info_span!(
        INVOCATION_SPAN,
        request_id = %invocation.request_id,
        function_name = %invocation.function_name,
        http.status_code = tracing::field::Empty
    );

    async move {
        tracing::info!("Event: {}", event);
        tracing::info!("Context: {:?}", invocation);

        let response = match decode_request(event) {
            Ok(request) => {
                tracing::info!(
                    "{} {} -> {}",
                    request.http_method(),
                    request.path().unwrap_or("-"),
                    handler.name()
                );
                into_response(handler.handle(&request).await)?
            }
            Err(err) => into_response(Err(err))?,
        };

        tracing::Span::current().record("http.status_code", response.status_code());
        tracing::info!("Responding with {}", response.status_code());

        Ok(response)
    }
    .instrument(span)
    .await
}

fn decode_request(event: Value) -> anyhow::Result<Request> {
    serde_json::from_value(event)
        .context("Malformed request")
        .mark_client_error()
}
