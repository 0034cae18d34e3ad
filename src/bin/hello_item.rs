use greetings::config::Backend;
use greetings::handlers::hello_item::HelloItemHandler;
use greetings::logging::setup_tracing;
use greetings::{runtime, store};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    setup_tracing();

    // Built once per process and shared by all invocations.
    let store = store::from_env(Backend::DynamoDb).await;

    runtime::run(Arc::new(HelloItemHandler::new(store))).await
}
