use greetings::handlers::hello::HelloHandler;
use greetings::logging::setup_tracing;
use greetings::runtime;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    setup_tracing();

    runtime::run(Arc::new(HelloHandler)).await
}
