use greetings::handlers::goodbye::GoodbyeHandler;
use greetings::logging::setup_tracing;
use greetings::runtime;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    setup_tracing();

    runtime::run(Arc::new(GoodbyeHandler)).await
}
