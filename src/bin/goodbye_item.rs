use greetings::config::Backend;
use greetings::handlers::goodbye_item::GoodbyeItemHandler;
use greetings::logging::setup_tracing;
use greetings::{runtime, store};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    setup_tracing();

    let store = store::from_env(Backend::RdsData).await;

    runtime::run(Arc::new(GoodbyeItemHandler::new(store))).await
}
