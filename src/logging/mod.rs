//! Tracing setup for the Lambda functions.
//!
//! Logs go to stdout (and thus CloudWatch) as plain single lines, filtered by
//! `RUST_LOG` (default `info`). With the `open_telemetry` feature, spans are
//! additionally exported via OTLP if `OTEL_EXPORTER_OTLP_ENDPOINT` is set.
//! As the process is frozen between invocations, [`flush_traces`] has to be
//! awaited once an invocation is answered.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

mod format;

#[cfg(feature = "open_telemetry")]
mod otel;

pub use format::{INVOCATION_SPAN, InvocationLogFormat};

/// Filter used if `RUST_LOG` is absent or invalid.
pub const DEFAULT_LOG_FILTER: &str = "info";

#[cfg(feature = "open_telemetry")]
pub fn setup_tracing() {
    let console_layer = setup_console_layer();

    match otel::setup_open_telemetry_layer() {
        Ok(otlp_layer) => {
            let result = Registry::default()
                .with(console_layer)
                .with(otlp_layer)
                .try_init();
            report_setup(result, "console as well as OpenTelemetry");
        }
        Err(err) => {
            let result = Registry::default().with(console_layer).try_init();
            report_setup(result, "console only");
            tracing::info!("Skipping OpenTelemetry setup: {:#}", err);
        }
    }
}

#[cfg(not(feature = "open_telemetry"))]
pub fn setup_tracing() {
    let console_layer = setup_console_layer();
    let result = Registry::default().with(console_layer).try_init();
    report_setup(result, "console only");
}

/// Pushes all buffered spans to the OTLP endpoint.
#[cfg(feature = "open_telemetry")]
pub async fn flush_traces() {
    if let Err(err) = tokio::task::spawn_blocking(otel::flush).await {
        tracing::warn!("Failed to flush traces: {}", err);
    }
}

#[cfg(not(feature = "open_telemetry"))]
pub async fn flush_traces() {}

fn report_setup(result: Result<(), tracing_subscriber::util::TryInitError>, target: &str) {
    match result {
        Ok(()) => tracing::info!("Tracing initialized successfully [reporting to {}]", target),
        Err(err) => tracing::warn!("Tracing was already initialized: {}", err),
    }
}

fn setup_console_layer() -> Box<dyn Layer<Registry> + Send + Sync + 'static> {
    tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .event_format(InvocationLogFormat)
        .with_filter(console_filter())
        .boxed()
}

fn console_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::InvocationLogFormat;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::Layer;
    use tracing_subscriber::fmt::MakeWriter;
    use tracing_subscriber::layer::SubscriberExt;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Runs `f` with a subscriber writing `info` and above into the returned string.
    pub fn capture<R>(f: impl FnOnce() -> R) -> String {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(captured.clone())
                .event_format(InvocationLogFormat)
                .with_filter(tracing_subscriber::filter::LevelFilter::INFO),
        );

        tracing::subscriber::with_default(subscriber, f);
        let output = captured.0.lock().unwrap().clone();
        String::from_utf8(output).unwrap()
    }
}
