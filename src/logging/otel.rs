//! OTLP span export, enabled by the `open_telemetry` feature.

use crate::APP_NAME;
use anyhow::Context;
use opentelemetry::KeyValue;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::trace::{RandomIdGenerator, Sampler, SdkTracerProvider};
use std::env;
use std::sync::OnceLock;
use tracing::Subscriber;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer};

pub const ENV_OTLP_ENDPOINT: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";

/// Filter for exported spans, separate from `RUST_LOG`.
pub const ENV_TRACE_FILTER: &str = "RUST_TRACE";

static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

pub fn setup_open_telemetry_layer<S>() -> anyhow::Result<impl Layer<S>>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    let endpoint = env::var(ENV_OTLP_ENDPOINT)
        .with_context(|| format!("No OpenTelemetry endpoint present in {}", ENV_OTLP_ENDPOINT))?;

    let provider = setup_tracer_provider(&endpoint)?;
    let tracer = provider.tracer(APP_NAME.clone());
    let filter =
        EnvFilter::try_from_env(ENV_TRACE_FILTER).unwrap_or_else(|_| EnvFilter::new("debug"));

    Ok(OpenTelemetryLayer::new(tracer).with_filter(filter))
}

fn setup_tracer_provider(endpoint: &str) -> anyhow::Result<SdkTracerProvider> {
    let exporter = SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .with_context(|| format!("Failed to build OpenTelemetry exporter for: {}", endpoint))?;

    // Invocations are short: keep the per span limits small.
    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_sampler(Sampler::AlwaysOn)
        .with_id_generator(RandomIdGenerator::default())
        .with_max_events_per_span(32)
        .with_max_attributes_per_span(16)
        .with_resource(
            Resource::builder_empty()
                .with_attributes([
                    KeyValue::new("service.name", APP_NAME.clone()),
                    KeyValue::new("service.version", crate::APP_VERSION.clone()),
                ])
                .build(),
        )
        .build();

    opentelemetry::global::set_tracer_provider(provider.clone());
    let _ = TRACER_PROVIDER.set(provider.clone());

    Ok(provider)
}

/// Exports all spans buffered by the batch processor. Blocks until done.
pub fn flush() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(err) = provider.force_flush() {
            tracing::warn!("Failed to export buffered spans: {}", err);
        }
    }
}
