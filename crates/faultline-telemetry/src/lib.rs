//! Telemetry for Faultline
//!
//! Structured logging via `tracing-subscriber`, with optional OTLP span export

use faultline_config::{ExportProtocol, ExporterConfig, LogFormat, TelemetryConfig};
use opentelemetry::KeyValue;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_semantic_conventions::resource as semconv;
use tracing_subscriber::{EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// Guard that shuts the tracer provider down on drop
///
/// Must be held for the lifetime of the application
pub struct TelemetryGuard {
    tracer_provider: Option<SdkTracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("failed to shutdown tracer provider: {e}");
        }
    }
}

/// Initialize logging and optional span export
///
/// `default_filter` is used when no telemetry section is configured. The
/// configured `log_filter` wins otherwise.
///
/// # Errors
///
/// Returns an error if the OTLP exporter cannot be built or a global
/// subscriber is already installed
pub fn init(config: Option<&TelemetryConfig>, default_filter: &str) -> anyhow::Result<TelemetryGuard> {
    let directive = config.map_or(default_filter, |c| c.log_filter.as_str());
    let defaults = TelemetryConfig::default();
    let config = config.unwrap_or(&defaults);

    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"));

    let mut guard = TelemetryGuard { tracer_provider: None };

    let otel_layer = match config.exporter {
        Some(ref exporter) => {
            let provider = init_tracer(config, exporter)?;
            let tracer = provider.tracer("faultline");
            opentelemetry::global::set_tracer_provider(provider.clone());
            guard.tracer_provider = Some(provider);
            Some(tracing_opentelemetry::layer().with_tracer(tracer))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(fmt_layer(config.log_format))
        .with(otel_layer)
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(guard)
}

fn fmt_layer(format: LogFormat) -> Box<dyn Layer<Registry> + Send + Sync> {
    let layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match format {
        LogFormat::Text => layer.boxed(),
        LogFormat::Json => layer.json().flatten_event(true).boxed(),
    }
}

fn init_tracer(config: &TelemetryConfig, exporter: &ExporterConfig) -> anyhow::Result<SdkTracerProvider> {
    use opentelemetry_otlp::SpanExporter;

    let span_exporter = match exporter.protocol {
        ExportProtocol::Grpc => SpanExporter::builder()
            .with_tonic()
            .with_endpoint(exporter.endpoint.as_str())
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build gRPC span exporter: {e}"))?,
        ExportProtocol::HttpProto => SpanExporter::builder()
            .with_http()
            .with_endpoint(exporter.endpoint.as_str())
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build HTTP span exporter: {e}"))?,
    };

    Ok(SdkTracerProvider::builder()
        .with_resource(build_resource(config))
        .with_batch_exporter(span_exporter)
        .build())
}

fn build_resource(config: &TelemetryConfig) -> Resource {
    let mut attrs = vec![
        KeyValue::new(semconv::SERVICE_NAME, config.service_name.clone()),
        KeyValue::new(semconv::SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
    ];

    attrs.extend(
        config
            .resource_attributes
            .iter()
            .map(|(key, value)| KeyValue::new(key.clone(), value.clone())),
    );

    Resource::builder().with_attributes(attrs).build()
}
