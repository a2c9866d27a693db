use crate::config::Config;
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{runtime, trace as sdktrace, Resource};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const DEFAULT_LOG_FILTER: &str = "basket_relay=debug,tower_http=debug,axum=debug";

type BoxError = Box<dyn std::error::Error>;

/// Flushes pending spans on drop when an OTLP exporter was installed.
pub struct ObservabilityGuard {
    otlp_enabled: bool,
}

impl Drop for ObservabilityGuard {
    fn drop(&mut self) {
        if self.otlp_enabled {
            opentelemetry::global::shutdown_tracer_provider();
        }
    }
}

/// Install the global subscriber and, when configured, the span exporter and
/// the Prometheus endpoint for the upstream call metrics.
pub fn init(config: &Config) -> Result<ObservabilityGuard, BoxError> {
    let tracer = otlp_tracer(config)?;
    let otlp_enabled = tracer.is_some();

    Registry::default()
        .with(log_filter())
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(tracer.map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer)))
        .init();

    if otlp_enabled {
        tracing::info!(service = %config.service_name, "Exporting spans over OTLP");
    }

    if let Some(port) = config.metrics_port {
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(([0, 0, 0, 0], port))
            .install()?;
        tracing::info!("Prometheus metrics on port {}", port);
    }

    Ok(ObservabilityGuard { otlp_enabled })
}

fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Batch OTLP tracer tagged with the service name, or `None` when no
/// collector endpoint is configured.
fn otlp_tracer(config: &Config) -> Result<Option<sdktrace::Tracer>, BoxError> {
    let Some(endpoint) = &config.otel_exporter_endpoint else {
        return Ok(None);
    };

    let resource = Resource::new(vec![KeyValue::new(
        "service.name",
        config.service_name.clone(),
    )]);
    let tracer = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(endpoint),
        )
        .with_trace_config(sdktrace::config().with_resource(resource))
        .install_batch(runtime::Tokio)?;

    Ok(Some(tracer))
}
