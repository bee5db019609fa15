//! Telemetry initialization and configuration

use std::error::Error;
use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

type InitResult = Result<(), Box<dyn Error + Send + Sync>>;

/// Output format for the console log layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Initialize console logging.
///
/// The filter comes from `RUST_LOG` and falls back to `info`. Only the first
/// call in a process installs a subscriber; later calls are no-ops.
///
/// # Example
/// ```
/// use scout_telemetry::{init_telemetry, LogFormat};
/// init_telemetry("idea-scout", LogFormat::Text).expect("Failed to initialize telemetry");
/// ```
pub fn init_telemetry(service_name: &str, format: LogFormat) -> InitResult {
    let mut result = Ok(());
    INIT.call_once(|| {
        result = install(service_name, format, None);
    });
    result
}

/// Initialize logging plus OTLP span export.
///
/// # Arguments
/// * `service_name` - Reported as the `service.name` resource attribute
/// * `endpoint` - OTLP collector endpoint (e.g., "http://localhost:4317")
pub fn init_with_otlp(service_name: &str, format: LogFormat, endpoint: &str) -> InitResult {
    let mut result = Ok(());
    INIT.call_once(|| {
        result = install(service_name, format, Some(endpoint));
    });
    result
}

/// Flush pending spans. Call before process exit when OTLP export is on.
pub fn shutdown_telemetry() {
    opentelemetry::global::shutdown_tracer_provider();
}

fn install(service_name: &str, format: LogFormat, otlp_endpoint: Option<&str>) -> InitResult {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    let tracer = match otlp_endpoint {
        Some(endpoint) => Some(build_tracer(service_name, endpoint)?),
        None => None,
    };
    let otel_layer = tracer.map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer));

    let (text_layer, json_layer) = match format {
        LogFormat::Text => (
            Some(fmt::layer().with_target(true).with_thread_ids(true).with_line_number(true)),
            None,
        ),
        LogFormat::Json => (None, Some(fmt::layer().json().with_target(true))),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .with(text_layer)
        .with(json_layer)
        .try_init()?;

    match otlp_endpoint {
        Some(endpoint) => tracing::info!(
            service.name = service_name,
            otlp.endpoint = endpoint,
            "Telemetry initialized with OpenTelemetry"
        ),
        None => tracing::info!(service.name = service_name, "Telemetry initialized"),
    }

    Ok(())
}

fn build_tracer(
    service_name: &str,
    endpoint: &str,
) -> Result<opentelemetry_sdk::trace::Tracer, Box<dyn Error + Send + Sync>> {
    use opentelemetry_otlp::WithExportConfig;

    let tracer = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(opentelemetry_otlp::new_exporter().tonic().with_endpoint(endpoint))
        .with_trace_config(opentelemetry_sdk::trace::config().with_resource(
            opentelemetry_sdk::Resource::new(vec![opentelemetry::KeyValue::new(
                "service.name",
                service_name.to_string(),
            )]),
        ))
        .install_batch(opentelemetry_sdk::runtime::Tokio)?;

    Ok(tracer)
}
