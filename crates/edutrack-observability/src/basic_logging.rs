use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter: application crates at `LOG_LEVEL`, noisy dependencies at warn.
pub(crate) fn default_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{level},tower_http=warn,hyper=warn,tonic=warn,h2=warn,sqlx=warn"
        ))
    })
}

/// Initialize console-only logging.
///
/// Used when the `observability` feature is not compiled in, or when it is
/// switched off at runtime with `OBSERVABILITY_ENABLED=false`. All `tracing`
/// macros still reach stdout in compact form.
///
/// - **Log Level**: `LOG_LEVEL` environment variable (default: "info"),
///   overridden entirely by `RUST_LOG` when set
pub fn init_basic_console_logging() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(default_filter(&log_level));

    // A subscriber may already be installed (tests, repeated init).
    if tracing_subscriber::registry()
        .with(console_layer)
        .try_init()
        .is_ok()
    {
        eprintln!("Observability disabled - console logging only");
    }
}
