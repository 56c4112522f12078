//! Edutrack Observability
//!
//! Provides configurable observability features including:
//! - Console and rolling-file logging, optionally exported via OpenTelemetry
//! - Prometheus metrics for HTTP traffic and school activity
//! - Per-request logging middleware with a generated request id
//!
//! Everything beyond console logging is compiled only with the `observability`
//! feature (enabled by default). At runtime it can be switched off with
//! `OBSERVABILITY_ENABLED=false`.
//!
//! # Examples
//!
//! ```no_run
//! use edutrack_observability::{init_tracing, shutdown_tracer};
//!
//! #[tokio::main]
//! async fn main() {
//!     init_tracing();
//!     // ... application code ...
//!     shutdown_tracer().await;
//! }
//! ```

use std::sync::OnceLock;

pub mod basic_logging;
#[cfg(feature = "observability")]
pub mod logging;
#[cfg(feature = "observability")]
pub mod metrics;

pub use basic_logging::init_basic_console_logging;

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

fn flag_enabled(value: Option<&str>) -> bool {
    match value {
        Some(v) => {
            let v = v.trim().to_lowercase();
            v != "false" && v != "0" && v != "off"
        }
        None => true,
    }
}

/// Whether observability is switched on at runtime.
///
/// Reads `OBSERVABILITY_ENABLED` once (enabled unless set to `false`, `0` or
/// `off`). Always `false` when the feature is not compiled in.
pub fn is_observability_enabled() -> bool {
    cfg!(feature = "observability")
        && *OBSERVABILITY_ENABLED.get_or_init(|| {
            flag_enabled(std::env::var("OBSERVABILITY_ENABLED").ok().as_deref())
        })
}

#[cfg(feature = "observability")]
pub use logging::{init_tracing, logging_middleware, shutdown_tracer};
#[cfg(feature = "observability")]
pub use metrics::{
    MetricsHandle, init_metrics, metrics_app, metrics_middleware, track_attendance_recorded,
    track_grade_recorded, track_jwt_issued, track_notification_created, track_payment_recorded,
    track_student_enrolled, track_user_created, track_user_login_failure,
    track_user_login_success,
};

// No-op stubs when observability is disabled
#[cfg(not(feature = "observability"))]
pub mod stubs {
    use axum::{Router, extract::Request, middleware::Next, response::Response};

    /// Placeholder for the Prometheus handle.
    #[derive(Clone, Debug)]
    pub struct MetricsHandle;

    pub async fn logging_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub async fn metrics_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub fn init_tracing() {
        crate::basic_logging::init_basic_console_logging();
    }

    pub async fn shutdown_tracer() {}

    pub fn init_metrics() -> Option<MetricsHandle> {
        None
    }

    pub fn metrics_app(_handle: MetricsHandle) -> Router {
        Router::new()
    }

    pub fn track_user_created(_role: &str) {}
    pub fn track_user_login_success(_role: &str) {}
    pub fn track_user_login_failure(_reason: &str) {}
    pub fn track_jwt_issued() {}
    pub fn track_student_enrolled() {}
    pub fn track_payment_recorded(_payment_type: &str, _amount: f64) {}
    pub fn track_grade_recorded(_term: &str) {}
    pub fn track_attendance_recorded(_status: &str) {}
    pub fn track_notification_created(_notification_type: &str) {}
}

#[cfg(not(feature = "observability"))]
pub use stubs::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_enabled_defaults_on() {
        assert!(flag_enabled(None));
        assert!(flag_enabled(Some("true")));
        assert!(flag_enabled(Some("1")));
    }

    #[test]
    fn test_flag_enabled_off_values() {
        assert!(!flag_enabled(Some("false")));
        assert!(!flag_enabled(Some("FALSE")));
        assert!(!flag_enabled(Some("0")));
        assert!(!flag_enabled(Some(" off ")));
    }
}
