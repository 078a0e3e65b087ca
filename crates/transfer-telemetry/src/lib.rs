//! # Transfer Telemetry
//!
//! Structured logging and Prometheus metrics for the ICS20 transfer module.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use transfer_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     init_telemetry(&TelemetryConfig::from_env()).expect("Failed to init telemetry");
//!     // Logs and metrics are now being collected
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `ics20-transfer` | Service name in logs |
//! | `ICS20_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `ICS20_CONSOLE_OUTPUT` | `true` | Print logs to stdout |
//! | `ICS20_JSON_LOGS` | `false` | JSON log lines (default `true` in containers) |

#![warn(missing_docs)]

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    gather_metrics, register_metrics, time_callback, HistogramTimer, ACKNOWLEDGEMENTS,
    CALLBACK_DURATION, PACKETS_RECEIVED, PACKETS_SENT, REFUNDS, TRANSFER_ERRORS,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Global subscriber could not be installed
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Metric registration or encoding failed
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Register metrics and install the global log subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_logging(config)
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
