//! Structured logging setup.
//!
//! Builds a `tracing-subscriber` registry with an `EnvFilter` and either a
//! JSON layer (containers) or a compact human-readable layer (development).

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Install the global subscriber described by `config`.
///
/// Fails with `TelemetryError::LoggingInit` when the filter directive is
/// invalid or a global subscriber is already installed.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::Config(e.to_string()))?;

    if !config.console_output {
        tracing_subscriber::registry()
            .with(env_filter)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else if config.json_logs {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .compact()
            .with_target(true)
            .with_ansi(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    }

    let rendered =
        serde_json::to_string(config).map_err(|e| TelemetryError::Config(e.to_string()))?;
    tracing::info!(
        service = %config.service_name,
        config = %rendered,
        "Logging initialized"
    );

    Ok(())
}

/// Log a packet lifecycle event with the standard packet fields.
#[macro_export]
macro_rules! log_packet_event {
    ($level:ident, $msg:expr, $packet:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            sequence = $packet.sequence,
            source_port = %$packet.source_port,
            source_channel = %$packet.source_channel,
            destination_port = %$packet.destination_port,
            destination_channel = %$packet.destination_channel,
            $($($field)*,)?
            $msg
        )
    };
}
