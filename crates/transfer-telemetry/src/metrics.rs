//! Prometheus metrics for the transfer module.
//!
//! All metrics follow the naming convention: `ics20_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, CounterVec, Encoder, Histogram, HistogramOpts, HistogramVec, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Inbound packets by outcome and ledger action
    pub static ref PACKETS_RECEIVED: CounterVec = CounterVec::new(
        Opts::new("ics20_packets_received_total", "Inbound transfer packets processed"),
        &["outcome", "action"]  // outcome: success/error, action: mint/release/none
    ).expect("metric creation failed");

    /// Outbound packets by debit mechanism
    pub static ref PACKETS_SENT: CounterVec = CounterVec::new(
        Opts::new("ics20_packets_sent_total", "Outbound transfer packets created"),
        &["debit"]  // debit: escrow/burn
    ).expect("metric creation failed");

    /// Acknowledgements by result
    pub static ref ACKNOWLEDGEMENTS: CounterVec = CounterVec::new(
        Opts::new("ics20_acknowledgements_total", "Acknowledgements processed"),
        &["result"]  // result: success/failure
    ).expect("metric creation failed");

    /// Refunds by trigger and mechanism
    pub static ref REFUNDS: CounterVec = CounterVec::new(
        Opts::new("ics20_refunds_total", "Refunds issued to senders"),
        &["trigger", "mechanism"]  // trigger: ack/timeout, mechanism: release/mint
    ).expect("metric creation failed");

    /// Rejected calls by error type
    pub static ref TRANSFER_ERRORS: CounterVec = CounterVec::new(
        Opts::new("ics20_errors_total", "Rejected transfer module calls"),
        &["error_type"]
    ).expect("metric creation failed");

    /// Callback duration
    pub static ref CALLBACK_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "ics20_callback_duration_seconds",
            "Time spent inside a packet callback"
        ).buckets(exponential_buckets(0.00001, 2.0, 15).expect("bucket creation failed")),
        &["callback"]  // callback: recv/ack/timeout/send
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(PACKETS_RECEIVED.clone()),
        Box::new(PACKETS_SENT.clone()),
        Box::new(ACKNOWLEDGEMENTS.clone()),
        Box::new(REFUNDS.clone()),
        Box::new(TRANSFER_ERRORS.clone()),
        Box::new(CALLBACK_DURATION.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}

/// Start timing a callback. Observation happens on drop.
pub fn time_callback(callback: &str) -> HistogramTimer {
    HistogramTimer::new(&CALLBACK_DURATION.with_label_values(&[callback]))
}
