//! Prometheus metrics definitions and registration.
//!
//! Every metric is a no-op until [`init_metrics`] installs the recorder.

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Installs the Prometheus recorder and registers all metric descriptions.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    register_metric_descriptions();
    Ok(handle)
}

fn register_metric_descriptions() {
    describe_gauge!(
        "lightbulb_uptime_seconds",
        "Time in seconds since the accessory started"
    );
    describe_gauge!("lightbulb_power", "Power state of the light (1 = on)");
    describe_counter!(
        "lightbulb_characteristic_writes_total",
        "Total number of characteristic writes received"
    );
    describe_counter!(
        "lightbulb_invalid_writes_total",
        "Total number of characteristic writes rejected as out of range"
    );
    describe_counter!(
        "lightbulb_render_failures_total",
        "Total number of colors the light hardware failed to display"
    );
}

pub struct Metrics;

impl Metrics {
    pub fn set_uptime(start_time: Instant) {
        gauge!("lightbulb_uptime_seconds").set(start_time.elapsed().as_secs_f64());
    }

    pub fn set_power(on: bool) {
        gauge!("lightbulb_power").set(if on { 1.0 } else { 0.0 });
    }

    pub fn inc_writes(characteristic: &'static str) {
        counter!("lightbulb_characteristic_writes_total", "characteristic" => characteristic)
            .increment(1);
    }

    pub fn inc_invalid_writes(characteristic: &'static str) {
        counter!("lightbulb_invalid_writes_total", "characteristic" => characteristic)
            .increment(1);
    }

    pub fn inc_render_failures() {
        counter!("lightbulb_render_failures_total").increment(1);
    }
}
