//! Observability infrastructure for the prediction service
//!
//! Provides:
//! - Prometheus metrics (prediction latency, counters, vocabulary size)
//! - Structured JSON logging with tracing

use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge,
    Histogram, IntCounter, IntCounterVec, IntGauge,
};
use std::sync::OnceLock;
use tracing::info;

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<ServiceMetricsInner> = OnceLock::new();

/// Inner metrics structure that holds the actual Prometheus metrics
struct ServiceMetricsInner {
    prediction_latency_seconds: Histogram,
    predictions_total: IntCounterVec,
    prediction_errors_total: IntCounter,
    symptom_searches_total: IntCounter,
    vocabulary_size: IntGauge,
}

impl ServiceMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "prediction_service_prediction_latency_seconds",
                "Time spent answering a prediction request",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            predictions_total: register_int_counter_vec!(
                "prediction_service_predictions_total",
                "Total predictions served, labelled by model",
                &["model"]
            )
            .expect("Failed to register predictions_total"),

            prediction_errors_total: register_int_counter!(
                "prediction_service_prediction_errors_total",
                "Total failed prediction requests"
            )
            .expect("Failed to register prediction_errors_total"),

            symptom_searches_total: register_int_counter!(
                "prediction_service_symptom_searches_total",
                "Total symptom search requests"
            )
            .expect("Failed to register symptom_searches_total"),

            vocabulary_size: register_int_gauge!(
                "prediction_service_vocabulary_size",
                "Number of symptoms in the loaded vocabulary"
            )
            .expect("Failed to register vocabulary_size"),
        }
    }
}

/// Service metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct ServiceMetrics {
    _private: (),
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(ServiceMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &ServiceMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    /// Record a prediction latency observation
    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    /// Increment the prediction counter for a model
    pub fn inc_predictions(&self, model: &str) {
        self.inner().predictions_total.with_label_values(&[model]).inc();
    }

    /// Increment the failed-prediction counter
    pub fn inc_prediction_errors(&self) {
        self.inner().prediction_errors_total.inc();
    }

    /// Increment the symptom search counter
    pub fn inc_symptom_searches(&self) {
        self.inner().symptom_searches_total.inc();
    }

    /// Update the vocabulary size gauge
    pub fn set_vocabulary_size(&self, size: i64) {
        self.inner().vocabulary_size.set(size);
    }
}

/// Structured logger for service events
///
/// Provides consistent JSON-formatted logging for predictions and
/// lifecycle events.
#[derive(Clone)]
pub struct StructuredLogger {
    service_name: String,
}

impl StructuredLogger {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    /// Log a served prediction
    pub fn log_prediction(
        &self,
        model: &str,
        predicted_disease: &str,
        symptom_count: usize,
        ranked_count: usize,
        latency_secs: f64,
    ) {
        info!(
            event = "prediction_served",
            service = %self.service_name,
            model = %model,
            predicted_disease = %predicted_disease,
            symptom_count = symptom_count,
            ranked_count = ranked_count,
            latency_secs = latency_secs,
            "Prediction served"
        );
    }

    /// Log service startup
    pub fn log_startup(&self, version: &str, port: u16) {
        info!(
            event = "service_started",
            service = %self.service_name,
            version = %version,
            port = port,
            "Prediction service started"
        );
    }

    /// Log service shutdown
    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            service = %self.service_name,
            reason = %reason,
            "Prediction service shutting down"
        );
    }
}
