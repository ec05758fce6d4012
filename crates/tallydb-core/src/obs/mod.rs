//! Observability: runtime telemetry (metrics) and sink abstractions.
//!
//! Operators never touch `obs::metrics` directly; every event flows through
//! `MetricsEvent` and the active `MetricsSink`.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventOps, EventReport, EventState, OperatorCounters, OperatorSummary};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink};
