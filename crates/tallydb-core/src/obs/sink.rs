//! Metrics sink boundary.
//!
//! Execution logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
//!
//! This module is the only allowed bridge between operators
//! and the thread-local metrics state.
use crate::obs::metrics;
use std::cell::RefCell;

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn MetricsSink>> = RefCell::new(None);
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    OperatorOpen {
        operator: &'static str,
    },
    OperatorFinish {
        operator: &'static str,
        rows_scanned: u64,
        rows_emitted: u64,
        failed: bool,
    },
    GroupCreated,
    BudgetRejected {
        resource: &'static str,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink that writes into thread-local metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::OperatorOpen { operator } => {
                metrics::with_state_mut(|m| {
                    m.ops.operator_opens = m.ops.operator_opens.saturating_add(1);
                    let entry = m.operators.entry(operator.to_string()).or_default();
                    entry.opens = entry.opens.saturating_add(1);
                });
            }

            MetricsEvent::OperatorFinish {
                operator,
                rows_scanned,
                rows_emitted,
                failed,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.rows_scanned = m.ops.rows_scanned.saturating_add(rows_scanned);
                    m.ops.rows_emitted = m.ops.rows_emitted.saturating_add(rows_emitted);
                    if failed {
                        m.ops.open_failures = m.ops.open_failures.saturating_add(1);
                    }

                    let entry = m.operators.entry(operator.to_string()).or_default();
                    entry.rows_scanned = entry.rows_scanned.saturating_add(rows_scanned);
                    entry.rows_emitted = entry.rows_emitted.saturating_add(rows_emitted);
                    if failed {
                        entry.open_failures = entry.open_failures.saturating_add(1);
                    }
                });
            }

            MetricsEvent::GroupCreated => {
                metrics::with_state_mut(|m| {
                    m.ops.groups_created = m.ops.groups_created.saturating_add(1);
                });
            }

            MetricsEvent::BudgetRejected { .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.budget_rejections = m.ops.budget_rejections.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY:
        // Preconditions:
        // - `ptr` was produced from a valid `&dyn MetricsSink` in `with_metrics_sink`.
        // - `with_metrics_sink` always restores the previous pointer before returning,
        //   including unwind paths via `Guard::drop`.
        // - `record` is synchronous and never stores `ptr` beyond this call.
        //
        // Aliasing:
        // - Only a shared reference is materialized, matching the shared borrow
        //   used to install the override.
        unsafe { (&*ptr).record(event) };
    } else {
        GLOBAL_METRICS_SINK.record(event);
    }
}

/// Snapshot the current metrics state.
///
/// `window_start_ms` filters by window start (`EventState::window_start_ms`),
/// not by per-event timestamps.
#[must_use]
pub fn metrics_report(window_start_ms: Option<u64>) -> metrics::EventReport {
    metrics::report_window_start(window_start_ms)
}

/// Reset all metrics state for the current thread.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
pub fn with_metrics_sink<T>(sink: &dyn MetricsSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<*const dyn MetricsSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0;
            });
        }
    }

    // SAFETY:
    // Preconditions:
    // - `sink_ptr` is installed only for this dynamic scope.
    // - `Guard` always restores the previous slot on all exits, including panic.
    // - `record` only dereferences synchronously and never persists `sink_ptr`.
    //
    // What would break this:
    // - Any deferred use of `sink_ptr` beyond this scope.
    // - Any path that bypasses Guard restoration.
    let sink_ptr = unsafe { std::mem::transmute::<&dyn MetricsSink, *const dyn MetricsSink>(sink) };
    let prev = SINK_OVERRIDE.with(|cell| {
        let mut slot = cell.borrow_mut();
        slot.replace(sink_ptr)
    });
    let _guard = Guard(prev);

    f()
}

/// Span
/// RAII guard that emits open/finish metrics events for one operator open.
/// A span dropped without `complete` is recorded as a failed open.

pub(crate) struct Span {
    operator: &'static str,
    rows_scanned: u64,
    rows_emitted: u64,
    completed: bool,
}

impl Span {
    /// Start a metrics span for one operator open.
    #[must_use]
    pub(crate) fn new(operator: &'static str) -> Self {
        record(MetricsEvent::OperatorOpen { operator });

        Self {
            operator,
            rows_scanned: 0,
            rows_emitted: 0,
            completed: false,
        }
    }

    pub(crate) const fn set_rows_scanned(&mut self, rows: u64) {
        self.rows_scanned = rows;
    }

    pub(crate) const fn set_rows_emitted(&mut self, rows: u64) {
        self.rows_emitted = rows;
    }

    /// Mark the open as successful; the finish event fires on drop.
    pub(crate) const fn complete(&mut self) {
        self.completed = true;
    }
}

impl Drop for Span {
    fn drop(&mut self) {
        record(MetricsEvent::OperatorFinish {
            operator: self.operator,
            rows_scanned: self.rows_scanned,
            rows_emitted: self.rows_emitted,
            failed: !self.completed,
        });
    }
}
