use serde::{Deserialize, Serialize};
use std::{
    cell::RefCell,
    collections::BTreeMap,
    time::{SystemTime, UNIX_EPOCH},
};

///
/// EventState
/// Ephemeral, in-memory counters for operator execution.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub operators: BTreeMap<String, OperatorCounters>,
    pub window_start_ms: u64,
}

impl Default for EventState {
    fn default() -> Self {
        Self {
            ops: EventOps::default(),
            operators: BTreeMap::new(),
            window_start_ms: now_millis(),
        }
    }
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Operator lifecycle
    pub operator_opens: u64,
    pub open_failures: u64,

    // Rows touched
    pub rows_scanned: u64,
    pub rows_emitted: u64,

    // Grouped accumulation
    pub groups_created: u64,
    pub budget_rejections: u64,
}

///
/// OperatorCounters
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct OperatorCounters {
    pub opens: u64,
    pub open_failures: u64,
    pub rows_scanned: u64,
    pub rows_emitted: u64,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters and restart the window.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
        })
}

///
/// EventReport
/// Counter report for one metrics window.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    /// Ephemeral runtime counters since `window_start_ms`.
    pub counters: Option<EventState>,
    /// Per-operator counters and averages.
    pub operator_counters: Vec<OperatorSummary>,
}

///
/// OperatorSummary
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct OperatorSummary {
    pub operator: String,
    pub opens: u64,
    pub open_failures: u64,
    pub rows_scanned: u64,
    pub rows_emitted: u64,
    pub avg_rows_scanned_per_open: f64,
}

/// Build a metrics report, or an empty report when `window_start_ms` falls
/// after the current window start.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub(crate) fn report_window_start(window_start_ms: Option<u64>) -> EventReport {
    let snap = with_state(Clone::clone);
    if window_start_ms.is_some_and(|start| start > snap.window_start_ms) {
        return EventReport::default();
    }

    let mut operator_counters = snap
        .operators
        .iter()
        .map(|(operator, counters)| OperatorSummary {
            operator: operator.clone(),
            opens: counters.opens,
            open_failures: counters.open_failures,
            rows_scanned: counters.rows_scanned,
            rows_emitted: counters.rows_emitted,
            avg_rows_scanned_per_open: if counters.opens > 0 {
                counters.rows_scanned as f64 / counters.opens as f64
            } else {
                0.0
            },
        })
        .collect::<Vec<_>>();
    operator_counters.sort_by(|a, b| b.rows_scanned.cmp(&a.rows_scanned));

    EventReport {
        counters: Some(snap),
        operator_counters,
    }
}
