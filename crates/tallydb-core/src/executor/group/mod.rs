//! Module: executor::group
//! Responsibility: group key representation and grouped budget accounting.
//! Does not own: aggregate fold algorithms or limit policy selection.
//! Boundary: grouped execution substrate shared by aggregators.


use crate::{
    config::ExecutionConfig,
    obs::sink::{MetricsEvent, record},
    value::Value,
};
use thiserror::Error as ThisError;

///
/// GroupKey
///
/// Accumulator mapping key. `Ungrouped` is the single key used when no
/// group field is configured; it is never produced alongside `Value` keys
/// within one aggregator.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum GroupKey {
    Ungrouped,
    Value(Value),
}

impl GroupKey {
    /// Return the grouping value, absent for the ungrouped key.
    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        match self {
            Self::Ungrouped => None,
            Self::Value(value) => Some(value),
        }
    }

    fn heap_bytes(&self) -> usize {
        self.value().map_or(0, Value::heap_bytes)
    }
}

///
/// GroupError
///
/// Typed grouped-execution error surface.
/// Keeps grouped memory-limit failures explicit instead of degrading them
/// into generic internal errors.
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum GroupError {
    #[error(
        "grouped execution memory limit exceeded ({resource}): attempted={attempted}, limit={limit}"
    )]
    MemoryLimitExceeded {
        resource: &'static str,
        attempted: u64,
        limit: u64,
    },
}

///
/// ExecutionBudget
///
/// ExecutionBudget tracks grouped-execution resource usage for one
/// accumulation pass. `estimated_bytes` is a conservative allocation
/// estimate used for memory guardrails, not an exact measurement.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ExecutionBudget {
    groups: u64,
    estimated_bytes: u64,
}

impl ExecutionBudget {
    /// Build one zeroed grouped-execution budget.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            groups: 0,
            estimated_bytes: 0,
        }
    }

    #[must_use]
    pub const fn groups(&self) -> u64 {
        self.groups
    }

    #[must_use]
    pub const fn estimated_bytes(&self) -> u64 {
        self.estimated_bytes
    }

    /// Charge one new group against `config`, leaving the budget untouched
    /// when either limit would be exceeded.
    pub(crate) fn record_new_group(
        &mut self,
        config: &ExecutionConfig,
        key: &GroupKey,
        state_bytes: usize,
    ) -> Result<(), GroupError> {
        let next_groups = self.groups.saturating_add(1);
        if next_groups > config.max_groups() {
            return Err(reject("groups", next_groups, config.max_groups()));
        }

        let bytes_delta = saturating_u64_from_usize(
            size_of::<GroupKey>()
                .saturating_add(key.heap_bytes())
                .saturating_add(state_bytes),
        );
        let next_bytes = self.estimated_bytes.saturating_add(bytes_delta);
        if next_bytes > config.max_group_bytes() {
            return Err(reject(
                "estimated_bytes",
                next_bytes,
                config.max_group_bytes(),
            ));
        }

        self.groups = next_groups;
        self.estimated_bytes = next_bytes;
        record(MetricsEvent::GroupCreated);

        Ok(())
    }
}

fn reject(resource: &'static str, attempted: u64, limit: u64) -> GroupError {
    record(MetricsEvent::BudgetRejected { resource });

    GroupError::MemoryLimitExceeded {
        resource,
        attempted,
        limit,
    }
}

fn saturating_u64_from_usize(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}
