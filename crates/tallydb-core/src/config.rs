//! Module: config
//! Responsibility: execution hard-limit policy and its TOML loading surface.
//! Does not own: budget accounting (see `executor::group`).
//! Boundary: policy values handed to operators at construction time.

use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// ExecutionConfig
///
/// ExecutionConfig defines hard grouped-execution limits.
/// Limits stay policy-owned at operator boundaries instead of inside
/// accumulator state so memory policy remains centralized.
/// The default is unbounded; hard limits are opt-in.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutionConfig {
    max_groups: u64,
    max_group_bytes: u64,
}

impl ExecutionConfig {
    /// Build one grouped hard-limit configuration.
    #[must_use]
    pub const fn with_hard_limits(max_groups: u64, max_group_bytes: u64) -> Self {
        Self {
            max_groups,
            max_group_bytes,
        }
    }

    /// Build one unbounded configuration for callers that own their own
    /// memory policy.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self::with_hard_limits(u64::MAX, u64::MAX)
    }

    #[must_use]
    pub const fn max_groups(&self) -> u64 {
        self.max_groups
    }

    #[must_use]
    pub const fn max_group_bytes(&self) -> u64 {
        self.max_group_bytes
    }

    /// Parse an execution config from a TOML document.
    ///
    /// Limits are read from an optional `[execution]` table; absent keys
    /// stay unbounded.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(source)?;
        file.execution.validate()?;

        Ok(file.execution)
    }

    /// Reject limits that would refuse every group.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_groups == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "max_groups",
            });
        }
        if self.max_group_bytes == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "max_group_bytes",
            });
        }

        Ok(())
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    execution: ExecutionConfig,
}

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("invalid execution config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("execution config limit `{field}` must be positive")]
    ZeroLimit { field: &'static str },
}

///
/// TESTS
///
