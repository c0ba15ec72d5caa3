//! Runner configuration.

use std::time::Duration;

use crate::error::ConfigError;

pub const TASKS_VAR: &str = "TILLCACHE_TASKS";
pub const OPS_VAR: &str = "TILLCACHE_OPS";
pub const TTL_MS_VAR: &str = "TILLCACHE_TTL_MS";

/// Options controlling the concurrent workload and the expiry walkthrough.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StressOptions {
    /// Number of concurrent tasks sharing the cache
    pub tasks: usize,

    /// Rounds each task performs
    pub ops_per_task: usize,

    /// Lifetime given to the entry in the expiry walkthrough
    pub ttl: Duration,
}

impl Default for StressOptions {
    fn default() -> Self {
        Self {
            tasks: 8,
            ops_per_task: 1000,
            ttl: Duration::from_millis(50),
        }
    }
}

impl StressOptions {
    /// Create options from environment variables.
    ///
    /// Reads:
    /// - `TILLCACHE_TASKS` - concurrent tasks (defaults to 8)
    /// - `TILLCACHE_OPS` - rounds per task (defaults to 1000)
    /// - `TILLCACHE_TTL_MS` - walkthrough ttl in milliseconds (defaults to 50)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Create options from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let tasks = positive_usize(&lookup, TASKS_VAR, defaults.tasks)?;
        let ops_per_task = positive_usize(&lookup, OPS_VAR, defaults.ops_per_task)?;
        let ttl_ms = positive(&lookup, TTL_MS_VAR, defaults.ttl.as_millis() as u64)?;

        if tasks.checked_mul(ops_per_task).is_none() {
            return Err(ConfigError::WorkloadTooLarge {
                tasks,
                ops_per_task,
            });
        }

        Ok(Self {
            tasks,
            ops_per_task,
            ttl: Duration::from_millis(ttl_ms),
        })
    }

    /// Number of task-owned keys the workload writes.
    ///
    /// Checked against overflow by [`StressOptions::from_lookup`]; saturates
    /// for options built by hand.
    pub fn total_ops(&self) -> usize {
        self.tasks.saturating_mul(self.ops_per_task)
    }
}

fn positive_usize(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: usize,
) -> Result<usize, ConfigError> {
    let value = positive(lookup, var, default as u64)?;
    usize::try_from(value).map_err(|_| ConfigError::OutOfRange { var, value })
}

fn positive(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: u64,
) -> Result<u64, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };

    let value: u64 = raw.trim().parse().map_err(|_| ConfigError::NotANumber {
        var,
        value: raw.clone(),
    })?;
    if value == 0 {
        return Err(ConfigError::Zero { var });
    }
    Ok(value)
}
