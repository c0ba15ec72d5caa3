//! Error types for the stress runner.

use thiserror::Error;

/// Rejected environment configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The variable is set but is not an unsigned integer
    #[error("{var} must be an unsigned integer, got {value:?}")]
    NotANumber { var: &'static str, value: String },

    /// The variable parsed to zero where a positive value is required
    #[error("{var} must be greater than zero")]
    Zero { var: &'static str },

    /// The value does not fit in the platform's `usize`
    #[error("{var} is too large for this platform, got {value}")]
    OutOfRange { var: &'static str, value: u64 },

    /// The workload would write more keys than can be counted
    #[error("{tasks} tasks x {ops_per_task} rounds overflows the total operation count")]
    WorkloadTooLarge { tasks: usize, ops_per_task: usize },
}
