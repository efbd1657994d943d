//! error.rs
//! Construction and admission error types.

use std::time::Duration;

/// Error returned when a bucket is built from invalid parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A parameter was zero, negative, NaN or infinite.
    #[error("invalid configuration: `{parameter}` must be finite and greater than 0, got {value}")]
    InvalidConfiguration {
        parameter: &'static str,
        value: f64,
    },
}

/// Result type for bucket construction.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Reason an admission check was denied. Contains diagnostic information.
///
/// Only the verbose path reports these; [`try_acquire`](crate::cores::TokenBucketCore::try_acquire)
/// folds every variant into `false`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AcquireError {
    /// Not enough tokens available right now.
    #[error(
        "insufficient tokens: tried to acquire {acquiring}, available {available}, retry after {retry_after:?}"
    )]
    InsufficientTokens {
        acquiring: f64,
        available: f64,
        retry_after: Duration,
    },
    /// Request permanently exceeds the configured capacity.
    #[error("request exceeds maximum capacity: tried to acquire {acquiring}, capacity {capacity}. This request cannot succeed")]
    BeyondCapacity { acquiring: f64, capacity: f64 },
    /// Requested amount is negative or NaN.
    #[error("invalid amount requested: {amount}")]
    InvalidAmount { amount: f64 },
}

/// Result type for verbose admission checks.
pub type AcquireResult = Result<(), AcquireError>;
