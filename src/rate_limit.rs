//! Core trait for rate limiter algorithms.
//!
//! This is the seam request dispatchers compose against: check admission
//! before forwarding to a handler, and answer "too many requests" on denial.

use crate::error::AcquireResult;

/// The core trait implemented by rate limiter algorithms.
///
/// Supports both the plain boolean decision and a verbose (diagnostic)
/// variant. Object safe, so limiters can be stored as `Box<dyn RateLimitCore>`.
pub trait RateLimitCore: Send + Sync {
    /// Attempts to acquire `amount` tokens now.
    ///
    /// # Returns
    /// * `true` if the request is admitted and the tokens were consumed
    /// * `false` if denied; nothing is consumed
    fn try_acquire(&self, amount: f64) -> bool;

    /// Attempts to acquire `amount` tokens now, returning the reason on denial.
    ///
    /// Admits and denies exactly like [`try_acquire`](Self::try_acquire).
    fn try_acquire_verbose(&self, amount: f64) -> AcquireResult;

    /// Returns the number of tokens that could be acquired right now.
    fn tokens_available(&self) -> f64;

    /// Attempts to acquire a single token, the usual per-request weight.
    fn try_acquire_one(&self) -> bool {
        self.try_acquire(1.0)
    }
}
