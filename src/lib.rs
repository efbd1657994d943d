//! Admission control with a continuous-time token bucket.
//!
//! A [`TokenBucketCore`](cores::TokenBucketCore) tracks a capped pool of
//! tokens that regenerates at a fixed rate. Each admission check refills the
//! pool for the time elapsed since the previous check, then admits the
//! request and deducts its cost if enough tokens are available. The whole
//! refill-test-deduct sequence is atomic per bucket.
//!
//! # Quick Start
//!
//! ```rust
//! use token_bucket_core::cores::TokenBucketCore;
//!
//! // Hold at most 100 tokens, regaining 10 per second
//! let limiter = TokenBucketCore::new(100.0, 10.0).unwrap();
//!
//! if limiter.try_acquire(20.0) {
//!     println!("Request allowed");
//! } else {
//!     println!("Request denied");
//! }
//! ```
//!
//! # Core Concepts
//!
//! ## Time Representation
//! Buckets read time from a [`Clock`](clock::Clock). The default
//! [`MonotonicClock`](clock::MonotonicClock) is immune to wall-clock
//! adjustments; [`ManualClock`](clock::ManualClock) lets tests move time
//! without sleeping.
//!
//! ## Error Handling
//! Construction fails fast with [`ConfigError::InvalidConfiguration`] for a
//! non-positive or non-finite capacity or refill rate. A denied request is
//! an ordinary `false`, never an error. Callers that want to know why can use
//! `try_acquire_verbose`, which reports an [`AcquireError`]:
//! - **[`InsufficientTokens`](AcquireError::InsufficientTokens)** - not enough tokens now, with a retry hint
//! - **[`BeyondCapacity`](AcquireError::BeyondCapacity)** - the request can never fit
//! - **[`InvalidAmount`](AcquireError::InvalidAmount)** - negative or NaN amount
//!
//! ## Composing With a Dispatcher
//! Anything that dispatches work can gate it through [`RateLimitCore`]:
//!
//! ```rust
//! use token_bucket_core::RateLimitCore;
//! use token_bucket_core::cores::TokenBucketCore;
//!
//! fn dispatch(limiter: &dyn RateLimitCore, handler: impl FnOnce() -> u16) -> u16 {
//!     if limiter.try_acquire_one() {
//!         handler()
//!     } else {
//!         429
//!     }
//! }
//!
//! let limiter = TokenBucketCore::new(1.0, 0.001).unwrap();
//! assert_eq!(dispatch(&limiter, || 200), 200);
//! assert_eq!(dispatch(&limiter, || 200), 429);
//! ```

pub mod clock;
pub mod cores;
pub mod error;
pub mod rate_limit;

pub use error::{AcquireError, AcquireResult, ConfigError, ConfigResult};
pub use rate_limit::RateLimitCore;
