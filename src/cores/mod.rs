//! Core rate limiting algorithm implementations.
//!
//! Each core is a thread-safe, low-level limiter for a single key. Callers
//! that limit many keys hold one core per key.
//!
//! # Available Algorithms
//!
//! - **[`TokenBucketCore`]** - Allows bursts up to capacity while refilling continuously
//!
//! # Thread Safety
//!
//! Cores guard their state with an internal mutex held only for the
//! decision arithmetic. Admission checks never wait for tokens to
//! regenerate, and contention never causes a spurious denial.

pub mod token_bucket_core;
pub use token_bucket_core::TokenBucketCore;
pub use token_bucket_core::TokenBucketCoreConfig;
