use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::clock::{Clock, MonotonicClock};
use crate::error::{AcquireError, AcquireResult, ConfigError, ConfigResult};
use crate::rate_limit::RateLimitCore;

/// Core implementation of the token bucket rate limiting algorithm.
///
/// The bucket holds a real-valued number of tokens that regenerates
/// continuously at `refill_rate` tokens per second, up to `capacity`. Each
/// request consumes tokens from the bucket, and if insufficient tokens are
/// available, the request is rejected. This allows bursts up to the bucket
/// capacity while holding the sustained rate to the refill rate.
///
/// # Algorithm Behavior
///
/// - The bucket starts full with `capacity` tokens
/// - Before every decision, `elapsed × refill_rate` tokens are added, capped at capacity
/// - Requests consume tokens from the available pool
/// - If insufficient tokens are available, the request is rejected and nothing is consumed
///
/// Refill, test and deduct run under one lock, so concurrent callers on the
/// same bucket can never spend the same tokens twice.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use token_bucket_core::clock::ManualClock;
/// use token_bucket_core::cores::TokenBucketCore;
///
/// let clock = ManualClock::new();
/// // Capacity 10, refilling 2 tokens per second
/// let bucket = TokenBucketCore::with_clock(10.0, 2.0, clock.clone()).unwrap();
///
/// // Use all initial tokens
/// assert!(bucket.try_acquire(10.0));
///
/// // Should fail - no tokens left
/// assert!(!bucket.try_acquire(1.0));
///
/// // Half a second later one token is back
/// clock.advance(Duration::from_millis(500));
/// assert!(bucket.try_acquire(1.0));
/// ```
pub struct TokenBucketCore<C: Clock = MonotonicClock> {
    /// Maximum number of tokens the bucket can hold
    capacity: f64,
    /// Tokens added per second
    refill_rate: f64,
    clock: C,
    /// Internal state protected by mutex for thread safety
    state: Mutex<TokenBucketCoreState>,
}

/// Internal state of the token bucket
struct TokenBucketCoreState {
    /// Current number of tokens available in the bucket
    tokens: f64,
    /// Instant the tokens were last brought up to date
    last_refill: Instant,
}

impl TokenBucketCoreState {
    /// Adds the tokens regenerated since `last_refill`, capped at `capacity`.
    ///
    /// An instant earlier than `last_refill` counts as zero elapsed time and
    /// leaves `last_refill` where it is.
    #[inline(always)]
    fn refill(&mut self, now: Instant, capacity: f64, refill_rate: f64) {
        match now.checked_duration_since(self.last_refill) {
            Some(elapsed) => {
                let refilled = elapsed.as_secs_f64() * refill_rate;
                self.tokens = (self.tokens + refilled).min(capacity);
                self.last_refill = now;
            }
            None => {
                warn!(
                    behind = ?(self.last_refill - now),
                    "clock moved backwards; treating elapsed time as zero"
                );
            }
        }
    }
}

impl<C: Clock> RateLimitCore for TokenBucketCore<C> {
    /// Attempts to acquire `amount` tokens now.
    ///
    /// This method is a wrapper that calls the main `try_acquire` logic.
    #[inline(always)]
    fn try_acquire(&self, amount: f64) -> bool {
        self.try_acquire(amount)
    }

    /// Attempts to acquire `amount` tokens now, returning detailed diagnostics.
    ///
    /// This method is a wrapper that calls the main `try_acquire_verbose` logic.
    #[inline(always)]
    fn try_acquire_verbose(&self, amount: f64) -> AcquireResult {
        self.try_acquire_verbose(amount)
    }

    #[inline(always)]
    fn tokens_available(&self) -> f64 {
        self.tokens_available()
    }
}

impl TokenBucketCore {
    /// Creates a new, full token bucket driven by the system monotonic clock.
    ///
    /// # Parameters
    ///
    /// * `capacity` - Maximum number of tokens the bucket can hold
    /// * `refill_rate` - Tokens added per second
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfiguration`] if either parameter is
    /// not a finite number greater than zero.
    ///
    /// # Example
    ///
    /// ```rust
    /// use token_bucket_core::cores::TokenBucketCore;
    ///
    /// let bucket = TokenBucketCore::new(100.0, 10.0).unwrap();
    /// assert!(TokenBucketCore::new(0.0, 10.0).is_err());
    /// ```
    pub fn new(capacity: f64, refill_rate: f64) -> ConfigResult<Self> {
        Self::with_clock(capacity, refill_rate, MonotonicClock)
    }

    /// Creates a bucket that regains `amount` tokens every `interval`.
    ///
    /// Refill is still continuous: `amount / interval` tokens per second.
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use token_bucket_core::cores::TokenBucketCore;
    ///
    /// let bucket = TokenBucketCore::with_refill_interval(100.0, Duration::from_secs(10), 5.0).unwrap();
    /// assert_eq!(bucket.refill_rate(), 0.5);
    /// ```
    pub fn with_refill_interval(capacity: f64, interval: Duration, amount: f64) -> ConfigResult<Self> {
        TokenBucketCoreConfig::per_interval(capacity, interval, amount)?.build()
    }
}

impl<C: Clock> TokenBucketCore<C> {
    /// Creates a new, full token bucket reading time from `clock`.
    ///
    /// Same contract as [`TokenBucketCore::new`].
    pub fn with_clock(capacity: f64, refill_rate: f64, clock: C) -> ConfigResult<Self> {
        let capacity = ensure_positive("capacity", capacity)?;
        let refill_rate = ensure_positive("refill_rate", refill_rate)?;

        let last_refill = clock.now();
        debug!(capacity, refill_rate, "token bucket created");

        Ok(TokenBucketCore {
            capacity,
            refill_rate,
            clock,
            state: Mutex::new(TokenBucketCoreState {
                tokens: capacity, // Bucket starts full
                last_refill,
            }),
        })
    }

    /// Attempts to acquire `amount` tokens now.
    ///
    /// Refills the bucket for the time elapsed since the last call, then
    /// deducts `amount` if that many tokens are available. Never waits for
    /// tokens to regenerate.
    ///
    /// * A zero amount is always admitted and consumes nothing.
    /// * An amount above the capacity is always denied.
    /// * A negative or NaN amount is denied.
    ///
    /// # Returns
    /// * `true` - If the tokens were acquired
    /// * `false` - If denied; the token count is left unchanged
    #[inline]
    pub fn try_acquire(&self, amount: f64) -> bool {
        self.try_acquire_verbose(amount).is_ok()
    }

    /// Attempts to acquire `amount` tokens now, returning detailed diagnostics
    /// on denial.
    ///
    /// Admits and denies exactly like [`try_acquire`](Self::try_acquire).
    ///
    /// # Returns
    /// * `Ok(())` - If the tokens were acquired
    /// * `Err(AcquireError::InvalidAmount)` - If `amount` is negative or NaN
    /// * `Err(AcquireError::BeyondCapacity)` - If `amount` exceeds the bucket capacity
    /// * `Err(AcquireError::InsufficientTokens)` - If not enough tokens are available now,
    ///   with how many are available and how long to wait before the same request fits
    ///
    /// # Example
    ///
    /// ```rust
    /// use token_bucket_core::AcquireError;
    /// use token_bucket_core::cores::TokenBucketCore;
    ///
    /// let bucket = TokenBucketCore::new(100.0, 10.0).unwrap();
    ///
    /// match bucket.try_acquire_verbose(30.0) {
    ///     Ok(()) => println!("Request allowed!"),
    ///     Err(AcquireError::InsufficientTokens { available, retry_after, .. }) => {
    ///         println!("Please retry in {:?} ({} tokens available)", retry_after, available);
    ///     }
    ///     Err(e) => println!("Denied: {}", e),
    /// }
    /// ```
    pub fn try_acquire_verbose(&self, amount: f64) -> AcquireResult {
        if amount.is_nan() || amount < 0.0 {
            warn!(amount, "rejecting invalid token amount");
            return Err(AcquireError::InvalidAmount { amount });
        }

        let mut state = self.state.lock();
        let now = self.clock.now();
        state.refill(now, self.capacity, self.refill_rate);

        if amount <= state.tokens {
            state.tokens -= amount;
            return Ok(());
        }

        let available = state.tokens;
        drop(state);
        trace!(acquiring = amount, available, "token bucket denied request");

        if amount > self.capacity {
            return Err(AcquireError::BeyondCapacity {
                acquiring: amount,
                capacity: self.capacity,
            });
        }

        Err(AcquireError::InsufficientTokens {
            acquiring: amount,
            available,
            retry_after: retry_after(available, amount, self.refill_rate),
        })
    }

    /// Gets the number of tokens available right now.
    ///
    /// This method updates the bucket state based on elapsed time (performs
    /// refill), then returns the token count without consuming anything.
    #[inline]
    pub fn tokens_available(&self) -> f64 {
        let mut state = self.state.lock();
        let now = self.clock.now();
        state.refill(now, self.capacity, self.refill_rate);
        state.tokens
    }

    /// Gets the token count as of the last refill, without refilling.
    #[inline]
    pub fn current_tokens(&self) -> f64 {
        self.state.lock().tokens
    }

    /// Maximum number of tokens the bucket can hold.
    #[inline]
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Tokens added per second.
    #[inline]
    pub fn refill_rate(&self) -> f64 {
        self.refill_rate
    }
}

/// Smallest whole-nanosecond wait after which refilling `available` covers
/// `amount`, using the same f64 arithmetic as [`TokenBucketCoreState::refill`].
///
/// Never zero for a request that was denied; saturates at [`Duration::MAX`].
fn retry_after(available: f64, amount: f64, refill_rate: f64) -> Duration {
    let wait_nanos = ((amount - available) / refill_rate * 1e9).ceil();
    if !(wait_nanos < u64::MAX as f64) {
        return Duration::MAX;
    }

    let mut nanos = (wait_nanos as u64).max(1);
    let mut step = 1u64;
    while available + Duration::from_nanos(nanos).as_secs_f64() * refill_rate < amount {
        nanos = match nanos.checked_add(step) {
            Some(next) => next,
            None => return Duration::MAX,
        };
        step = step.saturating_mul(2);
    }
    Duration::from_nanos(nanos)
}

fn ensure_positive(parameter: &'static str, value: f64) -> ConfigResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidConfiguration { parameter, value })
    }
}

/// Configuration structure for creating a `TokenBucketCore` limiter.
///
/// With the `serde` feature enabled this can be read straight out of an
/// application config file:
///
/// ```toml
/// [rate_limit]
/// capacity = 100.0
/// refill_rate = 10.0
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct TokenBucketCoreConfig {
    /// Maximum number of tokens the bucket can hold.
    pub capacity: f64,
    /// Tokens added per second.
    pub refill_rate: f64,
}

impl TokenBucketCoreConfig {
    /// Creates a new configuration instance.
    pub fn new(capacity: f64, refill_rate: f64) -> Self {
        Self {
            capacity,
            refill_rate,
        }
    }

    /// Creates a configuration that regains `amount` tokens every `interval`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfiguration`] for a zero interval or a
    /// non-positive amount.
    pub fn per_interval(capacity: f64, interval: Duration, amount: f64) -> ConfigResult<Self> {
        if interval.is_zero() {
            return Err(ConfigError::InvalidConfiguration {
                parameter: "refill_interval",
                value: 0.0,
            });
        }
        let amount = ensure_positive("refill_amount", amount)?;
        Ok(Self::new(capacity, amount / interval.as_secs_f64()))
    }

    /// Checks the configuration without building a bucket.
    pub fn validate(&self) -> ConfigResult<()> {
        ensure_positive("capacity", self.capacity)?;
        ensure_positive("refill_rate", self.refill_rate)?;
        Ok(())
    }

    /// Builds a bucket driven by the system monotonic clock.
    pub fn build(self) -> ConfigResult<TokenBucketCore> {
        TokenBucketCore::new(self.capacity, self.refill_rate)
    }

    /// Builds a bucket reading time from `clock`.
    pub fn build_with_clock<C: Clock>(self, clock: C) -> ConfigResult<TokenBucketCore<C>> {
        TokenBucketCore::with_clock(self.capacity, self.refill_rate, clock)
    }
}

impl TryFrom<TokenBucketCoreConfig> for TokenBucketCore {
    type Error = ConfigError;

    /// Converts a `TokenBucketCoreConfig` into a `TokenBucketCore` instance.
    ///
    /// # Examples
    ///
    /// Using [`TryFrom::try_from`] explicitly:
    ///
    /// ```
    /// use token_bucket_core::cores::{TokenBucketCore, TokenBucketCoreConfig};
    ///
    /// let config = TokenBucketCoreConfig {
    ///     capacity: 100.0,
    ///     refill_rate: 0.5,
    /// };
    ///
    /// let limiter = TokenBucketCore::try_from(config).unwrap();
    /// ```
    ///
    /// Using `.try_into()` with type inference:
    ///
    /// ```
    /// use token_bucket_core::cores::{TokenBucketCore, TokenBucketCoreConfig};
    ///
    /// let limiter: Result<TokenBucketCore, _> = TokenBucketCoreConfig {
    ///     capacity: -1.0,
    ///     refill_rate: 0.5,
    /// }.try_into();
    /// assert!(limiter.is_err());
    /// ```
    #[inline]
    fn try_from(config: TokenBucketCoreConfig) -> ConfigResult<Self> {
        config.build()
    }
}
