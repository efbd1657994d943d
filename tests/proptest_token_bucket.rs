//! Property-based tests for the token bucket core

use std::time::Duration;

use proptest::prelude::*;
use token_bucket_core::clock::ManualClock;
use token_bucket_core::cores::TokenBucketCore;

#[derive(Debug, Clone)]
enum Op {
    Acquire(f64),
    Advance(u64),
    Rewind(u64),
    Inspect,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0.0f64..50.0).prop_map(Op::Acquire),
        3 => (0u64..5_000).prop_map(Op::Advance),
        1 => (0u64..1_000).prop_map(Op::Rewind),
        1 => Just(Op::Inspect),
    ]
}

proptest! {
    /// Tokens stay within [0, capacity] whatever happens
    #[test]
    fn tokens_stay_within_bounds(
        capacity in 0.5f64..40.0,
        refill_rate in 0.01f64..100.0,
        ops in prop::collection::vec(op(), 1..200),
    ) {
        let clock = ManualClock::new();
        let bucket = TokenBucketCore::with_clock(capacity, refill_rate, clock.clone()).unwrap();

        for op in ops {
            match op {
                Op::Acquire(amount) => {
                    bucket.try_acquire(amount);
                }
                Op::Advance(millis) => clock.advance(Duration::from_millis(millis)),
                Op::Rewind(millis) => clock.rewind(Duration::from_millis(millis)),
                Op::Inspect => {
                    bucket.tokens_available();
                }
            }
            let tokens = bucket.current_tokens();
            prop_assert!(tokens >= 0.0);
            prop_assert!(tokens <= capacity);
        }
    }

    /// An admitted request deducts exactly its amount, a denied one nothing
    #[test]
    fn acquire_deducts_exactly(
        capacity in 1.0f64..40.0,
        amounts in prop::collection::vec(0.0f64..60.0, 1..50),
    ) {
        let clock = ManualClock::new();
        let bucket = TokenBucketCore::with_clock(capacity, 1.0, clock).unwrap();

        for amount in amounts {
            let before = bucket.current_tokens();
            let admitted = bucket.try_acquire(amount);
            let after = bucket.current_tokens();
            prop_assert_eq!(admitted, amount <= before);
            if admitted {
                prop_assert_eq!(after, before - amount);
            } else {
                prop_assert_eq!(after, before);
            }
        }
    }

    /// Refilling never takes tokens away
    #[test]
    fn refill_never_decreases_tokens(
        capacity in 0.5f64..40.0,
        refill_rate in 0.01f64..100.0,
        spend in 0.0f64..1.0,
        steps in prop::collection::vec(0u64..2_000, 1..50),
    ) {
        let clock = ManualClock::new();
        let bucket = TokenBucketCore::with_clock(capacity, refill_rate, clock.clone()).unwrap();
        bucket.try_acquire(capacity * spend);

        let mut previous = bucket.tokens_available();
        for millis in steps {
            clock.advance(Duration::from_millis(millis));
            let current = bucket.tokens_available();
            prop_assert!(current >= previous);
            previous = current;
        }
    }

    /// Requests above capacity are denied even on a full bucket
    #[test]
    fn over_capacity_is_always_denied(
        capacity in 0.5f64..40.0,
        excess in 0.001f64..100.0,
        wait_secs in 0u64..10_000,
    ) {
        let clock = ManualClock::new();
        let bucket = TokenBucketCore::with_clock(capacity, 1.0, clock.clone()).unwrap();
        clock.advance(Duration::from_secs(wait_secs));
        prop_assert!(!bucket.try_acquire(capacity + excess));
        prop_assert!(bucket.try_acquire(capacity));
    }
}
