use std::sync::Arc;
use std::time::{Duration, Instant};

use token_bucket_core::clock::{Clock, ManualClock, MonotonicClock};

#[test]
fn monotonic_clock_never_goes_backwards() {
    let clock = MonotonicClock;
    let first = clock.now();
    let second = clock.now();
    assert!(second >= first);
}

#[test]
fn manual_clock_clones_share_time() {
    let clock = ManualClock::new();
    let handle = clock.clone();
    let start = clock.now();

    handle.advance(Duration::from_millis(250));
    assert_eq!(clock.now() - start, Duration::from_millis(250));

    handle.rewind(Duration::from_millis(100));
    assert_eq!(clock.now() - start, Duration::from_millis(150));

    clock.set(start);
    assert_eq!(handle.now(), start);
}

#[test]
fn manual_clock_stays_put_between_reads() {
    let clock = ManualClock::new();
    assert_eq!(clock.now(), clock.now());
}

#[test]
fn shared_clock_forwards_to_inner() {
    let clock = ManualClock::new();
    let shared: Arc<dyn Clock> = Arc::new(clock.clone());
    clock.advance(Duration::from_secs(1));
    assert_eq!(shared.now(), clock.now());
    assert_eq!(read(&clock), clock.now());
}

fn read<C: Clock>(clock: C) -> Instant {
    clock.now()
}

#[test]
fn manual_clock_ignores_unrepresentable_moves() {
    let clock = ManualClock::new();
    let start = clock.now();

    clock.advance(Duration::MAX);
    assert_eq!(clock.now(), start);

    clock.rewind(Duration::MAX);
    assert_eq!(clock.now(), start);
}
