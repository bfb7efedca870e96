use std::thread::sleep;
use std::time::Duration;

use crate::{BreakerState, CircuitBreaker};

#[test]
fn new_tool_starts_closed_and_allows_calls() {
    let mut breaker = CircuitBreaker::new(3, Duration::from_secs(60));
    assert!(breaker.can_call("tool_a"));
}

#[test]
fn trips_open_after_threshold_consecutive_failures() {
    let mut breaker = CircuitBreaker::new(3, Duration::from_secs(60));
    assert!(!breaker.record_failure("tool_a"));
    assert!(!breaker.record_failure("tool_a"));
    assert!(breaker.record_failure("tool_a"));
    assert!(!breaker.can_call("tool_a"));
}

#[test]
fn success_resets_consecutive_failure_count_while_closed() {
    let mut breaker = CircuitBreaker::new(3, Duration::from_secs(60));
    breaker.record_failure("tool_a");
    breaker.record_failure("tool_a");
    breaker.record_success("tool_a");
    assert!(!breaker.record_failure("tool_a"));
    assert!(!breaker.record_failure("tool_a"));
    assert!(breaker.can_call("tool_a"));
}

#[test]
fn half_open_after_timeout_elapses() {
    let mut breaker = CircuitBreaker::new(1, Duration::from_millis(20));
    breaker.record_failure("tool_a");
    assert!(!breaker.can_call("tool_a"));
    sleep(Duration::from_millis(30));
    assert!(breaker.can_call("tool_a"));

    let status = breaker.get_status();
    assert_eq!(status["tool_a"].state, BreakerState::HalfOpen);
}

#[test]
fn successful_probe_closes_the_breaker() {
    let mut breaker = CircuitBreaker::new(1, Duration::from_millis(10));
    breaker.record_failure("tool_a");
    sleep(Duration::from_millis(15));
    assert!(breaker.can_call("tool_a"));
    breaker.record_success("tool_a");

    let status = breaker.get_status();
    assert_eq!(status["tool_a"].state, BreakerState::Closed);
    assert_eq!(status["tool_a"].failure_count, 0);
}

#[test]
fn failed_probe_reopens_the_breaker_and_counts_a_trip() {
    let mut breaker = CircuitBreaker::new(1, Duration::from_millis(10));
    breaker.record_failure("tool_a");
    sleep(Duration::from_millis(15));
    assert!(breaker.can_call("tool_a"));
    assert!(breaker.record_failure("tool_a"));

    let status = breaker.get_status();
    assert_eq!(status["tool_a"].state, BreakerState::Open);
    assert_eq!(status["tool_a"].trip_count, 2);
}

#[test]
fn tools_have_independent_breakers() {
    let mut breaker = CircuitBreaker::new(1, Duration::from_secs(60));
    breaker.record_failure("tool_a");
    assert!(!breaker.can_call("tool_a"));
    assert!(breaker.can_call("tool_b"));
}

#[test]
fn manual_reset_clears_a_tripped_breaker() {
    let mut breaker = CircuitBreaker::new(1, Duration::from_secs(60));
    breaker.record_failure("tool_a");
    assert!(!breaker.can_call("tool_a"));
    breaker.reset("tool_a");
    assert!(breaker.can_call("tool_a"));
}

#[test]
fn reset_all_clears_every_breaker() {
    let mut breaker = CircuitBreaker::new(1, Duration::from_secs(60));
    breaker.record_failure("tool_a");
    breaker.record_failure("tool_b");
    breaker.reset_all();
    assert!(breaker.can_call("tool_a"));
    assert!(breaker.can_call("tool_b"));
}

#[test]
fn get_status_is_empty_for_untouched_breaker() {
    let mut breaker = CircuitBreaker::new(3, Duration::from_secs(60));
    assert!(breaker.get_status().is_empty());
}
