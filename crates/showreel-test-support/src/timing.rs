use std::time::Duration;

/// Asserts that `actual` is `expected_ms` milliseconds, give or take the
/// runtime's one-millisecond timer granularity.
///
/// # Panics
///
/// Panics when `actual` is earlier than `expected_ms` or more than 5 ms late.
#[track_caller]
pub fn assert_near(actual: Duration, expected_ms: u64) {
    let expected = Duration::from_millis(expected_ms);
    assert!(
        actual >= expected && actual <= expected + Duration::from_millis(5),
        "expected ~{expected_ms} ms, got {actual:?}"
    );
}
