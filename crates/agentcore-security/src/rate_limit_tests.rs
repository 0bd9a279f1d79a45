use super::*;

#[test]
fn test_parse_valid_specs() {
    let spec: RateSpec = "5/second".parse().unwrap();
    assert_eq!(spec.count.get(), 5);
    assert_eq!(spec.period, RatePeriod::Second);

    assert_eq!("30/minute".parse::<RateSpec>().unwrap().period, RatePeriod::Minute);
    assert_eq!("1000/hour".parse::<RateSpec>().unwrap().period, RatePeriod::Hour);
}

#[test]
fn test_parse_rejects_invalid_specs() {
    for spec in [
        "", "5", "/second", "0/second", "-1/second", "+5/second", "5/day", "5/Second",
        "5/seconds", " 5/second", "5/second ", "five/minute", "5//minute",
    ] {
        assert!(
            matches!(spec.parse::<RateSpec>(), Err(SecurityError::InvalidRateSpec(_))),
            "expected '{}' to be rejected",
            spec
        );
    }
}

#[test]
fn test_burst_equals_count() {
    let limiter = RateLimiter::new();
    for _ in 0..3 {
        assert!(limiter.allow("review", "alice", "3/second").unwrap());
    }
    assert!(!limiter.allow("review", "alice", "3/second").unwrap());
}

#[test]
fn test_keys_are_independent() {
    let limiter = RateLimiter::new();
    assert!(limiter.allow("review", "alice", "1/hour").unwrap());
    assert!(!limiter.allow("review", "alice", "1/hour").unwrap());

    assert!(limiter.allow("review", "bob", "1/hour").unwrap());
    assert!(limiter.allow("deploy", "alice", "1/hour").unwrap());
    assert_eq!(limiter.len(), 3);
}

#[test]
fn test_existing_limiter_is_reused() {
    let limiter = RateLimiter::new();
    assert!(limiter.allow("s", "u", "1/hour").unwrap());
    // A looser spec on a known key does not replace the bucket.
    assert!(!limiter.allow("s", "u", "100/second").unwrap());
}

#[test]
fn test_invalid_spec_creates_nothing() {
    let limiter = RateLimiter::new();
    assert!(limiter.allow("s", "u", "10/week").is_err());
    assert!(limiter.is_empty());
}

#[test]
fn test_check_reports_rate_limited() {
    let limiter = RateLimiter::new();
    limiter.check("s", "u", "1/minute").unwrap();
    assert!(matches!(
        limiter.check("s", "u", "1/minute"),
        Err(SecurityError::RateLimited { .. })
    ));
}

#[test]
fn test_cleanup_keeps_recent_limiters() {
    let limiter = RateLimiter::new();
    limiter.allow("s", "u", "5/minute").unwrap();
    assert_eq!(limiter.cleanup(), 0);
    assert_eq!(limiter.len(), 1);
}

#[test]
fn test_cleanup_idle_evicts_regardless_of_tokens() {
    let limiter = RateLimiter::new();
    limiter.allow("s", "u", "1/hour").unwrap();
    std::thread::sleep(Duration::from_millis(5));

    assert_eq!(limiter.cleanup_idle(Duration::from_millis(1)), 1);
    assert!(limiter.is_empty());
    // A fresh bucket is created on next use.
    assert!(limiter.allow("s", "u", "1/hour").unwrap());
}
