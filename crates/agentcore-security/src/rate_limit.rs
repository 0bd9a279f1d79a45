//! Per-key token-bucket rate limiting.
//!
//! Each `(skill, user)` key owns one independent bucket, created from a
//! human-readable spec on first use and reused afterwards. The last-access
//! timestamp only drives eviction; it never affects a limiting decision.

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::str::FromStr;
use std::time::{Duration, Instant};

use governor::{DefaultDirectRateLimiter, Quota};
use parking_lot::Mutex;
use tracing::{debug, info};

use agentcore_protocols::error::SecurityError;

/// Limiters idle for longer than this are evicted by [`RateLimiter::cleanup`].
const IDLE_EVICTION: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatePeriod {
    Second,
    Minute,
    Hour,
}

/// A parsed `<count>/<second|minute|hour>` spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateSpec {
    pub count: NonZeroU32,
    pub period: RatePeriod,
}

impl RateSpec {
    /// Quota whose burst capacity equals `count`.
    fn quota(&self) -> Quota {
        match self.period {
            RatePeriod::Second => Quota::per_second(self.count),
            RatePeriod::Minute => Quota::per_minute(self.count),
            RatePeriod::Hour => Quota::per_hour(self.count),
        }
    }
}

impl FromStr for RateSpec {
    type Err = SecurityError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let invalid = || SecurityError::InvalidRateSpec(spec.to_string());

        let (count, period) = spec.split_once('/').ok_or_else(invalid)?;
        if count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let count = count
            .parse::<u32>()
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(invalid)?;
        let period = match period {
            "second" => RatePeriod::Second,
            "minute" => RatePeriod::Minute,
            "hour" => RatePeriod::Hour,
            _ => return Err(invalid()),
        };

        Ok(Self { count, period })
    }
}

struct KeyState {
    limiter: DefaultDirectRateLimiter,
    last_access: Instant,
}

/// Rate limiter keyed by `(skill, user)`.
pub struct RateLimiter {
    limiters: Mutex<HashMap<(String, String), KeyState>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            limiters: Mutex::new(HashMap::new()),
        }
    }

    /// Take one token from the bucket for `(skill, user)`.
    ///
    /// `spec` is parsed only when the key is first seen; later calls reuse
    /// the existing bucket whatever spec they pass.
    pub fn allow(&self, skill: &str, user: &str, spec: &str) -> Result<bool, SecurityError> {
        let mut limiters = self.limiters.lock();
        let key = (skill.to_string(), user.to_string());

        let state = match limiters.get_mut(&key) {
            Some(state) => state,
            None => {
                let parsed: RateSpec = spec.parse()?;
                debug!("Creating rate limiter for {}/{}: {}", skill, user, spec);
                limiters.entry(key).or_insert(KeyState {
                    limiter: DefaultDirectRateLimiter::direct(parsed.quota()),
                    last_access: Instant::now(),
                })
            }
        };

        state.last_access = Instant::now();
        let allowed = state.limiter.check().is_ok();
        if !allowed {
            debug!("Rate limit exceeded for {}/{}", skill, user);
        }
        Ok(allowed)
    }

    /// Like [`allow`](Self::allow) but reports a denial as an error.
    pub fn check(&self, skill: &str, user: &str, spec: &str) -> Result<(), SecurityError> {
        if self.allow(skill, user, spec)? {
            Ok(())
        } else {
            Err(SecurityError::RateLimited {
                skill: skill.to_string(),
                user: user.to_string(),
            })
        }
    }

    /// Evict limiters unused for over an hour. Returns the number evicted.
    pub fn cleanup(&self) -> usize {
        self.cleanup_idle(IDLE_EVICTION)
    }

    /// Evict limiters idle for longer than `max_idle`, regardless of their
    /// remaining tokens.
    pub fn cleanup_idle(&self, max_idle: Duration) -> usize {
        let mut limiters = self.limiters.lock();
        let before = limiters.len();
        limiters.retain(|_, state| state.last_access.elapsed() <= max_idle);
        let evicted = before - limiters.len();
        if evicted > 0 {
            info!("Evicted {} idle rate limiters", evicted);
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.limiters.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "rate_limit_tests.rs"]
mod tests;
