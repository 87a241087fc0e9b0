//! In-memory request rate limiting
//!
//! Fixed-window counters keyed by caller, guarded by a mutex so concurrent
//! audit requests see consistent increment-and-compare semantics. Expired
//! windows are swept opportunistically once the map grows, so the map stays
//! bounded by the number of recently active callers.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::model::RateLimitConfig;

/// Sweep expired entries once the map holds more than this many keys
const SWEEP_THRESHOLD: usize = 1024;

struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window rate limiter keyed by caller id
pub struct RateLimiter {
    window: Duration,
    max_requests: u32,
    entries: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            window: Duration::from_secs(config.window_secs),
            max_requests: config.max_requests,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Record a request for `key` and report whether it is allowed.
    ///
    /// Counts requests against the current window; a key whose window has
    /// elapsed starts a fresh one.
    pub fn check(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut entries = self.entries.lock().expect("rate limiter lock poisoned");

        if entries.len() > SWEEP_THRESHOLD {
            let window = self.window;
            entries.retain(|_, w| now.duration_since(w.started) < window);
        }

        let window = entries.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(window.started) >= self.window {
            window.started = now;
            window.count = 0;
        }

        if window.count < self.max_requests {
            window.count += 1;
            true
        } else {
            tracing::debug!(key = %key, limit = self.max_requests, "Rate limit exceeded");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_requests: u32, window_secs: u64) -> RateLimiter {
        RateLimiter::new(&RateLimitConfig {
            max_requests,
            window_secs,
        })
    }

    #[test]
    fn test_allows_up_to_limit_then_rejects() {
        let limiter = limiter(3, 3600);

        assert!(limiter.check("user-1"));
        assert!(limiter.check("user-1"));
        assert!(limiter.check("user-1"));
        assert!(!limiter.check("user-1"));
        assert!(!limiter.check("user-1"));
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = limiter(1, 3600);

        assert!(limiter.check("user-1"));
        assert!(!limiter.check("user-1"));
        assert!(limiter.check("user-2"));
    }

    #[test]
    fn test_zero_length_window_always_resets() {
        // A zero window means every request starts a fresh window
        let limiter = limiter(1, 0);

        assert!(limiter.check("user-1"));
        assert!(limiter.check("user-1"));
        assert!(limiter.check("user-1"));
    }

    #[test]
    fn test_sweep_drops_expired_entries() {
        let limiter = limiter(1, 0);

        for i in 0..(SWEEP_THRESHOLD + 10) {
            limiter.check(&format!("user-{}", i));
        }
        // The next check triggers a sweep; with a zero window every prior
        // entry is expired and removed.
        limiter.check("one-more");

        let entries = limiter.entries.lock().unwrap();
        assert!(entries.len() <= 2);
    }
}
