//! Fixed-window rate limiting per client identity.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

/// Map size above which expired windows are swept.
const SWEEP_THRESHOLD: usize = 1_000;

/// Rate limiter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Length of one counting window.
    pub window: Duration,
    /// Calls admitted per client per window.
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(60),
            max_requests: 15,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct RateWindow {
    /// Window start for request counting.
    window_start: Instant,
    /// Calls seen in this window, admitted or not.
    count: u32,
}

/// Fixed-window limiter.
///
/// Rejected calls still count toward the window, so a client that keeps
/// calling stays blocked until the window rolls over.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: Mutex<HashMap<String, RateWindow>>,
}

impl RateLimiter {
    /// Create a limiter with the given settings.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Record a call from `client` and report whether it is admitted.
    pub fn allow(&self, client: &str) -> bool {
        self.allow_at(client, Instant::now())
    }

    pub(crate) fn allow_at(&self, client: &str, now: Instant) -> bool {
        let window = self.config.window;
        let fresh = RateWindow {
            window_start: now,
            count: 0,
        };
        let mut windows = self.windows.lock();

        if windows.len() > SWEEP_THRESHOLD {
            windows.retain(|_, w| now.saturating_duration_since(w.window_start) <= window);
        }

        let entry = windows.entry(client.to_string()).or_insert(fresh);
        if now.saturating_duration_since(entry.window_start) > window {
            *entry = fresh;
        }
        entry.count = entry.count.saturating_add(1);
        let admitted = entry.count <= self.config.max_requests;

        if !admitted {
            debug!("Rate limit exceeded for client {client}");
        }
        admitted
    }

    /// Calls recorded for `client` in its current window.
    pub fn count(&self, client: &str) -> u32 {
        self.windows.lock().get(client).map_or(0, |w| w.count)
    }

    /// Number of tracked client identities.
    pub fn tracked_clients(&self) -> usize {
        self.windows.lock().len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifteen_admitted_then_rejected() {
        let limiter = RateLimiter::default();
        let t0 = Instant::now();

        for i in 0..15 {
            assert!(
                limiter.allow_at("1.2.3.4", t0 + Duration::from_secs(i)),
                "call {} should be admitted",
                i + 1
            );
        }
        assert!(!limiter.allow_at("1.2.3.4", t0 + Duration::from_secs(30)));
    }

    #[test]
    fn test_rejected_calls_keep_counting() {
        let limiter = RateLimiter::default();
        let t0 = Instant::now();

        for _ in 0..20 {
            limiter.allow_at("c", t0);
        }
        assert_eq!(limiter.count("c"), 20);
        assert!(!limiter.allow_at("c", t0 + Duration::from_secs(60)));
        assert_eq!(limiter.count("c"), 21);
    }

    #[test]
    fn test_window_rollover_resets_count() {
        let limiter = RateLimiter::default();
        let t0 = Instant::now();

        for _ in 0..16 {
            limiter.allow_at("c", t0);
        }
        let after = t0 + Duration::from_secs(60) + Duration::from_millis(1);
        assert!(limiter.allow_at("c", after));
        assert_eq!(limiter.count("c"), 1);
    }

    #[test]
    fn test_clients_are_independent() {
        let limiter = RateLimiter::new(RateLimitConfig {
            window: Duration::from_secs(60),
            max_requests: 1,
        });
        let t0 = Instant::now();

        assert!(limiter.allow_at("a", t0));
        assert!(!limiter.allow_at("a", t0));
        assert!(limiter.allow_at("b", t0));
        assert_eq!(limiter.tracked_clients(), 2);
    }

    #[test]
    fn test_sweep_drops_expired_windows() {
        let limiter = RateLimiter::default();
        let t0 = Instant::now();
        for i in 0..=SWEEP_THRESHOLD {
            limiter.allow_at(&format!("client-{i}"), t0);
        }
        assert_eq!(limiter.tracked_clients(), SWEEP_THRESHOLD + 1);

        limiter.allow_at("late", t0 + Duration::from_secs(120));
        assert_eq!(limiter.tracked_clients(), 1);
    }
}
