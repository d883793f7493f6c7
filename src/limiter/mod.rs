//! Per-client IP rate limiting with fixed windows
//!
//! Each IP gets a counter that starts on its first request and resets once
//! the window has elapsed. Counters live in a `DashMap`, so the
//! read-modify-write for one IP happens under that key's shard lock and
//! concurrent requests from the same address cannot lose updates.

mod middleware;

pub use middleware::{is_limited_path, rate_limit, RATE_LIMIT_MESSAGE};

use std::net::IpAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::{debug, info};

use crate::config::RateLimitConfig;

/// Checks between sweeps of expired windows
const SWEEP_EVERY: u64 = 1024;

/// Counter state for one client IP
#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Outcome of a single [`RateLimiter::check`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Request counted and may proceed
    Allowed { remaining: u32 },
    /// Quota for the current window is used up
    Limited { retry_after: Duration },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed { .. })
    }
}

/// Fixed-window request counter keyed by client IP
pub struct RateLimiter {
    windows: DashMap<IpAddr, Window>,
    max_requests: u32,
    window: Duration,
    checks: AtomicU64,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            max_requests,
            window,
            checks: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        info!(
            max_requests = config.max_requests,
            window_secs = config.window_seconds,
            "Per-IP rate limiter configured"
        );
        Self::new(config.max_requests, Duration::from_secs(config.window_seconds))
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Count a request from `ip` and decide whether it may proceed
    pub fn check(&self, ip: IpAddr) -> Decision {
        self.check_at(ip, Instant::now())
    }

    /// [`check`](Self::check) against an explicit clock reading
    pub fn check_at(&self, ip: IpAddr, now: Instant) -> Decision {
        let decision = {
            let mut entry = self.windows.entry(ip).or_insert(Window {
                started: now,
                count: 0,
            });
            let window = entry.value_mut();

            if now.saturating_duration_since(window.started) >= self.window {
                window.started = now;
                window.count = 0;
            }

            if window.count < self.max_requests {
                window.count += 1;
                Decision::Allowed {
                    remaining: self.max_requests - window.count,
                }
            } else {
                let elapsed = now.saturating_duration_since(window.started);
                Decision::Limited {
                    retry_after: self.window.saturating_sub(elapsed),
                }
            }
        };

        // The entry guard is released above; retain() takes every shard lock
        if self.checks.fetch_add(1, Ordering::Relaxed) % SWEEP_EVERY == SWEEP_EVERY - 1 {
            self.evict_expired(now);
        }

        decision
    }

    /// Drop windows that have fully elapsed. Returns the number removed.
    pub fn evict_expired(&self, now: Instant) -> usize {
        let before = self.windows.len();
        self.windows
            .retain(|_, window| now.saturating_duration_since(window.started) < self.window);
        let removed = before.saturating_sub(self.windows.len());
        if removed > 0 {
            debug!(
                removed,
                remaining = self.windows.len(),
                "Evicted expired rate limit windows"
            );
        }
        removed
    }

    /// Number of IPs currently tracked
    pub fn tracked_ips(&self) -> usize {
        self.windows.len()
    }
}
