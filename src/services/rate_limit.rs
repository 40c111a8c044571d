//! Per-client fixed-window request quota.
//!
//! The store is injected into the request handlers so the in-memory
//! implementation can be swapped for a shared one when several instances
//! serve the same clients. Counts are not persisted across restarts.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use crate::models::RateLimitConfig;

/// Above this many tracked clients, expired windows are swept on insert.
const SWEEP_THRESHOLD: usize = 10_000;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock moved by hand, for deterministic window tests.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<StdMutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(StdMutex::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Outcome of counting one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// Request admitted; `count` is its position in the current window.
    Allowed { count: u32 },
    /// Quota exhausted until the window resets.
    Limited { retry_after: Duration },
}

impl RateDecision {
    pub fn is_limited(&self) -> bool {
        matches!(self, RateDecision::Limited { .. })
    }
}

/// Counts requests per client key.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Record one request from `key` and decide whether it may proceed.
    async fn hit(&self, key: &str) -> RateDecision;
}

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    reset_at: DateTime<Utc>,
}

/// In-memory fixed-window limiter.
///
/// A window starts at a client's first request and is reset lazily by the
/// first request that arrives after it expired. Check and increment happen
/// under one lock.
pub struct FixedWindowLimiter {
    max_requests: u32,
    window: Duration,
    clock: Arc<dyn Clock>,
    windows: Mutex<HashMap<String, Window>>,
}

impl FixedWindowLimiter {
    pub fn new(max_requests: u32, window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            max_requests,
            window,
            clock,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Build a wall-clock limiter from configuration.
    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(
            config.max_requests,
            Duration::seconds(config.window_secs as i64),
            Arc::new(SystemClock),
        )
    }

    /// Number of clients currently tracked.
    pub async fn tracked_clients(&self) -> usize {
        self.windows.lock().await.len()
    }

    fn sweep(windows: &mut HashMap<String, Window>, now: DateTime<Utc>) {
        let before = windows.len();
        windows.retain(|_, w| now <= w.reset_at);
        log::debug!("Swept {} expired rate-limit windows", before - windows.len());
    }
}

#[async_trait]
impl RateLimitStore for FixedWindowLimiter {
    async fn hit(&self, key: &str) -> RateDecision {
        let now = self.clock.now();
        let mut windows = self.windows.lock().await;

        match windows.get_mut(key) {
            Some(window) if now <= window.reset_at => {
                if window.count >= self.max_requests {
                    return RateDecision::Limited {
                        retry_after: window.reset_at - now,
                    };
                }
                window.count += 1;
                RateDecision::Allowed {
                    count: window.count,
                }
            }
            _ => {
                if windows.len() >= SWEEP_THRESHOLD {
                    Self::sweep(&mut windows, now);
                }
                windows.insert(
                    key.to_string(),
                    Window {
                        count: 1,
                        reset_at: now + self.window,
                    },
                );
                RateDecision::Allowed { count: 1 }
            }
        }
    }
}
