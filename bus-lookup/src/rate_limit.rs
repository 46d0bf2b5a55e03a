//! Fixed-window request budget shared by every upstream call.
//!
//! The limiter is advisory: a denied permit tells the caller not to go to
//! the network, but nothing enforces it.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

/// Default requests allowed per window.
pub const DEFAULT_LIMIT: u32 = 5;

/// Default window length.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct RateWindow {
    count: u32,
    started: Instant,
}

/// Counts permits issued in the current window.
///
/// Cloning shares the window, so one limiter can gate several sources.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    state: Arc<Mutex<RateWindow>>,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            state: Arc::new(Mutex::new(RateWindow {
                count: 0,
                started: Instant::now(),
            })),
        }
    }

    /// Ask for a permit to issue one upstream request.
    ///
    /// Once more than `window` has passed since the window started, the
    /// window restarts with this request as its first.
    pub fn try_acquire(&self) -> bool {
        let now = Instant::now();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if now.duration_since(state.started) > self.window {
            state.count = 1;
            state.started = now;
            return true;
        }

        if state.count >= self.limit {
            debug!(limit = self.limit, "Rate limit reached, permit denied");
            return false;
        }

        state.count += 1;
        true
    }

    /// Requests counted in the current window.
    ///
    /// Reports zero once the window has lapsed, even before the next permit
    /// restarts it.
    pub fn requests_this_window(&self) -> u32 {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if Instant::now().duration_since(state.started) > self.window {
            0
        } else {
            state.count
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, DEFAULT_WINDOW)
    }
}
