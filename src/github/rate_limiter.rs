use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use reqwest::header::HeaderMap;
use tokio::sync::Mutex;
use tokio::time::{sleep, Duration};

const SOFT_WINDOW: Duration = Duration::from_secs(60);

pub struct RateLimiter {
    state: Arc<Mutex<RateLimitState>>,
    per_minute: u32,
}

struct RateLimitState {
    remaining: u32,
    reset_at: Option<Instant>,
    requests_this_minute: u32,
    minute_start: Instant,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::with_per_minute(30)
    }

    /// Soft cap of `per_minute` requests on top of GitHub's own limits.
    pub fn with_per_minute(per_minute: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(RateLimitState {
                remaining: 5000,
                reset_at: None,
                requests_this_minute: 0,
                minute_start: Instant::now(),
            })),
            per_minute: per_minute.max(1),
        }
    }

    pub async fn wait(&self) {
        let mut state = self.state.lock().await;

        // Out of quota: wait for the reset GitHub announced
        if state.remaining == 0 {
            if let Some(reset_at) = state.reset_at {
                let now = Instant::now();
                if reset_at > now {
                    let wait_duration = reset_at - now;
                    drop(state);
                    tracing::info!("Rate limited, waiting {:?}", wait_duration);
                    sleep(wait_duration).await;
                    state = self.state.lock().await;
                }
            }
        }

        // Re-check after every sleep: other waiters may have used the new window
        loop {
            match state.take_slot(self.per_minute, Instant::now()) {
                None => return,
                Some(wait_time) => {
                    drop(state);
                    tracing::debug!("Soft rate limiting, waiting {:?}", wait_time);
                    sleep(wait_time).await;
                    state = self.state.lock().await;
                }
            }
        }
    }

    pub async fn update_from_headers(&self, headers: &HeaderMap) {
        let Some(remaining) = headers
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
        else {
            return;
        };

        let reset = headers
            .get("x-ratelimit-reset")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let mut state = self.state.lock().await;
        state.remaining = remaining;
        if let Some(reset_timestamp) = reset {
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default();
            if reset_timestamp > now {
                state.reset_at = Some(Instant::now() + Duration::from_secs(reset_timestamp - now));
            }
        }
    }

    pub async fn remaining(&self) -> u32 {
        self.state.lock().await.remaining
    }

    /// Seconds until the announced reset, if one is pending.
    pub async fn seconds_until_reset(&self) -> Option<u64> {
        let state = self.state.lock().await;
        state
            .reset_at
            .map(|r| r.saturating_duration_since(Instant::now()).as_secs())
    }
}

impl RateLimitState {
    /// Count one request against the soft cap, or return how long until the
    /// current window ends.
    fn take_slot(&mut self, per_minute: u32, now: Instant) -> Option<Duration> {
        let elapsed = now.saturating_duration_since(self.minute_start);
        if elapsed >= SOFT_WINDOW {
            self.requests_this_minute = 0;
            self.minute_start = now;
        } else if self.requests_this_minute >= per_minute {
            return Some(SOFT_WINDOW - elapsed);
        }

        self.requests_this_minute += 1;
        None
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
