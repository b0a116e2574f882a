//! Request pacing with adaptive backoff.
//!
//! Each API client (Reddit, Spotify) owns one limiter.  A 429 doubles the
//! interval; a run of successes halves it again, never below the base.

use std::thread;
use std::time::{Duration, Instant};

use log::debug;

pub struct RateLimiter {
    name: String,
    last_request: Option<Instant>,
    current_interval: Duration,
    base_interval: Duration,
    max_interval: Duration,
    success_count: u32,
    successes_to_reduce: u32,
}

impl RateLimiter {
    /// * `name` — label for log messages ("Reddit", "Spotify")
    /// * `base_interval` — minimum time between requests
    /// * `max_interval` — upper bound after repeated throttling
    /// * `successes_to_reduce` — consecutive successes before halving the
    ///   interval (0 disables the reduction)
    pub fn new(name: &str, base_interval: Duration, max_interval: Duration, successes_to_reduce: u32) -> Self {
        RateLimiter {
            name: name.to_string(),
            last_request: None,
            current_interval: base_interval,
            base_interval,
            max_interval,
            success_count: 0,
            successes_to_reduce,
        }
    }

    /// Max interval = 32× base, reduce after 10 successes.
    pub fn from_millis(name: &str, millis: u64) -> Self {
        let base = Duration::from_millis(millis);
        Self::new(name, base, base * 32, 10)
    }

    /// Sleep until the interval since the previous request has passed.
    /// Call *before* each request.
    pub fn wait_if_needed(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.current_interval {
                let wait_time = self.current_interval - elapsed;
                debug!("[{}] Rate limiting: waiting {:.2}s", self.name, wait_time.as_secs_f64());
                thread::sleep(wait_time);
            }
        }
        self.last_request = Some(Instant::now());
    }

    pub fn report_success(&mut self) {
        if self.successes_to_reduce == 0 {
            return;
        }

        self.success_count += 1;

        if self.success_count >= self.successes_to_reduce && self.current_interval > self.base_interval {
            self.current_interval = (self.current_interval / 2).max(self.base_interval);
            debug!("[{}] Rate limit reduced to {:.2}s after {} successes",
                   self.name, self.current_interval.as_secs_f64(), self.success_count);
            self.success_count = 0;
        }
    }

    /// Throttled by the server: double the interval (up to max).
    pub fn report_throttled(&mut self) {
        self.current_interval = (self.current_interval * 2).min(self.max_interval);
        debug!("[{}] Rate limit increased to {:.2}s after throttling",
               self.name, self.current_interval.as_secs_f64());
        self.success_count = 0;
    }
}
