// Copyright 2025 Huddle (https://github.com/huddle-sports/huddle)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Minimum-interval gate for outbound Sleeper requests.
//!
//! Every upstream call goes through one `RateLimiter` instance owned by the
//! client, so the spacing invariant holds across all concurrently dispatched
//! tool calls. The check-then-stamp sequence must not interleave with other
//! callers; the mutex is held across the sleep so a suspended caller cannot
//! be overtaken between its check and its stamp.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

pub struct RateLimiter {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until at least `min_interval` has elapsed since the previous
    /// stamp, then stamp the current instant. Returns immediately when the
    /// interval has already passed. Waiters are served in lock-acquisition
    /// order.
    pub async fn await_turn(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let ready_at = previous + self.min_interval;
            if ready_at > Instant::now() {
                sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn spaces_sequential_calls() {
        let limiter = RateLimiter::new(Duration::from_millis(120));
        let mut stamps = Vec::new();
        for _ in 0..4 {
            limiter.await_turn().await;
            stamps.push(Instant::now());
        }
        for pair in stamps.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(120));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn spaces_concurrent_callers() {
        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(120)));
        let mut handles = Vec::new();
        for _ in 0..5 {
            let limiter = limiter.clone();
            handles.push(tokio::spawn(async move {
                limiter.await_turn().await;
                Instant::now()
            }));
        }
        let mut stamps = Vec::new();
        for handle in handles {
            stamps.push(handle.await.unwrap());
        }
        stamps.sort();
        for pair in stamps.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(120));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_interval_does_not_block() {
        let limiter = RateLimiter::new(Duration::from_millis(120));
        limiter.await_turn().await;
        tokio::time::sleep(Duration::from_millis(500)).await;

        let before = Instant::now();
        limiter.await_turn().await;
        assert_eq!(Instant::now(), before);
    }
}
