//! FIFO rate limiter for outbound job-analyzer calls.
//!
//! A `tokio::sync::Mutex` hands out its lock in arrival order, so holding it while
//! waiting out the interval queues callers FIFO. Each caller's own future resolves
//! or fails independently; a caller that gives up simply leaves the queue.

use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_start: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_start: Mutex::new(None),
        }
    }

    /// Waits for this caller's turn: at least `min_interval` after the previous start.
    pub async fn acquire(&self) {
        let mut last_start = self.last_start.lock().await;
        if let Some(prev) = *last_start {
            let ready_at = prev + self.min_interval;
            if Instant::now() < ready_at {
                debug!(
                    "Rate limiter: waiting {}ms",
                    (ready_at - Instant::now()).as_millis()
                );
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last_start = Some(Instant::now());
    }

    /// Runs `task` once a slot is free. The slot is released as soon as the task
    /// starts; calls may overlap but never start closer than `min_interval` apart.
    pub async fn run<F, T>(&self, task: F) -> T
    where
        F: Future<Output = T>,
    {
        self.acquire().await;
        task.await
    }
}
