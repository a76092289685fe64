use std::{future::Future, time::Duration};

use governor::{
    Quota, RateLimiter as Governor,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use tokio::{
    sync::{Mutex, Semaphore},
    time::{Instant, sleep_until},
};
use tracing::debug;

use crate::config::LimiterConfig;

/// Admission gate in front of every Riot API request.
///
/// A task is admitted once it holds one of `max_concurrent` slots and has
/// taken a permit from the reservoir. The reservoir is reset to
/// `refresh_amount` permits every `refresh_interval`, and a permit is spent
/// whatever the outcome of the task. Waiting tasks are admitted in arrival
/// order.
#[derive(Debug)]
pub struct RateLimiter {
    queue: Mutex<Reservoir>,
    slots: Semaphore,
    max_concurrent: usize,
    smoothing: Option<Governor<NotKeyed, InMemoryState, DefaultClock>>,
}

#[derive(Debug)]
struct Reservoir {
    remaining: u32,
    refresh_amount: u32,
    interval: Duration,
    next_refresh: Instant,
}

impl Reservoir {
    fn refill(&mut self, now: Instant) {
        if now < self.next_refresh {
            return;
        }

        self.remaining = self.refresh_amount;
        while self.next_refresh <= now {
            self.next_refresh += self.interval;
        }
    }
}

impl RateLimiter {
    pub fn new(config: &LimiterConfig) -> Self {
        let smoothing = Governor::direct(Quota::per_second(config.per_second));

        Self::build(
            config.reservoir,
            config.refresh_amount,
            config.refresh_interval,
            config.max_concurrent,
            Some(smoothing),
        )
    }

    /// Limiter without the per-second smoothing layer.
    pub fn with_reservoir(
        reservoir: u32,
        refresh_amount: u32,
        refresh_interval: Duration,
        max_concurrent: usize,
    ) -> Self {
        Self::build(
            reservoir,
            refresh_amount,
            refresh_interval,
            max_concurrent,
            None,
        )
    }

    fn build(
        reservoir: u32,
        refresh_amount: u32,
        refresh_interval: Duration,
        max_concurrent: usize,
        smoothing: Option<Governor<NotKeyed, InMemoryState, DefaultClock>>,
    ) -> Self {
        let max_concurrent = max_concurrent.max(1);
        let interval = refresh_interval.max(Duration::from_millis(1));

        Self {
            queue: Mutex::new(Reservoir {
                remaining: reservoir,
                refresh_amount,
                interval,
                next_refresh: Instant::now() + interval,
            }),
            slots: Semaphore::new(max_concurrent),
            max_concurrent,
            smoothing,
        }
    }

    /// Runs `task` once capacity allows it.
    pub async fn admit<F, T>(&self, task: F) -> T
    where
        F: Future<Output = T>,
    {
        let slot = {
            // Holding the queue lock while waiting keeps admission FIFO.
            let mut reservoir = self.queue.lock().await;

            // The semaphore is never closed.
            let slot = self.slots.acquire().await.ok();

            loop {
                reservoir.refill(Instant::now());
                if reservoir.remaining > 0 {
                    reservoir.remaining -= 1;
                    break;
                }

                debug!(
                    wait_ms = reservoir
                        .next_refresh
                        .saturating_duration_since(Instant::now())
                        .as_millis() as u64,
                    "⏳ Reservoir empty, waiting for refresh"
                );
                sleep_until(reservoir.next_refresh).await;
            }

            if let Some(smoothing) = &self.smoothing {
                smoothing.until_ready().await;
            }

            slot
        };

        let output = task.await;
        drop(slot);
        output
    }

    pub fn in_flight(&self) -> usize {
        self.max_concurrent - self.slots.available_permits()
    }

    pub async fn remaining_permits(&self) -> u32 {
        let mut reservoir = self.queue.lock().await;
        reservoir.refill(Instant::now());
        reservoir.remaining
    }

    pub async fn stats(&self) -> LimiterStats {
        LimiterStats {
            remaining_permits: self.remaining_permits().await,
            in_flight: self.in_flight(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimiterStats {
    pub remaining_permits: u32,
    pub in_flight: usize,
}
