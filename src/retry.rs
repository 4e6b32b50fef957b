//! Bounded retry-with-delay for polling remote state.
//!
//! The delay schedule is an iterator of durations (a `tokio-retry`
//! strategy) and sleeping goes through [`Sleeper`], so loops can be driven
//! in tests without real time passing.

use crate::Result;
use async_trait::async_trait;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_retry::strategy::FixedInterval;

/// Result of one polling attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt<T> {
    Ready(T),
    Pending,
}

/// How a polling loop ended when no attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    Ready { value: T, attempts: usize },
    Exhausted { attempts: usize },
}

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Records requested delays and returns immediately.
#[derive(Clone, Default)]
pub struct RecordingSleeper {
    slept: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_sleeps(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }

    pub fn total_slept(&self) -> Duration {
        self.slept.lock().unwrap().iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
    }
}

/// Delays between `max_attempts` attempts spaced `interval` apart.
pub fn fixed_schedule(interval: Duration, max_attempts: usize) -> impl Iterator<Item = Duration> {
    FixedInterval::new(interval).take(max_attempts.saturating_sub(1))
}

/// Run `op` until it is ready, fails, or the schedule runs out.
///
/// `op` receives the 1-based attempt number. One attempt is made up front and
/// one more after each delay the schedule yields; nothing sleeps after the
/// final attempt.
pub async fn poll_with_delay<T, S, F, Fut>(
    schedule: S,
    sleeper: &dyn Sleeper,
    mut op: F,
) -> Result<PollOutcome<T>>
where
    S: IntoIterator<Item = Duration>,
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<Attempt<T>>>,
{
    let mut delays = schedule.into_iter();
    let mut attempts = 0;

    loop {
        attempts += 1;
        if let Attempt::Ready(value) = op(attempts).await? {
            return Ok(PollOutcome::Ready { value, attempts });
        }

        match delays.next() {
            Some(delay) => sleeper.sleep(delay).await,
            None => return Ok(PollOutcome::Exhausted { attempts }),
        }
    }
}
