use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, Mutex};

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub delay: Duration,
    pub max_attempts: u32,
    pub backoff_factor: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(120),
            max_attempts: 3,
            backoff_factor: 2,
        }
    }
}

impl RetryPolicy {
    /// Wait before `attempt` (1-based), counted from the previous attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self
            .backoff_factor
            .max(1)
            .saturating_pow(attempt.saturating_sub(1));

        self.delay.saturating_mul(factor)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RematchOutcome {
    Matched { driver_id: i64 },
    NoDriver,
    /// The trip no longer needs a driver (canceled, deleted or matched).
    Skipped,
}

#[derive(Debug, Default)]
struct Pending {
    generation: u64,
    tasks: HashMap<i64, (u64, oneshot::Sender<()>)>,
}

/// Runs deferred matching attempts for trips, at most one task per trip.
#[derive(Debug, Clone, Default)]
pub struct RematchScheduler {
    policy: RetryPolicy,
    pending: Arc<Mutex<Pending>>,
}

impl RematchScheduler {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            pending: Arc::new(Mutex::new(Pending::default())),
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Spawns the retry task for `trip_id`. Returns false if one is already
    /// pending for that trip.
    pub async fn schedule<F, Fut>(&self, trip_id: i64, attempt: F) -> bool
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Result<RematchOutcome, Error>> + Send + 'static,
    {
        let (cancel_tx, cancel_rx) = oneshot::channel();

        let generation = {
            let mut pending = self.pending.lock().await;

            if pending.tasks.contains_key(&trip_id) {
                return false;
            }

            pending.generation += 1;
            let generation = pending.generation;
            pending.tasks.insert(trip_id, (generation, cancel_tx));
            generation
        };

        let policy = self.policy;
        let registry = self.pending.clone();

        tokio::spawn(async move {
            run_attempts(trip_id, policy, attempt, cancel_rx).await;

            let mut pending = registry.lock().await;
            if matches!(pending.tasks.get(&trip_id), Some((g, _)) if *g == generation) {
                pending.tasks.remove(&trip_id);
            }
        });

        tracing::info!(trip_id, delay = ?policy.delay, "scheduled rematch");

        true
    }

    /// Stops a pending task from making further attempts. An attempt that is
    /// already running is allowed to finish.
    pub async fn cancel(&self, trip_id: i64) -> bool {
        let removed = self.pending.lock().await.tasks.remove(&trip_id);

        match removed {
            Some((_, cancel_tx)) => {
                let _ = cancel_tx.send(());
                tracing::info!(trip_id, "canceled rematch");
                true
            }
            None => false,
        }
    }

    pub async fn is_scheduled(&self, trip_id: i64) -> bool {
        self.pending.lock().await.tasks.contains_key(&trip_id)
    }
}

#[tracing::instrument(skip(policy, attempt, cancel_rx))]
async fn run_attempts<F, Fut>(
    trip_id: i64,
    policy: RetryPolicy,
    attempt: F,
    mut cancel_rx: oneshot::Receiver<()>,
) where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<RematchOutcome, Error>>,
{
    for n in 1..=policy.max_attempts {
        tokio::select! {
            _ = &mut cancel_rx => return,
            _ = tokio::time::sleep(policy.delay_for(n)) => {}
        }

        match attempt().await {
            Ok(RematchOutcome::Matched { driver_id }) => {
                tracing::info!(attempt = n, driver_id, "rematch found a driver");
                return;
            }
            Ok(RematchOutcome::Skipped) => {
                tracing::info!(attempt = n, "trip no longer awaits a driver");
                return;
            }
            Ok(RematchOutcome::NoDriver) => {
                tracing::info!(attempt = n, "rematch found no driver");
            }
            Err(err) => {
                tracing::error!(attempt = n, "rematch attempt failed: {}", err);
            }
        }
    }

    tracing::warn!(
        attempts = policy.max_attempts,
        "no driver found for trip, giving up"
    );
}
