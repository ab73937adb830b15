//! Cancellable polling subscription.
//!
//! A subscription owns one background task that fetches the observation
//! set immediately and then on a fixed interval. Failed fetches are
//! logged and skipped; subscribers keep the last good set. The task ends
//! on `stop()`, and is aborted if the subscription is dropped, so a view
//! that goes away never leaves a timer behind.

use crate::{
    client::PalmClient,
    error::PalmResult,
    observation::Observation,
    store::ObservationStore,
    types::Timestamp,
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Anything that can hand back the current observation set.
#[async_trait]
pub trait ObservationSource: Send + Sync + 'static {
    async fn fetch(&self) -> PalmResult<Vec<Observation>>;
}

#[async_trait]
impl ObservationSource for PalmClient {
    async fn fetch(&self) -> PalmResult<Vec<Observation>> {
        self.list_observations().await
    }
}

/// Reads straight from a store, for views running in the server process.
pub struct StoreSource<S>(pub S);

#[async_trait]
impl<S: ObservationStore + 'static> ObservationSource for StoreSource<S> {
    async fn fetch(&self) -> PalmResult<Vec<Observation>> {
        self.0.list_all()
    }
}

/// The most recent successful fetch.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub observations: Arc<Vec<Observation>>,
    /// `None` until the first successful fetch.
    pub fetched_at:   Option<Timestamp>,
    /// Successful fetches so far.
    pub generation:   u64,
}

pub struct Subscription {
    latest:  watch::Receiver<Snapshot>,
    stop_tx: Option<oneshot::Sender<()>>,
    task:    Option<JoinHandle<()>>,
}

impl Subscription {
    /// Start polling `source` every `every` (at least 1 ms). Must be
    /// called inside a tokio runtime.
    pub fn start<S: ObservationSource>(source: S, every: Duration) -> Self {
        let every = every.max(MIN_INTERVAL);
        let (data_tx, data_rx) = watch::channel(Snapshot::default());
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut generation = 0u64;

            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {}
                }
                // A stalled fetch must not hold up stop().
                let fetched = tokio::select! {
                    _ = &mut stop_rx => break,
                    fetched = source.fetch() => fetched,
                };
                match fetched {
                    Ok(observations) => {
                        generation += 1;
                        data_tx.send_replace(Snapshot {
                            observations: Arc::new(observations),
                            fetched_at:   Some(chrono::Utc::now()),
                            generation,
                        });
                    }
                    Err(e) => log::warn!("Error fetching observations: {e}"),
                }
            }
            log::debug!("Subscription stopped after {generation} fetches");
        });

        log::debug!("Subscription started, interval {every:?}");
        Self {
            latest:  data_rx,
            stop_tx: Some(stop_tx),
            task:    Some(task),
        }
    }

    /// Last-known observation set. Empty until the first fetch succeeds.
    pub fn latest(&self) -> Snapshot {
        self.latest.borrow().clone()
    }

    /// Wait for the next successful fetch. Returns false once the
    /// subscription has stopped.
    pub async fn changed(&mut self) -> bool {
        self.latest.changed().await.is_ok()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Cancel the timer and wait for the task to finish.
    pub async fn stop(mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
