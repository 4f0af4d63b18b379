//! Background reclamation of expired bearer tokens
//!
//! Lazy eviction in `TokenStore::validate` only catches tokens that are presented again.
//! The reclaimer sweeps the whole store on a fixed interval so abandoned tokens do not
//! accumulate for the life of the process.

use ferry_core::TokenStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct TokenReclaimer {
    store: Arc<TokenStore>,
    period: Duration,
    cancel_token: CancellationToken,
}

impl TokenReclaimer {
    pub fn new(store: Arc<TokenStore>, period: Duration) -> Self {
        Self {
            store,
            period,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Token that stops the loop started by [`TokenReclaimer::start`] when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Run a single sweep. Returns the number of tokens removed.
    pub async fn sweep(&self) -> usize {
        let removed = self.store.purge_expired().await;
        if removed > 0 {
            let remaining = self.store.len().await;
            tracing::info!(removed, remaining, "Reclaimed expired tokens");
        } else {
            tracing::debug!("Token sweep found nothing to reclaim");
        }
        removed
    }

    /// Start the background sweep loop.
    /// The first sweep runs one full period after start.
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(self.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval() fires immediately; skip that tick
            ticker.tick().await;

            tracing::info!(
                period_secs = self.period.as_secs(),
                "Token reclaimer started"
            );

            loop {
                tokio::select! {
                    _ = self.cancel_token.cancelled() => {
                        tracing::info!("Token reclaimer stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        self.sweep().await;
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeDelta, Utc};
    use ferry_core::Clock;
    use std::sync::Mutex;

    struct ManualClock(Mutex<DateTime<Utc>>);

    impl ManualClock {
        fn advance(&self, by: Duration) {
            *self.0.lock().unwrap() += TimeDelta::from_std(by).unwrap();
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    fn store() -> (Arc<TokenStore>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock(Mutex::new(Utc::now())));
        let store = Arc::new(TokenStore::new(Duration::from_secs(60), clock.clone()));
        (store, clock)
    }

    #[tokio::test]
    async fn test_sweep_removes_expired_tokens() {
        let (store, clock) = store();
        store.issue().await.unwrap();
        store.issue().await.unwrap();

        let reclaimer = TokenReclaimer::new(store.clone(), Duration::from_secs(600));
        assert_eq!(reclaimer.sweep().await, 0);

        clock.advance(Duration::from_secs(60));
        assert_eq!(reclaimer.sweep().await, 2);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_sweep_runs_on_spawned_task() {
        let (store, clock) = store();
        store.issue().await.unwrap();
        clock.advance(Duration::from_secs(61));

        let reclaimer = TokenReclaimer::new(store.clone(), Duration::from_secs(600));
        let removed = tokio::spawn(async move { reclaimer.sweep().await })
            .await
            .unwrap();
        assert_eq!(removed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_sweeps_on_interval_and_stops_on_cancel() {
        let (store, clock) = store();
        store.issue().await.unwrap();
        clock.advance(Duration::from_secs(120));

        let reclaimer = TokenReclaimer::new(store.clone(), Duration::from_secs(600));
        let cancel = reclaimer.cancel_token();
        let handle = reclaimer.start();

        // Nothing happens before the first full period
        tokio::time::sleep(Duration::from_secs(599)).await;
        assert_eq!(store.len().await, 1);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(store.is_empty().await);

        cancel.cancel();
        handle.await.unwrap();
    }
}
