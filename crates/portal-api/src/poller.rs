//! Keyed background polling
//!
//! One task per resource key. Starting a poll on a key that is already polled
//! aborts the old task, and every result is stamped with the generation it was
//! started under so a late write from a replaced task is dropped.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use portal_core::PortalError;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// One poll result
#[derive(Debug, Clone)]
pub struct PollStep {
    pub value: serde_json::Value,
    /// Stop polling after this value
    pub done: bool,
}

impl PollStep {
    pub fn pending(value: serde_json::Value) -> Self {
        Self { value, done: false }
    }

    pub fn done(value: serde_json::Value) -> Self {
        Self { value, done: true }
    }
}

struct Watch {
    id: String,
    kind: String,
    generation: u64,
    started_at: Instant,
    latest: Option<serde_json::Value>,
    last_error: Option<String>,
    polls: u64,
    finished: bool,
    handle: JoinHandle<()>,
}

/// Public view of a watched key
#[derive(Debug, Clone, Serialize)]
pub struct WatchSnapshot {
    pub id: String,
    pub key: String,
    /// "balance" | "deposits" | "withdrawal"
    pub kind: String,
    pub generation: u64,
    pub latest: Option<serde_json::Value>,
    pub last_error: Option<String>,
    pub polls: u64,
    pub finished: bool,
    pub elapsed_secs: u64,
}

/// Registry of keyed polling tasks
#[derive(Clone)]
pub struct Poller {
    watches: Arc<Mutex<HashMap<String, Watch>>>,
    next_generation: Arc<AtomicU64>,
    timeout: Duration,
}

impl Poller {
    pub fn new(timeout: Duration) -> Self {
        Self {
            watches: Arc::new(Mutex::new(HashMap::new())),
            next_generation: Arc::new(AtomicU64::new(1)),
            timeout,
        }
    }

    /// Start polling `key` every `interval`, replacing any poll already on it.
    ///
    /// Returns the new watch id.
    pub async fn start<F, Fut>(
        &self,
        key: impl Into<String>,
        kind: &str,
        interval: Duration,
        fetch: F,
    ) -> String
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<PollStep, PortalError>> + Send + 'static,
    {
        let key = key.into();
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst);
        let id = uuid::Uuid::new_v4().to_string();

        // The lock is held across spawn so the task cannot record before its entry exists
        let mut watches = self.watches.lock().await;
        if let Some(old) = watches.remove(&key) {
            old.handle.abort();
            tracing::debug!(key = %key, old = old.generation, new = generation, "Replaced poll");
        }

        let handle = tokio::spawn(poll_loop(
            self.clone(),
            key.clone(),
            generation,
            interval,
            fetch,
        ));

        watches.insert(
            key.clone(),
            Watch {
                id: id.clone(),
                kind: kind.to_string(),
                generation,
                started_at: Instant::now(),
                latest: None,
                last_error: None,
                polls: 0,
                finished: false,
                handle,
            },
        );

        tracing::info!(key = %key, generation, "Started {} poll", kind);
        id
    }

    /// Record a result for `key`; `false` when `generation` has been superseded
    pub(crate) async fn record(
        &self,
        key: &str,
        generation: u64,
        result: Result<PollStep, PortalError>,
    ) -> bool {
        let mut watches = self.watches.lock().await;
        let watch = match watches.get_mut(key) {
            Some(w) if w.generation == generation => w,
            _ => {
                tracing::debug!(key, generation, "Discarding stale poll result");
                return false;
            }
        };

        watch.polls += 1;
        match result {
            Ok(step) => {
                watch.latest = Some(step.value);
                watch.last_error = None;
                if step.done {
                    watch.finished = true;
                }
            }
            Err(e) => {
                tracing::warn!(key, "Poll failed: {}", e);
                watch.last_error = Some(e.to_string());
            }
        }
        true
    }

    async fn is_finished(&self, key: &str, generation: u64) -> bool {
        let watches = self.watches.lock().await;
        watches
            .get(key)
            .map(|w| w.generation != generation || w.finished)
            .unwrap_or(true)
    }

    /// Drop `key` if it still belongs to `generation`
    async fn expire(&self, key: &str, generation: u64) {
        let mut watches = self.watches.lock().await;
        if watches.get(key).map(|w| w.generation) == Some(generation) {
            watches.remove(key);
            tracing::info!(key, "Poll timed out");
        }
    }

    /// Cancel the poll on `key`; `false` when nothing was polling it
    pub async fn cancel(&self, key: &str) -> bool {
        let mut watches = self.watches.lock().await;
        match watches.remove(key) {
            Some(watch) => {
                watch.handle.abort();
                tracing::info!(key, "Cancelled poll");
                true
            }
            None => false,
        }
    }

    pub async fn get(&self, key: &str) -> Option<WatchSnapshot> {
        let watches = self.watches.lock().await;
        watches.get(key).map(|w| snapshot(key, w))
    }

    /// Every watched key, sorted by key
    pub async fn snapshot(&self) -> Vec<WatchSnapshot> {
        let watches = self.watches.lock().await;
        let mut items: Vec<WatchSnapshot> =
            watches.iter().map(|(key, w)| snapshot(key, w)).collect();
        items.sort_by(|a, b| a.key.cmp(&b.key));
        items
    }

    /// Abort every task
    pub async fn shutdown(&self) {
        let mut watches = self.watches.lock().await;
        for (_, watch) in watches.drain() {
            watch.handle.abort();
        }
    }
}

async fn poll_loop<F, Fut>(poller: Poller, key: String, generation: u64, interval: Duration, fetch: F)
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<PollStep, PortalError>> + Send + 'static,
{
    let started = Instant::now();
    loop {
        if started.elapsed() > poller.timeout {
            poller.expire(&key, generation).await;
            break;
        }

        let result = fetch().await;
        if !poller.record(&key, generation, result).await {
            break;
        }
        if poller.is_finished(&key, generation).await {
            tracing::debug!(key = %key, "Poll finished");
            // Keep the final value readable until the watch times out
            tokio::time::sleep(poller.timeout.saturating_sub(started.elapsed())).await;
            poller.expire(&key, generation).await;
            break;
        }

        tokio::time::sleep(interval).await;
    }
}

fn snapshot(key: &str, watch: &Watch) -> WatchSnapshot {
    WatchSnapshot {
        id: watch.id.clone(),
        key: key.to_string(),
        kind: watch.kind.clone(),
        generation: watch.generation,
        latest: watch.latest.clone(),
        last_error: watch.last_error.clone(),
        polls: watch.polls,
        finished: watch.finished,
        elapsed_secs: watch.started_at.elapsed().as_secs(),
    }
}

/// `balance:<account>:<token>`
pub fn balance_key(account_id: &str, token_id: &str) -> String {
    format!("balance:{}:{}", account_id, token_id)
}

/// `deposits:<account>:<chain>`
pub fn deposits_key(account_id: &str, chain: &str) -> String {
    format!("deposits:{}:{}", account_id, chain)
}

/// `withdrawal:<hash>`
pub fn withdrawal_key(hash: &str) -> String {
    format!("withdrawal:{}", hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    const TICK: Duration = Duration::from_millis(10);

    fn counting_fetch(
        counter: Arc<AtomicUsize>,
    ) -> impl Fn() -> std::future::Ready<Result<PollStep, PortalError>> + Send + Sync + 'static {
        move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            std::future::ready(Ok(PollStep::pending(serde_json::json!(n))))
        }
    }

    #[tokio::test]
    async fn test_poll_records_latest() {
        let poller = Poller::new(Duration::from_secs(60));
        let counter = Arc::new(AtomicUsize::new(0));

        poller
            .start("balance:a:b", "balance", TICK, counting_fetch(counter.clone()))
            .await;
        tokio::time::sleep(TICK * 5).await;

        let snap = poller.get("balance:a:b").await.unwrap();
        assert!(snap.polls >= 2);
        assert!(snap.latest.is_some());
        assert!(!snap.finished);
        poller.shutdown().await;
    }

    #[tokio::test]
    async fn test_replacing_key_cancels_old_task() {
        let poller = Poller::new(Duration::from_secs(60));
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let id1 = poller
            .start("deposits:a:eth:1", "deposits", TICK, counting_fetch(first.clone()))
            .await;
        tokio::time::sleep(TICK * 3).await;
        let id2 = poller
            .start("deposits:a:eth:1", "deposits", TICK, counting_fetch(second.clone()))
            .await;
        assert_ne!(id1, id2);

        let frozen = first.load(Ordering::SeqCst);
        tokio::time::sleep(TICK * 5).await;
        assert_eq!(first.load(Ordering::SeqCst), frozen);
        assert!(second.load(Ordering::SeqCst) > 0);

        let snap = poller.get("deposits:a:eth:1").await.unwrap();
        assert_eq!(snap.id, id2);
        assert_eq!(poller.snapshot().await.len(), 1);
        poller.shutdown().await;
    }

    #[tokio::test]
    async fn test_stale_generation_discarded() {
        let poller = Poller::new(Duration::from_secs(60));
        poller
            .start("withdrawal:h", "withdrawal", Duration::from_secs(60), || async {
                Ok(PollStep::pending(serde_json::json!("first")))
            })
            .await;
        let old_generation = poller.get("withdrawal:h").await.unwrap().generation;

        poller
            .start("withdrawal:h", "withdrawal", Duration::from_secs(60), || async {
                Ok(PollStep::pending(serde_json::json!("second")))
            })
            .await;
        tokio::time::sleep(TICK * 3).await;

        let accepted = poller
            .record(
                "withdrawal:h",
                old_generation,
                Ok(PollStep::pending(serde_json::json!("late"))),
            )
            .await;
        assert!(!accepted);

        let snap = poller.get("withdrawal:h").await.unwrap();
        assert_eq!(snap.latest, Some(serde_json::json!("second")));
        poller.shutdown().await;
    }

    #[tokio::test]
    async fn test_done_step_stops_polling() {
        let poller = Poller::new(Duration::from_secs(60));
        let counter = Arc::new(AtomicUsize::new(0));
        let c = counter.clone();

        poller
            .start("withdrawal:x", "withdrawal", TICK, move || {
                let n = c.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n >= 2 {
                        Ok(PollStep::done(serde_json::json!("COMPLETED")))
                    } else {
                        Ok(PollStep::pending(serde_json::json!(null)))
                    }
                }
            })
            .await;
        tokio::time::sleep(TICK * 10).await;

        assert_eq!(counter.load(Ordering::SeqCst), 2);
        let snap = poller.get("withdrawal:x").await.unwrap();
        assert!(snap.finished);
        assert_eq!(snap.latest, Some(serde_json::json!("COMPLETED")));
    }

    #[tokio::test]
    async fn test_finished_watch_removed_after_timeout() {
        let poller = Poller::new(Duration::from_millis(30));
        poller
            .start("withdrawal:h", "withdrawal", TICK, || async {
                Ok(PollStep::done(serde_json::json!("COMPLETED")))
            })
            .await;

        tokio::time::sleep(TICK).await;
        assert!(poller.get("withdrawal:h").await.unwrap().finished);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(poller.get("withdrawal:h").await.is_none());
        assert!(poller.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_errors_keep_polling() {
        let poller = Poller::new(Duration::from_secs(60));
        poller
            .start("balance:a:t", "balance", TICK, || async {
                Err(PortalError::transport("connection refused"))
            })
            .await;
        tokio::time::sleep(TICK * 5).await;

        let snap = poller.get("balance:a:t").await.unwrap();
        assert!(snap.polls >= 2);
        assert!(snap.last_error.unwrap().contains("connection refused"));
        assert!(!snap.finished);
        poller.shutdown().await;
    }

    #[tokio::test]
    async fn test_cancel() {
        let poller = Poller::new(Duration::from_secs(60));
        let counter = Arc::new(AtomicUsize::new(0));
        poller
            .start("balance:a:b", "balance", TICK, counting_fetch(counter.clone()))
            .await;

        assert!(poller.cancel("balance:a:b").await);
        assert!(!poller.cancel("balance:a:b").await);
        assert!(poller.get("balance:a:b").await.is_none());

        let frozen = counter.load(Ordering::SeqCst);
        tokio::time::sleep(TICK * 3).await;
        assert_eq!(counter.load(Ordering::SeqCst), frozen);
    }

    #[tokio::test]
    async fn test_timeout_removes_watch() {
        let poller = Poller::new(Duration::from_millis(30));
        poller
            .start("deposits:a:sol:mainnet", "deposits", TICK, || async {
                Ok(PollStep::pending(serde_json::json!([])))
            })
            .await;
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(poller.get("deposits:a:sol:mainnet").await.is_none());
    }

    #[test]
    fn test_keys() {
        assert_eq!(balance_key("alice.near", "wrap.near"), "balance:alice.near:wrap.near");
        assert_eq!(deposits_key("alice.near", "eth:1"), "deposits:alice.near:eth:1");
        assert_eq!(withdrawal_key("abc"), "withdrawal:abc");
    }
}
