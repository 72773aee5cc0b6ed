//! Write-Behind Persistence
//!
//! Mutations mark their account dirty; a background task persists each
//! dirty account once it has been quiet for the debounce window, so a
//! burst of completions costs one storage round-trip instead of five.
//! A failed flush is logged and dropped; the next mutation retries.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::application::SessionManager;

const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(1);
const TICK: Duration = Duration::from_millis(250);

#[derive(Clone)]
pub struct SyncWriter {
    tx: mpsc::UnboundedSender<Uuid>,
}

impl SyncWriter {
    pub fn spawn(sessions: Arc<SessionManager>) -> Self {
        Self::spawn_with_debounce(sessions, DEFAULT_DEBOUNCE)
    }

    pub fn spawn_with_debounce(sessions: Arc<SessionManager>, debounce: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(sessions, rx, debounce));
        Self { tx }
    }

    /// Schedule a debounced flush for this account. Marking an already
    /// dirty account restarts its quiet window.
    pub fn mark_dirty(&self, account_id: Uuid) {
        // Send only fails when the flusher task is gone, i.e. shutdown.
        if self.tx.send(account_id).is_err() {
            warn!("sync writer is down, dropping dirty mark for {}", account_id);
        }
    }
}

async fn run(
    sessions: Arc<SessionManager>,
    mut rx: mpsc::UnboundedReceiver<Uuid>,
    debounce: Duration,
) {
    let mut dirty: HashMap<Uuid, Instant> = HashMap::new();
    let mut tick = tokio::time::interval(TICK);
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            received = rx.recv() => {
                match received {
                    Some(account_id) => {
                        dirty.insert(account_id, Instant::now());
                    }
                    // All senders dropped: flush what is left and stop.
                    None => {
                        for account_id in dirty.keys() {
                            flush(&sessions, *account_id).await;
                        }
                        return;
                    }
                }
            }
            _ = tick.tick() => {
                let now = Instant::now();
                let due: Vec<Uuid> = dirty
                    .iter()
                    .filter(|(_, marked_at)| now.duration_since(**marked_at) >= debounce)
                    .map(|(id, _)| *id)
                    .collect();
                for account_id in due {
                    dirty.remove(&account_id);
                    flush(&sessions, account_id).await;
                }
            }
        }
    }
}

async fn flush(sessions: &SessionManager, account_id: Uuid) {
    match sessions.persist(account_id).await {
        Ok(()) => debug!("flushed documents for {}", account_id),
        Err(e) => warn!("document flush failed for {}: {}", account_id, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{
        InMemoryStore, StoreDailyRepo, StoreHistoryRepo, StorePlayerRepo,
    };
    use std::sync::atomic::Ordering;

    fn store_and_sessions() -> (Arc<InMemoryStore>, Arc<SessionManager>) {
        let store = Arc::new(InMemoryStore::default());
        let sessions = Arc::new(SessionManager::new(
            Arc::new(StorePlayerRepo(Arc::clone(&store))),
            Arc::new(StoreDailyRepo(Arc::clone(&store))),
            Arc::new(StoreHistoryRepo(Arc::clone(&store))),
        ));
        (store, sessions)
    }

    async fn settle() {
        // Debounce (50ms) plus one flusher tick.
        tokio::time::sleep(Duration::from_millis(400)).await;
    }

    #[tokio::test]
    async fn test_rapid_marks_coalesce_into_one_write() {
        let (store, sessions) = store_and_sessions();
        let sync = SyncWriter::spawn_with_debounce(sessions, Duration::from_millis(50));

        let account = Uuid::new_v4();
        for _ in 0..5 {
            sync.mark_dirty(account);
        }
        settle().await;

        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_distinct_accounts_flush_separately() {
        let (store, sessions) = store_and_sessions();
        let sync = SyncWriter::spawn_with_debounce(sessions, Duration::from_millis(50));

        sync.mark_dirty(Uuid::new_v4());
        sync.mark_dirty(Uuid::new_v4());
        settle().await;

        assert_eq!(store.saves.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_flush_dropped_then_next_mark_retries() {
        let (store, sessions) = store_and_sessions();
        let sync = SyncWriter::spawn_with_debounce(sessions, Duration::from_millis(50));

        let account = Uuid::new_v4();
        store.fail_saves.store(true, Ordering::SeqCst);
        sync.mark_dirty(account);
        settle().await;
        assert_eq!(store.saves.load(Ordering::SeqCst), 0);

        // No retry without a new mark.
        settle().await;
        assert_eq!(store.saves.load(Ordering::SeqCst), 0);

        store.fail_saves.store(false, Ordering::SeqCst);
        sync.mark_dirty(account);
        settle().await;
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
    }
}
