//! Background pruning of expired sessions.
//!
//! # Invariants
//! - One dedicated thread per pruner; ticks never overlap.
//! - `stop` (or drop) wakes the thread immediately and joins it.

use super::SessionStore;
use log::{debug, info, warn};
use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Handle to the periodic prune thread.
pub struct SessionPruner {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl SessionPruner {
    /// Spawns a thread that calls `store.prune()` every `interval`.
    ///
    /// # Errors
    /// - Returns the OS error when the thread cannot be spawned.
    pub fn start(store: Arc<SessionStore>, interval: Duration) -> io::Result<Self> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("session-pruner".to_string())
            .spawn(move || loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        let removed = store.prune();
                        debug!(
                            "event=session_prune module=session status=ok removed={} remaining={}",
                            removed,
                            store.len()
                        );
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })?;

        info!(
            "event=session_pruner_start module=session status=ok interval_secs={}",
            interval.as_secs()
        );
        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Stops the prune thread and waits for it to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            // Send fails only when the thread is already gone.
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("event=session_pruner_stop module=session status=error reason=thread_panicked");
                return;
            }
            info!("event=session_pruner_stop module=session status=ok");
        }
    }
}

impl Drop for SessionPruner {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::SessionPruner;
    use crate::session::{Clock, SessionStore};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    struct FixedClock(i64);

    impl Clock for FixedClock {
        fn now_ms(&self) -> i64 {
            self.0
        }
    }

    #[test]
    fn pruner_removes_expired_entries_in_background() {
        let store = Arc::new(SessionStore::with_clock(Arc::new(FixedClock(1_000))));
        store.issue("old", "a@x.com", 500).expect("issue");
        store.issue("live", "b@x.com", 5_000).expect("issue");

        let pruner =
            SessionPruner::start(Arc::clone(&store), Duration::from_millis(10)).expect("start");

        let deadline = Instant::now() + Duration::from_secs(5);
        while store.len() > 1 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        pruner.stop();

        assert_eq!(store.len(), 1);
        assert_eq!(store.validate("live").as_deref(), Some("b@x.com"));
    }

    #[test]
    fn stop_returns_promptly_with_long_interval() {
        let store = Arc::new(SessionStore::new());
        let pruner =
            SessionPruner::start(store, Duration::from_secs(3_600)).expect("start");

        let started = Instant::now();
        pruner.stop();
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
