//! Cancelable deferred bot moves
//!
//! The session emits `ScheduleBot` effects; this runtime piece owns the
//! actual timer. The move is tied to the session's active flag and the
//! handle aborts on reschedule or teardown, so a stale pick can never
//! mutate a session that has ended.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Schedules at most one pending bot move at a time
#[derive(Debug, Default)]
pub struct BotScheduler {
    handle: Option<JoinHandle<()>>,
}

impl BotScheduler {
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// Schedule `pick` to run after `delay`, replacing any pending move.
    /// The closure is skipped entirely if the session goes inactive before
    /// the delay elapses.
    pub fn schedule<F>(&mut self, delay: Duration, active: Arc<AtomicBool>, pick: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if active.load(Ordering::SeqCst) {
                pick();
            } else {
                debug!("Dropping bot move for inactive session");
            }
        }));
    }

    /// Abort the pending move, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.handle.as_ref().map(|h| !h.is_finished()).unwrap_or(false)
    }
}

impl Drop for BotScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test]
    async fn test_scheduled_move_runs_when_active() {
        let mut scheduler = BotScheduler::new();
        let active = Arc::new(AtomicBool::new(true));
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&fired);
        scheduler.schedule(Duration::from_millis(10), active, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_inactive_session_drops_move() {
        let mut scheduler = BotScheduler::new();
        let active = Arc::new(AtomicBool::new(true));
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&fired);
        scheduler.schedule(Duration::from_millis(10), Arc::clone(&active), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        // Session ends before the timer fires
        active.store(false, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancel_aborts_pending_move() {
        let mut scheduler = BotScheduler::new();
        let active = Arc::new(AtomicBool::new(true));
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&fired);
        scheduler.schedule(Duration::from_millis(10), active, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        scheduler.cancel();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(!scheduler.is_pending());
    }

    #[tokio::test]
    async fn test_reschedule_replaces_pending_move() {
        let mut scheduler = BotScheduler::new();
        let active = Arc::new(AtomicBool::new(true));
        let fired = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let counter = Arc::clone(&fired);
            scheduler.schedule(Duration::from_millis(10), Arc::clone(&active), move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
