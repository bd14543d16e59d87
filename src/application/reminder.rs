use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tracing::{debug, error, info, warn};

use crate::domain::store::{StoreError, TaskStore};
use crate::notify::Notifier;

/// Cadence at which the scan loop polls for due reminders.
pub const SCAN_INTERVAL: Duration = Duration::from_secs(30);

/// Upper bound on one audio-cue playback; a hung backend cannot pile up
/// waiters past this.
const SOUND_TIMEOUT: Duration = Duration::from_secs(15);

/// Bridges the polling clock to notification dispatch and suppression.
pub struct ReminderScanner<S, N> {
    store: S,
    notifier: Arc<N>,
}

impl<S: TaskStore, N: Notifier> ReminderScanner<S, N> {
    pub fn new(store: S, notifier: Arc<N>) -> Self {
        Self { store, notifier }
    }

    /// One poll: fetch due reminders and, for each, fire the visual alert,
    /// kick off the audio cue, then clear `notify_at`.
    ///
    /// The alert is attempted before the suppression write, so a crash in
    /// between can repeat an alert on the next poll but never lose one. The
    /// audio cue carries no such guarantee; it runs detached and may be
    /// skipped or outlive the scan. Returns the number of reminders fired.
    pub async fn check_reminders(&self) -> Result<usize, StoreError> {
        let now = Local::now().naive_local();
        let due = self.store.fetch_due(now).await?;
        let fired = due.len();
        for reminder in due {
            if let Err(e) = self.notifier.alert(&reminder.description) {
                warn!(task_id = reminder.task_id.0, error = %e, "alert dispatch failed");
            }
            let notifier = Arc::clone(&self.notifier);
            tokio::spawn(async move {
                let playback = tokio::task::spawn_blocking(move || notifier.play_sound());
                match tokio::time::timeout(SOUND_TIMEOUT, playback).await {
                    Ok(Ok(Ok(()))) => {}
                    Ok(Ok(Err(e))) => warn!(error = %e, "sound playback failed"),
                    Ok(Err(e)) => warn!(error = %e, "sound playback panicked"),
                    Err(_) => warn!("sound playback timed out"),
                }
            });
            self.store.mark_task_as_notified(reminder.task_id).await?;
            debug!(task_id = reminder.task_id.0, notify_at = %reminder.notify_at, "reminder fired");
        }
        Ok(fired)
    }

    /// Drive [`check_reminders`](Self::check_reminders) on a fixed interval.
    /// Scan failures are logged and the loop carries on.
    pub async fn run(&self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            match self.check_reminders().await {
                Ok(0) => {}
                Ok(n) => info!(fired = n, "reminders dispatched"),
                Err(e) => error!(error = %e, "reminder scan failed"),
            }
        }
    }
}
