#[cfg(feature = "desktop")]
pub mod desktop;

use thiserror::Error;

/// Title shown on every reminder alert.
pub const ALERT_TITLE: &str = "Task Reminder";
/// How long the alert stays on screen, in seconds.
pub const ALERT_TIMEOUT_SECS: u32 = 10;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("alert dispatch failed: {0}")]
    Alert(String),
    #[error("sound playback failed: {0}")]
    Sound(String),
}

/// The two user-visible side effects of a due reminder. Both are best-effort:
/// the scanner logs failures and keeps going.
pub trait Notifier: Send + Sync + 'static {
    /// Present a transient alert carrying the task description.
    fn alert(&self, message: &str) -> Result<(), NotifyError>;

    /// Play the fixed notification clip. Blocking; the scanner runs it off
    /// the scan path.
    fn play_sound(&self) -> Result<(), NotifyError>;
}

/// Headless dispatcher: routes alerts to the log and skips audio. Used when
/// the `desktop` feature is off.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&self, message: &str) -> Result<(), NotifyError> {
        tracing::info!(title = ALERT_TITLE, %message, "reminder");
        Ok(())
    }

    fn play_sound(&self) -> Result<(), NotifyError> {
        Ok(())
    }
}
