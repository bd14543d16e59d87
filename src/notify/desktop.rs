use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use super::{ALERT_TIMEOUT_SECS, ALERT_TITLE, Notifier, NotifyError};

/// Real desktop dispatcher: system toast via `notify-rust`, audio clip via
/// `rodio`.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    sound_file: PathBuf,
}

impl DesktopNotifier {
    pub fn new(sound_file: impl Into<PathBuf>) -> Self {
        Self { sound_file: sound_file.into() }
    }
}

impl Notifier for DesktopNotifier {
    fn alert(&self, message: &str) -> Result<(), NotifyError> {
        notify_rust::Notification::new()
            .summary(ALERT_TITLE)
            .body(message)
            .appname("To-Do List")
            .timeout(notify_rust::Timeout::Milliseconds(ALERT_TIMEOUT_SECS * 1000))
            .show()
            .map(|_| ())
            .map_err(|e| NotifyError::Alert(e.to_string()))
    }

    fn play_sound(&self) -> Result<(), NotifyError> {
        let sound = |e: &dyn std::fmt::Display| NotifyError::Sound(e.to_string());
        let file = File::open(&self.sound_file).map_err(|e| sound(&e))?;
        let (_stream, handle) = rodio::OutputStream::try_default().map_err(|e| sound(&e))?;
        let sink = rodio::Sink::try_new(&handle).map_err(|e| sound(&e))?;
        let source = rodio::Decoder::new(BufReader::new(file)).map_err(|e| sound(&e))?;
        sink.append(source);
        sink.sleep_until_end();
        Ok(())
    }
}
