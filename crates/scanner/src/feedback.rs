//! User-facing feedback: one alert, at most one sound, per scan.

use crate::config::ScannerConfig;
use crate::error::ErrorKind;
use crate::scanner::ScanOutcome;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;
#[cfg(any(test, feature = "mock"))]
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

pub type FeedbackHandle = Arc<dyn FeedbackSink + Send + Sync>;

/// Alert colour, as the host renders it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Red,
    Orange,
    Green,
}
impl Display for Indicator {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Green => "green",
        })
    }
}

/// A transient message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
    pub indicator: Indicator,
    /// Time before the alert dismisses itself. Cosmetic.
    pub duration: Duration,
}

/// Where alerts and sounds go. Fire-and-forget: nothing is returned and
/// nothing a sink does can fail a scan.
pub trait FeedbackSink: Send + Sync {
    fn alert(&self, alert: Alert);

    fn play_sound(&self, sound: &str);
}

/// Sends alerts and sounds to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingFeedback;

impl FeedbackSink for TracingFeedback {
    fn alert(&self, alert: Alert) {
        match alert.indicator {
            Indicator::Green => tracing::info!(indicator = %alert.indicator, "{}", alert.message),
            Indicator::Orange | Indicator::Red => tracing::warn!(indicator = %alert.indicator, "{}", alert.message),
        }
    }

    fn play_sound(&self, sound: &str) {
        tracing::debug!(sound, "Playing sound");
    }
}

/// Something a [`RecordingFeedback`] received.
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Alert(Alert),
    Sound(String),
}

/// Keeps everything it receives, in order.
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Default)]
pub struct RecordingFeedback {
    events: Mutex<Vec<Feedback>>,
}
#[cfg(any(test, feature = "mock"))]
impl RecordingFeedback {
    /// Drains and returns everything received so far.
    pub fn take(&self) -> Vec<Feedback> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn push(&self, event: Feedback) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event);
    }
}

#[cfg(any(test, feature = "mock"))]
impl FeedbackSink for RecordingFeedback {
    fn alert(&self, alert: Alert) {
        self.push(Feedback::Alert(alert));
    }

    fn play_sound(&self, sound: &str) {
        self.push(Feedback::Sound(sound.to_string()));
    }
}

/// Maps scan outcomes to alerts and sounds.
pub(crate) struct Emitter {
    sink: FeedbackHandle,
    success_sound: Option<String>,
    fail_sound: Option<String>,
    duration: Duration,
}
impl Emitter {
    pub(crate) fn new(sink: FeedbackHandle, config: &ScannerConfig) -> Self {
        Self {
            sink,
            success_sound: config.success_sound.clone(),
            fail_sound: config.fail_sound.clone(),
            duration: config.alert_duration(),
        }
    }

    pub(crate) fn scanned(&self, outcome: &ScanOutcome) {
        let message = match outcome {
            ScanOutcome::Ignored => return,
            ScanOutcome::Created(row) => format!("Row #{}: Item added", row.idx),
            ScanOutcome::Updated { row, qty_added } => format!("Row #{}: Qty increased by {qty_added}", row.idx),
        };
        self.emit(message, Indicator::Green, self.success_sound.as_deref());
    }

    pub(crate) fn failed(&self, kind: &ErrorKind) {
        let (message, indicator) = match kind {
            ErrorKind::InputTooShort => ("Serial No not scanned".to_string(), Indicator::Red),
            ErrorKind::ItemNotFound => ("Cannot find Item".to_string(), Indicator::Red),
            ErrorKind::LookupFailure => ("Item lookup failed".to_string(), Indicator::Red),
            ErrorKind::DuplicateSerial(serial) => (format!("Serial No {serial} is already added"), Indicator::Orange),
            ErrorKind::InvalidIncrement(_) | ErrorKind::Table | ErrorKind::Config(_) => {
                ("Could not update items".to_string(), Indicator::Red)
            },
        };
        self.emit(message, indicator, self.fail_sound.as_deref());
    }

    fn emit(&self, message: String, indicator: Indicator, sound: Option<&str>) {
        self.sink.alert(Alert { message, indicator, duration: self.duration });
        if let Some(sound) = sound {
            self.sink.play_sound(sound);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use stockscan_form::Row;

    fn emitter(success_sound: Option<&str>) -> (Arc<RecordingFeedback>, Emitter) {
        let sink = Arc::new(RecordingFeedback::default());
        let config = ScannerConfig { success_sound: success_sound.map(str::to_string), ..ScannerConfig::default() };
        (sink.clone(), Emitter::new(sink, &config))
    }

    fn alert(message: &str, indicator: Indicator) -> Feedback {
        Feedback::Alert(Alert { message: message.to_string(), indicator, duration: Duration::from_secs(3) })
    }

    #[rstest]
    #[case(ErrorKind::InputTooShort, alert("Serial No not scanned", Indicator::Red))]
    #[case(ErrorKind::ItemNotFound, alert("Cannot find Item", Indicator::Red))]
    #[case(ErrorKind::LookupFailure, alert("Item lookup failed", Indicator::Red))]
    #[case(ErrorKind::DuplicateSerial("S2".into()), alert("Serial No S2 is already added", Indicator::Orange))]
    #[case(ErrorKind::Table, alert("Could not update items", Indicator::Red))]
    fn test_failures_alert_and_play_fail_sound(#[case] kind: ErrorKind, #[case] expected: Feedback) {
        let (sink, emitter) = emitter(None);
        emitter.failed(&kind);
        assert_eq!(sink.take(), [expected, Feedback::Sound("error".to_string())]);
    }

    #[test]
    fn test_success_messages() {
        let (sink, emitter) = emitter(Some("submit"));
        emitter.scanned(&ScanOutcome::Created(Row::new(1)));
        emitter.scanned(&ScanOutcome::Updated { row: Row::new(2), qty_added: 1.0 });
        assert_eq!(
            sink.take(),
            [
                alert("Row #1: Item added", Indicator::Green),
                Feedback::Sound("submit".to_string()),
                alert("Row #2: Qty increased by 1", Indicator::Green),
                Feedback::Sound("submit".to_string()),
            ]
        );
    }

    #[test]
    fn test_no_success_sound_unless_configured() {
        let (sink, emitter) = emitter(None);
        emitter.scanned(&ScanOutcome::Created(Row::new(1)));
        assert_eq!(sink.take(), [alert("Row #1: Item added", Indicator::Green)]);
    }

    #[test]
    fn test_ignored_scan_is_silent() {
        let (sink, emitter) = emitter(Some("submit"));
        emitter.scanned(&ScanOutcome::Ignored);
        assert!(sink.take().is_empty());
    }
}
