//! Single-flight audio output
//!
//! Enforces at most one active spoken utterance app-wide. A new `speak`
//! preempts the in-flight one (most recent wins, no queueing), and
//! callbacks belonging to a superseded utterance never fire — a screen the
//! user already left must not receive a stale "finished speaking" event.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use crate::Result;
use crate::engine::{SynthesisEngine, SynthesisEvent, SynthesisRequest};

/// Default utterance language (BCP-47)
pub const DEFAULT_LANGUAGE: &str = "zh-HK";

/// Default speech rate
const DEFAULT_RATE: f32 = 0.8;

/// Default output volume
const DEFAULT_VOLUME: f32 = 1.0;

/// Allowed speech rate range
const RATE_MIN: f32 = 0.5;
const RATE_MAX: f32 = 1.5;

/// Default settle delay between cancelling and starting an utterance
const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Playback state of the output manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing is playing
    Idle,
    /// An utterance is playing
    Speaking,
    /// A manual stop is being delivered to the engine
    Cancelling,
}

/// Callback invoked when an utterance starts or ends
pub type UtteranceCallback = Box<dyn FnOnce() + Send>;

/// Callback invoked with the engine message when an utterance fails
pub type UtteranceErrorCallback = Box<dyn FnOnce(String) + Send>;

/// A single utterance submitted to [`AudioOutputManager::speak`].
///
/// Owned exclusively by the manager once submitted; it completes, errors,
/// or is superseded by a newer request.
pub struct UtteranceRequest {
    text: String,
    language: String,
    rate: f32,
    volume: f32,
    on_start: Option<UtteranceCallback>,
    on_end: Option<UtteranceCallback>,
    on_error: Option<UtteranceErrorCallback>,
}

impl UtteranceRequest {
    /// Request with the default language, rate, and volume
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: DEFAULT_LANGUAGE.to_string(),
            rate: DEFAULT_RATE,
            volume: DEFAULT_VOLUME,
            on_start: None,
            on_end: None,
            on_error: None,
        }
    }

    /// Set the utterance language (BCP-47)
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the speech rate, clamped to 0.5–1.5
    #[must_use]
    pub fn rate(mut self, rate: f32) -> Self {
        self.rate = rate.clamp(RATE_MIN, RATE_MAX);
        self
    }

    /// Set the volume, clamped to 0.0–1.0
    #[must_use]
    pub fn volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 1.0);
        self
    }

    /// Invoke `f` when the engine starts playing this utterance
    #[must_use]
    pub fn on_start(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_start = Some(Box::new(f));
        self
    }

    /// Invoke `f` when this utterance finishes playing
    #[must_use]
    pub fn on_end(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_end = Some(Box::new(f));
        self
    }

    /// Invoke `f` if the engine fails to play this utterance.
    /// Never invoked for a manual stop or preemption.
    #[must_use]
    pub fn on_error(mut self, f: impl FnOnce(String) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }
}

/// How a submitted utterance concluded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UtteranceOutcome {
    /// The engine finished speaking the full text
    Completed,
    /// Preempted by a newer `speak` or stopped by `cancel`
    Cancelled,
    /// The engine reported a playback failure
    Failed(String),
}

/// Handle to an in-flight utterance
pub struct SpeakHandle {
    rx: oneshot::Receiver<UtteranceOutcome>,
}

impl SpeakHandle {
    /// Wait for the utterance to end, error, or be superseded.
    /// Always resolves — a superseded utterance yields `Cancelled`.
    pub async fn finished(self) -> UtteranceOutcome {
        self.rx.await.unwrap_or(UtteranceOutcome::Cancelled)
    }
}

/// Enforces a single active spoken utterance app-wide
pub struct AudioOutputManager {
    engine: Arc<dyn SynthesisEngine>,
    state: Arc<Mutex<PlaybackState>>,
    /// Generation of the one utterance allowed to fire callbacks
    generation: Arc<AtomicU64>,
    settle: Duration,
    preserve_navigation: AtomicBool,
}

impl AudioOutputManager {
    /// Manager over `engine` with the default settle delay
    #[must_use]
    pub fn new(engine: Arc<dyn SynthesisEngine>) -> Self {
        Self::with_settle_delay(engine, DEFAULT_SETTLE_DELAY)
    }

    /// Manager with an explicit settle delay between cancel and restart,
    /// for platforms where engine cancellation is not synchronous
    #[must_use]
    pub fn with_settle_delay(engine: Arc<dyn SynthesisEngine>, settle: Duration) -> Self {
        Self {
            engine,
            state: Arc::new(Mutex::new(PlaybackState::Idle)),
            generation: Arc::new(AtomicU64::new(0)),
            settle,
            preserve_navigation: AtomicBool::new(false),
        }
    }

    /// Speak `request`, preempting any in-flight utterance first.
    ///
    /// The returned handle resolves when the utterance ends, errors, or is
    /// itself superseded.
    ///
    /// # Errors
    ///
    /// Returns error if the synthesis engine rejects the utterance
    pub async fn speak(&self, request: UtteranceRequest) -> Result<SpeakHandle> {
        self.cancel().await;

        // Claim the generation before the settle delay so a cancel issued
        // while settling suppresses this utterance too.
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let (done_tx, done_rx) = oneshot::channel();
        let handle = SpeakHandle { rx: done_rx };

        if !self.settle.is_zero() {
            tokio::time::sleep(self.settle).await;
        }

        if self.generation.load(Ordering::SeqCst) != generation {
            let _ = done_tx.send(UtteranceOutcome::Cancelled);
            return Ok(handle);
        }

        let UtteranceRequest {
            text,
            language,
            rate,
            volume,
            on_start,
            on_end,
            on_error,
        } = request;

        tracing::debug!(%language, rate, volume, chars = text.chars().count(), "starting utterance");

        let events = self
            .engine
            .start(SynthesisRequest {
                text,
                language,
                rate,
                volume,
            })
            .await?;

        tokio::spawn(drive_utterance(
            events,
            generation,
            Arc::clone(&self.generation),
            Arc::clone(&self.state),
            on_start,
            on_end,
            on_error,
            done_tx,
        ));

        Ok(handle)
    }

    /// Stop the current utterance, if any. Idempotent; the superseded
    /// utterance's callbacks never fire, and an engine error caused by the
    /// stop is swallowed.
    pub async fn cancel(&self) {
        // Invalidate whatever is in flight, including an utterance still
        // waiting out its settle delay.
        self.generation.fetch_add(1, Ordering::SeqCst);

        let was_speaking = {
            let mut state = self.state.lock().unwrap();
            let was = *state == PlaybackState::Speaking;
            if was {
                *state = PlaybackState::Cancelling;
            }
            was
        };

        if was_speaking {
            tracing::debug!("cancelling active utterance");
        }

        self.engine.stop().await;
        *self.state.lock().unwrap() = PlaybackState::Idle;
    }

    /// Whether an utterance is currently in the `Speaking` state
    #[must_use]
    pub fn is_playing(&self) -> bool {
        *self.state.lock().unwrap() == PlaybackState::Speaking
    }

    /// Current playback state
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        *self.state.lock().unwrap()
    }

    /// Keep the current utterance playing across the next navigation,
    /// carrying a greeting into the screen the user is being routed to
    pub fn preserve_next_navigation(&self) {
        self.preserve_navigation.store(true, Ordering::SeqCst);
    }

    /// Called by screens when navigating away: stops playback unless a
    /// one-shot preserve was armed. Always disarms the flag.
    pub async fn handle_navigation(&self) {
        if self.preserve_navigation.swap(false, Ordering::SeqCst) {
            tracing::debug!("preserving utterance across navigation");
            return;
        }
        self.cancel().await;
    }
}

/// Consume engine events for one utterance, firing callbacks only while the
/// utterance is still the current generation.
#[allow(clippy::too_many_arguments)]
async fn drive_utterance(
    mut events: mpsc::Receiver<SynthesisEvent>,
    generation: u64,
    current: Arc<AtomicU64>,
    state: Arc<Mutex<PlaybackState>>,
    mut on_start: Option<UtteranceCallback>,
    mut on_end: Option<UtteranceCallback>,
    mut on_error: Option<UtteranceErrorCallback>,
    done: oneshot::Sender<UtteranceOutcome>,
) {
    let is_current = || current.load(Ordering::SeqCst) == generation;

    let outcome = loop {
        let Some(event) = events.recv().await else {
            // Engine dropped the stream without a terminal event (stopped)
            if is_current() {
                *state.lock().unwrap() = PlaybackState::Idle;
            }
            break UtteranceOutcome::Cancelled;
        };

        match event {
            SynthesisEvent::Started => {
                if is_current() {
                    *state.lock().unwrap() = PlaybackState::Speaking;
                    if let Some(f) = on_start.take() {
                        f();
                    }
                }
            }
            SynthesisEvent::Ended => {
                if is_current() {
                    *state.lock().unwrap() = PlaybackState::Idle;
                    if let Some(f) = on_end.take() {
                        f();
                    }
                    break UtteranceOutcome::Completed;
                }
                break UtteranceOutcome::Cancelled;
            }
            SynthesisEvent::Failed(message) => {
                if is_current() {
                    *state.lock().unwrap() = PlaybackState::Idle;
                    tracing::warn!(error = %message, "utterance failed");
                    if let Some(f) = on_error.take() {
                        f(message.clone());
                    }
                    break UtteranceOutcome::Failed(message);
                }
                // Manual stop or preemption: not a failure for the caller
                break UtteranceOutcome::Cancelled;
            }
        }
    };

    let _ = done.send(outcome);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_clamps_rate_and_volume() {
        let request = UtteranceRequest::new("hi").rate(3.0).volume(-0.2);
        assert!((request.rate - RATE_MAX).abs() < f32::EPSILON);
        assert!(request.volume.abs() < f32::EPSILON);

        let request = UtteranceRequest::new("hi").rate(0.1).volume(1.7);
        assert!((request.rate - RATE_MIN).abs() < f32::EPSILON);
        assert!((request.volume - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn request_defaults_match_app_settings() {
        let request = UtteranceRequest::new("早晨");
        assert_eq!(request.language, DEFAULT_LANGUAGE);
        assert!((request.rate - 0.8).abs() < f32::EPSILON);
        assert!((request.volume - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn handle_resolves_cancelled_when_driver_is_gone() {
        let (tx, rx) = oneshot::channel();
        drop(tx);
        let handle = SpeakHandle { rx };
        assert_eq!(
            tokio_test::block_on(handle.finished()),
            UtteranceOutcome::Cancelled
        );
    }
}
