//! Voice session state machine
//!
//! Drives the listen → recognize → confirm flow: runs the recognition
//! cascade, surfaces the transcript (or failure) for user confirmation,
//! and only on confirmation hands the classified action to the owning
//! screen. Every path returns the controller to `Idle`.

use std::sync::{Arc, Mutex};

use tokio::sync::Notify;
use uuid::Uuid;

use crate::intent::{Intent, IntentRouter};
use crate::output::{AudioOutputManager, UtteranceRequest};
use crate::recognition::{RecognitionAttempt, SpeechRecognitionCascade, failure_message};
use crate::{Error, Result};

/// State of a voice session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session in progress
    Idle,
    /// The cascade is listening for input
    Listening,
    /// A terminal attempt is surfaced for confirmation
    Recognized,
}

/// How a listening pass ended
#[derive(Debug)]
pub enum ListenOutcome {
    /// The cascade produced a terminal attempt (success or failure)
    Recognized(RecognitionAttempt),
    /// The session was cancelled while listening
    Cancelled,
}

struct SessionInner {
    state: SessionState,
    attempt: Option<RecognitionAttempt>,
}

/// Drives one listen→recognize→confirm flow at a time
pub struct VoiceSessionController {
    id: Uuid,
    cascade: SpeechRecognitionCascade,
    router: IntentRouter,
    output: Arc<AudioOutputManager>,
    language_order: Vec<String>,
    inner: Mutex<SessionInner>,
    cancel_notify: Notify,
}

impl VoiceSessionController {
    /// Controller composing the cascade, router, and output manager
    #[must_use]
    pub fn new(
        cascade: SpeechRecognitionCascade,
        router: IntentRouter,
        output: Arc<AudioOutputManager>,
        language_order: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            cascade,
            router,
            output,
            language_order,
            inner: Mutex::new(SessionInner {
                state: SessionState::Idle,
                attempt: None,
            }),
            cancel_notify: Notify::new(),
        }
    }

    /// Current session state
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.inner.lock().unwrap().state
    }

    /// The surfaced terminal attempt, while in `Recognized`
    #[must_use]
    pub fn attempt(&self) -> Option<RecognitionAttempt> {
        self.inner.lock().unwrap().attempt.clone()
    }

    /// Whether the surfaced transcript may be confirmed
    #[must_use]
    pub fn can_confirm(&self) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.state == SessionState::Recognized
            && inner.attempt.as_ref().is_some_and(RecognitionAttempt::is_success)
    }

    /// Begin listening. `Idle → Listening`, then runs the cascade to a
    /// terminal attempt and surfaces it (`Listening → Recognized`).
    ///
    /// # Errors
    ///
    /// Returns `Error::Session` if a session is already in progress
    pub async fn start(&self) -> Result<ListenOutcome> {
        {
            let mut inner = self.inner.lock().unwrap();
            if inner.state != SessionState::Idle {
                return Err(Error::Session(format!(
                    "cannot start listening from {:?}",
                    inner.state
                )));
            }
            inner.state = SessionState::Listening;
            inner.attempt = None;
        }
        tracing::info!(session = %self.id, "listening");
        self.listen().await
    }

    /// Re-listen after the user rejected the transcript
    /// (`Recognized → Listening`).
    ///
    /// # Errors
    ///
    /// Returns `Error::Session` unless a transcript is being surfaced
    pub async fn retry(&self) -> Result<ListenOutcome> {
        {
            let mut inner = self.inner.lock().unwrap();
            if inner.state != SessionState::Recognized {
                return Err(Error::Session(format!(
                    "cannot retry from {:?}",
                    inner.state
                )));
            }
            inner.state = SessionState::Listening;
            inner.attempt = None;
        }
        tracing::info!(session = %self.id, "retrying");
        self.listen().await
    }

    /// Confirm the surfaced transcript: classify it and hand the action to
    /// the owning screen (`Recognized → Idle`).
    ///
    /// # Errors
    ///
    /// Returns `Error::Session`, leaving the state unchanged, when nothing
    /// has been recognized or the terminal attempt is a failure —
    /// confirmation is disabled without a usable transcript
    pub fn confirm(&self) -> Result<Intent> {
        let transcript = {
            let mut inner = self.inner.lock().unwrap();
            if inner.state != SessionState::Recognized {
                return Err(Error::Session(format!(
                    "cannot confirm from {:?}",
                    inner.state
                )));
            }
            let Some(attempt) = inner.attempt.as_ref() else {
                return Err(Error::Session("no attempt to confirm".to_string()));
            };
            if !attempt.is_success() {
                return Err(Error::Session(
                    "cannot confirm a failed recognition".to_string(),
                ));
            }
            let transcript = attempt.transcript.clone().unwrap_or_default();
            inner.state = SessionState::Idle;
            inner.attempt = None;
            transcript
        };

        let intent = self.router.classify(&transcript);
        tracing::info!(session = %self.id, transcript = %transcript, intent = ?intent, "confirmed");
        Ok(intent)
    }

    /// Dismiss the session from any state: stop recognition and playback
    /// and return to `Idle` without invoking the router
    pub async fn cancel(&self) {
        self.cancel_notify.notify_waiters();
        self.cascade.stop().await;
        self.output.cancel().await;
        self.reset();
        tracing::info!(session = %self.id, "session cancelled");
    }

    async fn listen(&self) -> Result<ListenOutcome> {
        let attempt = tokio::select! {
            attempt = self.cascade.run(&self.language_order) => attempt?,
            () = self.cancel_notify.notified() => {
                self.reset();
                tracing::info!(session = %self.id, "listening cancelled");
                return Ok(ListenOutcome::Cancelled);
            }
        };

        {
            let mut inner = self.inner.lock().unwrap();
            inner.state = SessionState::Recognized;
            inner.attempt = Some(attempt.clone());
        }

        if let Some(error) = &attempt.error {
            tracing::info!(session = %self.id, error = %error, "recognition failed");
            let message = failure_message(&attempt.language, error);
            match self
                .output
                .speak(UtteranceRequest::new(message).language(&attempt.language))
                .await
            {
                Ok(_handle) => {}
                Err(e) => tracing::warn!(error = %e, "failed to speak failure message"),
            }
        } else {
            tracing::info!(
                session = %self.id,
                transcript = attempt.transcript.as_deref().unwrap_or_default(),
                "transcript surfaced for confirmation"
            );
        }

        Ok(ListenOutcome::Recognized(attempt))
    }

    fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.state = SessionState::Idle;
        inner.attempt = None;
    }
}
