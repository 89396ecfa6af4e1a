//! External speech engine interfaces
//!
//! Synthesis (TTS) and recognition (ASR) are opaque platform services.
//! Each is modeled as a capability trait so the core stays testable without
//! audio hardware; a null-object recognition engine stands in on platforms
//! with no ASR support.

pub mod mock;

use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::Result;

/// Request sent to the external synthesis engine
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// Text to speak
    pub text: String,

    /// BCP-47 language tag (e.g. `zh-HK`)
    pub language: String,

    /// Speech rate multiplier
    pub rate: f32,

    /// Output volume
    pub volume: f32,
}

/// Event emitted by the synthesis engine for an in-flight utterance
#[derive(Debug, Clone)]
pub enum SynthesisEvent {
    /// Audio started playing
    Started,
    /// The full text was spoken
    Ended,
    /// The engine failed to speak
    Failed(String),
}

/// External text-to-speech engine
#[async_trait]
pub trait SynthesisEngine: Send + Sync {
    /// Begin speaking. `Started`, then `Ended` or `Failed`, arrive on the
    /// returned receiver. Behavior with two concurrent utterances is
    /// engine-defined; callers serialize through `AudioOutputManager`.
    ///
    /// # Errors
    ///
    /// Returns error if the utterance cannot be submitted at all
    async fn start(&self, request: SynthesisRequest) -> Result<mpsc::Receiver<SynthesisEvent>>;

    /// Stop the in-flight utterance, if any. Idempotent.
    async fn stop(&self);
}

/// Request sent to the external recognition engine
#[derive(Debug, Clone)]
pub struct RecognitionRequest {
    /// BCP-47 language tag to recognize against
    pub language: String,

    /// Keep listening after the first result
    pub continuous: bool,

    /// Emit partial hypotheses while listening
    pub interim_results: bool,
}

impl RecognitionRequest {
    /// Request a single final transcript in the given language
    #[must_use]
    pub fn single(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            continuous: false,
            interim_results: false,
        }
    }
}

/// A final transcript from the recognition engine
#[derive(Debug, Clone)]
pub struct RecognitionResult {
    /// Recognized text
    pub transcript: String,

    /// Engine-reported probability that the transcript is accurate
    pub confidence: f32,
}

/// Recognition failure codes
///
/// `NoSpeech`, `Network`, and `Other` are the wire codes engines report;
/// `Unavailable` is produced inside the core when no engine exists on the
/// platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionErrorKind {
    /// No speech was detected before the engine gave up
    NoSpeech,

    /// Engine-side network failure
    Network,

    /// Recognition engine absent on this platform
    Unavailable,

    /// Any other engine-reported failure
    Other(String),
}

impl fmt::Display for RecognitionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSpeech => write!(f, "no-speech"),
            Self::Network => write!(f, "network"),
            Self::Unavailable => write!(f, "recognition unavailable"),
            Self::Other(message) => write!(f, "{message}"),
        }
    }
}

/// External speech-to-text engine
#[async_trait]
pub trait RecognitionEngine: Send + Sync {
    /// Whether a recognition engine is actually present on this platform
    fn is_available(&self) -> bool {
        true
    }

    /// Run one recognition attempt to a single transcript or an error code
    async fn recognize(
        &self,
        request: RecognitionRequest,
    ) -> std::result::Result<RecognitionResult, RecognitionErrorKind>;

    /// Abort the in-flight attempt, if any. Idempotent.
    async fn stop(&self);
}

/// Null-object fallback selected at startup when the platform has no ASR.
/// Callers seeing `Unavailable` should offer a manual text-entry path.
pub struct NullRecognitionEngine;

#[async_trait]
impl RecognitionEngine for NullRecognitionEngine {
    fn is_available(&self) -> bool {
        false
    }

    async fn recognize(
        &self,
        _request: RecognitionRequest,
    ) -> std::result::Result<RecognitionResult, RecognitionErrorKind> {
        Err(RecognitionErrorKind::Unavailable)
    }

    async fn stop(&self) {}
}
