//! Scripted engines for tests and the demo binary
//!
//! Exercise the voice pipeline without audio hardware: the synthesis mock
//! "plays" utterances on a timer, the recognition mock replays a scripted
//! sequence of results, errors, and hangs.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{
    RecognitionEngine, RecognitionErrorKind, RecognitionRequest, RecognitionResult,
    SynthesisEngine, SynthesisEvent, SynthesisRequest,
};
use crate::Result;

/// Default simulated playback duration per utterance
const MOCK_UTTERANCE_DURATION: Duration = Duration::from_millis(50);

/// Synthesis engine that plays utterances on a timer
pub struct MockSynthesisEngine {
    duration: Duration,
    fail_next: Mutex<Option<String>>,
    active: Mutex<Option<JoinHandle<()>>>,
    spoken: Arc<Mutex<Vec<String>>>,
}

impl MockSynthesisEngine {
    /// Engine with the default simulated playback duration
    #[must_use]
    pub fn new() -> Self {
        Self::with_duration(MOCK_UTTERANCE_DURATION)
    }

    /// Engine whose every utterance "plays" for `duration`
    #[must_use]
    pub fn with_duration(duration: Duration) -> Self {
        Self {
            duration,
            fail_next: Mutex::new(None),
            active: Mutex::new(None),
            spoken: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make the next utterance fail with `message` instead of completing
    pub fn fail_next(&self, message: impl Into<String>) {
        *self.fail_next.lock().unwrap() = Some(message.into());
    }

    /// Texts spoken to completion, in order
    #[must_use]
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

impl Default for MockSynthesisEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SynthesisEngine for MockSynthesisEngine {
    async fn start(&self, request: SynthesisRequest) -> Result<mpsc::Receiver<SynthesisEvent>> {
        let (tx, rx) = mpsc::channel(4);
        let failure = self.fail_next.lock().unwrap().take();
        let duration = self.duration;
        let spoken = Arc::clone(&self.spoken);
        let text = request.text;

        let handle = tokio::spawn(async move {
            let _ = tx.send(SynthesisEvent::Started).await;
            tokio::time::sleep(duration).await;
            match failure {
                Some(message) => {
                    let _ = tx.send(SynthesisEvent::Failed(message)).await;
                }
                None => {
                    // Only fully played texts land in the log
                    spoken.lock().unwrap().push(text);
                    let _ = tx.send(SynthesisEvent::Ended).await;
                }
            }
        });

        *self.active.lock().unwrap() = Some(handle);
        Ok(rx)
    }

    async fn stop(&self) {
        if let Some(handle) = self.active.lock().unwrap().take() {
            handle.abort();
        }
    }
}

/// One step in a recognition script
#[derive(Debug, Clone)]
pub enum ScriptedRecognition {
    /// Resolve with a transcript at the given confidence
    Result {
        /// Transcript to return
        transcript: String,
        /// Confidence to report
        confidence: f32,
    },
    /// Fail with an engine error code
    Error(RecognitionErrorKind),
    /// Never resolve, to exercise the per-attempt timeout
    Hang,
}

impl ScriptedRecognition {
    /// Shorthand for a transcript step
    #[must_use]
    pub fn result(transcript: impl Into<String>, confidence: f32) -> Self {
        Self::Result {
            transcript: transcript.into(),
            confidence,
        }
    }
}

/// Recognition engine replaying a scripted sequence of outcomes.
/// An exhausted script reports `no-speech`.
pub struct ScriptedRecognitionEngine {
    script: Mutex<VecDeque<ScriptedRecognition>>,
    requests: Mutex<Vec<RecognitionRequest>>,
    stops: AtomicUsize,
    latency: Duration,
}

impl ScriptedRecognitionEngine {
    /// Engine replaying `script` in order
    #[must_use]
    pub fn new(script: Vec<ScriptedRecognition>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
            stops: AtomicUsize::new(0),
            latency: Duration::from_millis(10),
        }
    }

    /// Requests received so far, in order
    #[must_use]
    pub fn requests(&self) -> Vec<RecognitionRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// How many times `stop` has been called
    #[must_use]
    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecognitionEngine for ScriptedRecognitionEngine {
    async fn recognize(
        &self,
        request: RecognitionRequest,
    ) -> std::result::Result<RecognitionResult, RecognitionErrorKind> {
        self.requests.lock().unwrap().push(request);
        let step = self.script.lock().unwrap().pop_front();

        tokio::time::sleep(self.latency).await;

        match step {
            Some(ScriptedRecognition::Result {
                transcript,
                confidence,
            }) => Ok(RecognitionResult {
                transcript,
                confidence,
            }),
            Some(ScriptedRecognition::Error(kind)) => Err(kind),
            Some(ScriptedRecognition::Hang) => std::future::pending().await,
            None => Err(RecognitionErrorKind::NoSpeech),
        }
    }

    async fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}
