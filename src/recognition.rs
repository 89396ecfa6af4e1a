//! Multi-language speech recognition cascade
//!
//! Tries recognition across an ordered list of candidate languages until an
//! attempt is accepted or the candidates run out. The index only moves
//! forward and is bounded, so a cascade always reaches a terminal attempt.

use std::sync::Arc;
use std::time::Duration;

use crate::engine::{RecognitionEngine, RecognitionErrorKind, RecognitionRequest, RecognitionResult};
use crate::output::{AudioOutputManager, UtteranceRequest};
use crate::{Error, Result};

/// Re-listens allowed on one language when the microphone keeps echoing the
/// listening prompt back
const MAX_ECHO_RETRIES: u32 = 2;

/// One recognition attempt, terminal once returned by the cascade
#[derive(Debug, Clone)]
pub struct RecognitionAttempt {
    /// Language the attempt ran under (BCP-47)
    pub language: String,

    /// Recognized transcript, if any
    pub transcript: Option<String>,

    /// Engine-reported confidence for the transcript
    pub confidence: Option<f32>,

    /// Error that terminated the attempt
    pub error: Option<RecognitionErrorKind>,
}

impl RecognitionAttempt {
    fn accepted(language: &str, transcript: String, confidence: f32) -> Self {
        Self {
            language: language.to_string(),
            transcript: Some(transcript),
            confidence: Some(confidence),
            error: None,
        }
    }

    fn failed(language: &str, error: RecognitionErrorKind) -> Self {
        Self {
            language: language.to_string(),
            transcript: None,
            confidence: None,
            error: Some(error),
        }
    }

    /// Whether the attempt carries a usable transcript
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.transcript.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    /// Convert a terminal attempt into a `Result`, for callers that only
    /// care about the transcript
    ///
    /// # Errors
    ///
    /// Returns `Error::Recognition` for a failure attempt
    pub fn into_result(self) -> Result<String> {
        match self.error {
            Some(kind) => Err(Error::Recognition(kind)),
            None => Ok(self.transcript.unwrap_or_default()),
        }
    }
}

/// Bookkeeping for one cascade run over an ordered language list
#[derive(Debug)]
pub struct RecognitionSession {
    language_order: Vec<String>,
    current_index: usize,
    terminal: Option<RecognitionAttempt>,
}

impl RecognitionSession {
    fn new(language_order: Vec<String>) -> Self {
        Self {
            language_order,
            current_index: 0,
            terminal: None,
        }
    }

    /// Language of the current attempt
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language_order[self.current_index]
    }

    /// Whether the current attempt is the last candidate
    #[must_use]
    pub fn on_last(&self) -> bool {
        self.current_index + 1 == self.language_order.len()
    }

    /// Index of the current attempt; never decreases
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    fn advance(&mut self) {
        self.current_index += 1;
    }

    fn finish(&mut self, attempt: RecognitionAttempt) {
        self.terminal = Some(attempt);
    }

    /// Terminal attempt, once the session has finished
    #[must_use]
    pub fn terminal(&self) -> Option<&RecognitionAttempt> {
        self.terminal.as_ref()
    }
}

/// Cascade tunables
#[derive(Debug, Clone)]
pub struct CascadeConfig {
    /// Minimum confidence to accept a transcript before the last language
    pub confidence_threshold: f32,

    /// Bound on a single recognition attempt, so a platform that never
    /// fires a result or error event cannot hang the session
    pub attempt_timeout: Duration,

    /// Speak a localized listening prompt before each attempt
    pub speak_prompts: bool,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            attempt_timeout: Duration::from_secs(8),
            speak_prompts: true,
        }
    }
}

/// Sequential fallback recognition across an ordered set of languages
pub struct SpeechRecognitionCascade {
    engine: Arc<dyn RecognitionEngine>,
    output: Arc<AudioOutputManager>,
    config: CascadeConfig,
}

impl SpeechRecognitionCascade {
    /// Cascade with default tunables
    #[must_use]
    pub fn new(engine: Arc<dyn RecognitionEngine>, output: Arc<AudioOutputManager>) -> Self {
        Self::with_config(engine, output, CascadeConfig::default())
    }

    /// Cascade with explicit tunables
    #[must_use]
    pub fn with_config(
        engine: Arc<dyn RecognitionEngine>,
        output: Arc<AudioOutputManager>,
        config: CascadeConfig,
    ) -> Self {
        Self {
            engine,
            output,
            config,
        }
    }

    /// Run the cascade over `language_order` to a terminal attempt.
    ///
    /// Accepts a transcript when its confidence reaches the threshold, or
    /// unconditionally on the last candidate language. Hard errors advance
    /// to the next language; exhaustion yields a failure attempt carrying
    /// the last error.
    ///
    /// # Errors
    ///
    /// Returns error only for an empty `language_order`; recognition
    /// failures terminate with a failure [`RecognitionAttempt`] instead.
    pub async fn run(&self, language_order: &[String]) -> Result<RecognitionAttempt> {
        if language_order.is_empty() {
            return Err(Error::Config("language order must not be empty".to_string()));
        }

        if !self.engine.is_available() {
            tracing::warn!("no recognition engine on this platform");
            return Ok(RecognitionAttempt::failed(
                &language_order[0],
                RecognitionErrorKind::Unavailable,
            ));
        }

        let mut session = RecognitionSession::new(language_order.to_vec());

        loop {
            let language = session.language().to_string();

            if self.config.speak_prompts {
                self.speak_prompt(&language).await;
            }

            match self.recognize_filtered(&language).await {
                Ok(result) => {
                    let meets_threshold = result.confidence >= self.config.confidence_threshold;
                    if meets_threshold || session.on_last() {
                        if !meets_threshold {
                            tracing::debug!(
                                %language,
                                confidence = result.confidence,
                                "forced acceptance on final language"
                            );
                        }
                        tracing::info!(
                            %language,
                            transcript = %result.transcript,
                            confidence = result.confidence,
                            "transcript accepted"
                        );
                        let attempt = RecognitionAttempt::accepted(
                            &language,
                            result.transcript,
                            result.confidence,
                        );
                        session.finish(attempt.clone());
                        return Ok(attempt);
                    }
                    tracing::debug!(
                        %language,
                        confidence = result.confidence,
                        "confidence below threshold, advancing"
                    );
                    session.advance();
                }
                Err(kind) => {
                    if session.on_last() {
                        tracing::warn!(%language, error = %kind, "cascade exhausted");
                        let attempt = RecognitionAttempt::failed(&language, kind);
                        session.finish(attempt.clone());
                        return Ok(attempt);
                    }
                    tracing::debug!(%language, error = %kind, "attempt failed, advancing");
                    session.advance();
                }
            }
        }
    }

    /// Stop the in-flight recognition attempt, if any
    pub async fn stop(&self) {
        self.engine.stop().await;
    }

    /// Recognize once per echo retry, discarding transcripts that are just
    /// the listening prompt picked up from the speaker
    async fn recognize_filtered(
        &self,
        language: &str,
    ) -> std::result::Result<RecognitionResult, RecognitionErrorKind> {
        let prompt = listening_prompt(language);

        for _ in 0..=MAX_ECHO_RETRIES {
            let result = self.recognize_once(language).await?;
            if result.transcript.trim().is_empty() {
                return Err(RecognitionErrorKind::NoSpeech);
            }
            if self.config.speak_prompts && is_prompt_echo(&result.transcript, prompt) {
                tracing::debug!(%language, "discarding prompt echo, listening again");
                continue;
            }
            return Ok(result);
        }

        // The microphone keeps feeding the prompt back; give up on this language
        Err(RecognitionErrorKind::NoSpeech)
    }

    async fn recognize_once(
        &self,
        language: &str,
    ) -> std::result::Result<RecognitionResult, RecognitionErrorKind> {
        let request = RecognitionRequest::single(language);
        match tokio::time::timeout(self.config.attempt_timeout, self.engine.recognize(request)).await
        {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(%language, "recognition attempt timed out");
                self.engine.stop().await;
                Err(RecognitionErrorKind::Other("attempt timed out".to_string()))
            }
        }
    }

    /// Cue the user in the attempt language and wait for the cue to finish
    /// before listening
    async fn speak_prompt(&self, language: &str) {
        let prompt = listening_prompt(language);
        match self
            .output
            .speak(UtteranceRequest::new(prompt).language(language))
            .await
        {
            Ok(handle) => {
                let _ = handle.finished().await;
            }
            Err(e) => tracing::warn!(error = %e, "failed to speak listening prompt"),
        }
    }
}

/// Listening cue spoken before each recognition attempt
#[must_use]
pub fn listening_prompt(language: &str) -> &'static str {
    if language.starts_with("zh") {
        "正在聆聽您嘅指令，請講嘢"
    } else {
        "I'm listening, please speak now."
    }
}

/// User-visible failure line for a terminal failure attempt
#[must_use]
pub fn failure_message(language: &str, error: &RecognitionErrorKind) -> &'static str {
    let chinese = language.starts_with("zh");
    match error {
        RecognitionErrorKind::Unavailable => {
            if chinese {
                "您嘅裝置唔支援語音識別，請改用文字輸入。"
            } else {
                "Speech recognition is not available on this device. Please type instead."
            }
        }
        _ => {
            if chinese {
                "唔好意思，我聽唔清楚，請再試一次。"
            } else {
                "Sorry, I didn't catch that. Please try again."
            }
        }
    }
}

/// Whether `transcript` is just the listening prompt coming back through
/// the microphone
fn is_prompt_echo(transcript: &str, prompt: &str) -> bool {
    let transcript = normalize_echo(transcript);
    let prompt = normalize_echo(prompt);
    if transcript.is_empty() || prompt.is_empty() {
        return false;
    }
    // Exact echo, or a tail fragment covering most of the prompt
    transcript == prompt
        || (prompt.contains(&transcript)
            && transcript.chars().count() * 2 >= prompt.chars().count())
}

fn normalize_echo(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_prompt_echo_is_detected() {
        let prompt = listening_prompt("zh-HK");
        assert!(is_prompt_echo(prompt, prompt));
        assert!(is_prompt_echo("正在聆聽您嘅指令 請講嘢", prompt));
    }

    #[test]
    fn partial_tail_echo_is_detected() {
        let prompt = listening_prompt("zh-HK");
        assert!(is_prompt_echo("聆聽您嘅指令請講嘢", prompt));
    }

    #[test]
    fn real_commands_are_not_echoes() {
        let prompt = listening_prompt("zh-HK");
        assert!(!is_prompt_echo("開啟用藥提醒", prompt));
        assert!(!is_prompt_echo("請講", prompt));
        assert!(!is_prompt_echo("", prompt));
    }

    #[test]
    fn session_index_is_monotonic_and_bounded() {
        let mut session =
            RecognitionSession::new(vec!["zh-HK".to_string(), "en-US".to_string()]);
        assert_eq!(session.current_index(), 0);
        assert!(!session.on_last());
        session.advance();
        assert_eq!(session.current_index(), 1);
        assert!(session.on_last());
        assert_eq!(session.language(), "en-US");
    }

    #[test]
    fn empty_transcript_is_not_a_success() {
        let attempt = RecognitionAttempt::accepted("zh-HK", "  ".to_string(), 0.9);
        assert!(!attempt.is_success());
        let attempt = RecognitionAttempt::accepted("zh-HK", "記錄血壓".to_string(), 0.9);
        assert!(attempt.is_success());
    }

    #[test]
    fn failure_attempt_converts_to_recognition_error() {
        let attempt = RecognitionAttempt::failed("en-US", RecognitionErrorKind::Network);
        assert!(matches!(
            attempt.into_result(),
            Err(Error::Recognition(RecognitionErrorKind::Network))
        ));

        let attempt = RecognitionAttempt::accepted("zh-HK", "食藥".to_string(), 0.8);
        assert_eq!(attempt.into_result().unwrap(), "食藥");
    }
}
