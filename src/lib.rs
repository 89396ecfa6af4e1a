//! CareVoice - voice interaction core for a health companion assistant
//!
//! This library provides the voice layer shared by every screen of the
//! companion app:
//! - Single-flight audio output (one spoken response at a time, app-wide)
//! - Multi-language speech recognition cascade
//! - Keyword intent routing into a closed action vocabulary
//! - A listen→recognize→confirm voice session state machine
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                     Screens                          │
//! │  Dashboard │ Medication │ Health Data │ Contacts │ … │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │              VoiceSessionController                  │
//! │   Cascade  │  IntentRouter  │  AudioOutputManager   │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │           Platform speech services                   │
//! │   SynthesisEngine (TTS) │ RecognitionEngine (ASR)   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! Screens execute the actions the router produces (navigation, emergency)
//! and may voice replies through the output manager; rendering never
//! crosses into this crate.

pub mod assistant;
pub mod config;
pub mod engine;
pub mod error;
pub mod intent;
pub mod output;
pub mod recognition;
pub mod session;

pub use config::VoiceConfig;
pub use error::{Error, Result};
pub use intent::{Intent, IntentMatch, IntentRouter, IntentRule, ScreenId};
pub use output::{
    AudioOutputManager, PlaybackState, SpeakHandle, UtteranceOutcome, UtteranceRequest,
};
pub use recognition::{CascadeConfig, RecognitionAttempt, SpeechRecognitionCascade};
pub use session::{ListenOutcome, SessionState, VoiceSessionController};
