//! Voice core configuration
//!
//! `VoiceConfig` is the resolved configuration; `VoiceConfigFile` is a
//! partial TOML overlay on top of defaults. Loading is lenient: a missing
//! or malformed file logs a warning and the defaults stand.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::recognition::CascadeConfig;

/// Default delay between cancelling an utterance and starting the next one
const DEFAULT_SETTLE_DELAY_MS: u64 = 100;

/// Default cascade confidence acceptance threshold
const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Default bound on a single recognition attempt
const DEFAULT_ATTEMPT_TIMEOUT_SECS: u64 = 8;

/// Resolved voice configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Candidate recognition languages, tried in order (BCP-47)
    pub language_order: Vec<String>,

    /// Default speech rate for prompts and replies
    pub rate: f32,

    /// Default speech volume
    pub volume: f32,

    /// Minimum confidence to accept a transcript before the last language
    pub confidence_threshold: f32,

    /// Delay between cancelling the previous utterance and starting a new
    /// one, for platforms where cancellation is not synchronous
    pub settle_delay: Duration,

    /// Bound on a single recognition attempt
    pub attempt_timeout: Duration,

    /// Speak a listening prompt before each recognition attempt
    pub speak_prompts: bool,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            language_order: vec![
                "zh-HK".to_string(),
                "zh-CN".to_string(),
                "en-US".to_string(),
            ],
            rate: 0.8,
            volume: 0.8,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            settle_delay: Duration::from_millis(DEFAULT_SETTLE_DELAY_MS),
            attempt_timeout: Duration::from_secs(DEFAULT_ATTEMPT_TIMEOUT_SECS),
            speak_prompts: true,
        }
    }
}

impl VoiceConfig {
    /// Load configuration with the TOML overlay at `path` applied on top of
    /// defaults
    #[must_use]
    pub fn load(path: &Path) -> Self {
        Self::default().overlaid(load_config_file(path))
    }

    /// Apply a partial overlay, clamping numeric fields into their
    /// documented ranges
    #[must_use]
    pub fn overlaid(mut self, file: VoiceConfigFile) -> Self {
        if let Some(languages) = file.languages
            && !languages.is_empty()
        {
            self.language_order = languages;
        }
        if let Some(rate) = file.rate {
            self.rate = clamped("rate", rate, 0.5, 1.5);
        }
        if let Some(volume) = file.volume {
            self.volume = clamped("volume", volume, 0.0, 1.0);
        }
        if let Some(threshold) = file.confidence_threshold {
            self.confidence_threshold = clamped("confidence_threshold", threshold, 0.0, 1.0);
        }
        if let Some(ms) = file.settle_delay_ms {
            self.settle_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = file.attempt_timeout_secs {
            self.attempt_timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(speak_prompts) = file.speak_prompts {
            self.speak_prompts = speak_prompts;
        }
        self
    }

    /// Cascade tunables derived from this configuration
    #[must_use]
    pub fn cascade(&self) -> CascadeConfig {
        CascadeConfig {
            confidence_threshold: self.confidence_threshold,
            attempt_timeout: self.attempt_timeout,
            speak_prompts: self.speak_prompts,
        }
    }
}

/// Partial TOML overlay schema; every field is optional
#[derive(Debug, Default, Deserialize)]
pub struct VoiceConfigFile {
    /// Candidate languages in preference order
    pub languages: Option<Vec<String>>,

    /// Speech rate (0.5–1.5)
    pub rate: Option<f32>,

    /// Speech volume (0.0–1.0)
    pub volume: Option<f32>,

    /// Cascade acceptance threshold (0.0–1.0)
    pub confidence_threshold: Option<f32>,

    /// Settle delay in milliseconds
    pub settle_delay_ms: Option<u64>,

    /// Per-attempt recognition timeout in seconds
    pub attempt_timeout_secs: Option<u64>,

    /// Speak a listening prompt before each attempt
    pub speak_prompts: Option<bool>,
}

/// Load the overlay file from `path`
///
/// Returns `VoiceConfigFile::default()` if the file doesn't exist or can't
/// be parsed.
#[must_use]
pub fn load_config_file(path: &Path) -> VoiceConfigFile {
    if !path.exists() {
        return VoiceConfigFile::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                VoiceConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            VoiceConfigFile::default()
        }
    }
}

fn clamped(field: &str, value: f32, min: f32, max: f32) -> f32 {
    let clamped = value.clamp(min, max);
    if (clamped - value).abs() > f32::EPSILON {
        tracing::debug!(field, value, clamped, "config value out of range, clamped");
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_clamps_out_of_range_values() {
        let file = VoiceConfigFile {
            rate: Some(9.0),
            volume: Some(-1.0),
            confidence_threshold: Some(2.0),
            ..VoiceConfigFile::default()
        };
        let config = VoiceConfig::default().overlaid(file);
        assert!((config.rate - 1.5).abs() < f32::EPSILON);
        assert!(config.volume.abs() < f32::EPSILON);
        assert!((config.confidence_threshold - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn empty_language_list_keeps_defaults() {
        let file = VoiceConfigFile {
            languages: Some(Vec::new()),
            ..VoiceConfigFile::default()
        };
        let config = VoiceConfig::default().overlaid(file);
        assert_eq!(config.language_order.first().map(String::as_str), Some("zh-HK"));
    }

    #[test]
    fn overlay_parses_from_toml() {
        let file: VoiceConfigFile = toml::from_str(
            r#"
            languages = ["en-US"]
            confidence_threshold = 0.7
            settle_delay_ms = 0
            "#,
        )
        .unwrap();
        let config = VoiceConfig::default().overlaid(file);
        assert_eq!(config.language_order, vec!["en-US".to_string()]);
        assert!((config.confidence_threshold - 0.7).abs() < f32::EPSILON);
        assert!(config.settle_delay.is_zero());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let file = load_config_file(Path::new("/nonexistent/carevoice.toml"));
        assert!(file.languages.is_none());
    }
}
