//! Shared test fixtures
//!
//! Builds voice components over the scripted engines so tests run without
//! audio hardware.

use std::sync::Arc;
use std::time::Duration;

use carevoice::engine::mock::MockSynthesisEngine;
use carevoice::{AudioOutputManager, CascadeConfig};

/// Output manager over a mock synthesis engine with no settle delay
pub fn test_output() -> (Arc<MockSynthesisEngine>, Arc<AudioOutputManager>) {
    let engine = Arc::new(MockSynthesisEngine::new());
    let output = Arc::new(AudioOutputManager::with_settle_delay(
        engine.clone(),
        Duration::ZERO,
    ));
    (engine, output)
}

/// Cascade tunables with prompts disabled, for tests that only care about
/// recognition flow
pub fn quiet_config() -> CascadeConfig {
    CascadeConfig {
        confidence_threshold: 0.5,
        attempt_timeout: Duration::from_secs(5),
        speak_prompts: false,
    }
}

/// Language order from literal tags
pub fn langs(tags: &[&str]) -> Vec<String> {
    tags.iter().map(|t| (*t).to_string()).collect()
}
