// src/speech.rs
use async_trait::async_trait;

pub const DEFAULT_LANGUAGE: &str = "en-US";

/// How a single capture session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    Transcript(String),
    Failed,
}

/// Speech-to-text capability. One call to [`SpeechRecognizer::capture`] is one
/// listening session and resolves exactly once.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    fn is_supported(&self) -> bool;

    async fn capture(&self, language: &str) -> CaptureOutcome;
}

/// Stand-in for platforms with no speech recognition at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedRecognizer;

#[async_trait]
impl SpeechRecognizer for UnsupportedRecognizer {
    fn is_supported(&self) -> bool {
        false
    }

    async fn capture(&self, _language: &str) -> CaptureOutcome {
        CaptureOutcome::Failed
    }
}
