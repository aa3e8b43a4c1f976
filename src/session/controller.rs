use super::prompt::build_prompt;
use super::relay_client::RelayClient;
use super::state::{reduce, SessionEvent, SessionState, SubmitFailure};
use crate::export::{
    DocumentExporter, ExportError, TextDocument, README_FILE_NAME, RESPONSE_FILE_NAME,
};
use crate::models::{ChatRequest, Difficulty, Mode};
use crate::progress::{self, Bootstrap, ProgressStore};
use crate::speech::{CaptureOutcome, SpeechRecognizer, DEFAULT_LANGUAGE};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Please enter a topic or question first.")]
    EmptyTopic,
    #[error("A request is already in progress.")]
    Busy,
    #[error("Speech recognition is not supported on this device.")]
    SpeechUnsupported,
    #[error("Already listening.")]
    AlreadyListening,
    #[error("There is no reply to export yet.")]
    NothingToExport,
    #[error(transparent)]
    Export(#[from] ExportError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Replied(String),
    Failed(SubmitFailure),
}

/// Clears `loading` when dropped, so a submit abandoned mid-call does not
/// leave the session stuck.
struct InFlight<'a>(&'a mut SessionState);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.loading = false;
    }
}

pub struct SessionController {
    state: SessionState,
    relay: Arc<dyn RelayClient>,
    progress_store: Arc<dyn ProgressStore>,
    recognizer: Arc<dyn SpeechRecognizer>,
    exporter: Arc<dyn DocumentExporter>,
}

impl SessionController {
    pub fn new(
        relay: Arc<dyn RelayClient>,
        progress_store: Arc<dyn ProgressStore>,
        recognizer: Arc<dyn SpeechRecognizer>,
        exporter: Arc<dyn DocumentExporter>,
    ) -> Self {
        Self {
            state: SessionState::new(),
            relay,
            progress_store,
            recognizer,
            exporter,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    fn apply(&mut self, event: SessionEvent) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, event);
    }

    fn persist_progress(&self) {
        if let Err(e) = self.progress_store.save(&self.state.progress) {
            tracing::warn!("Failed to save progress: {}", e);
        }
    }

    /// Loads stored progress, rolls the streak forward to `today` and writes it back.
    pub fn bootstrap(&mut self, today: NaiveDate) -> Bootstrap {
        let stored = self.progress_store.load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load progress, starting fresh: {}", e);
            Default::default()
        });

        let result = progress::bootstrap(stored, today);
        self.apply(SessionEvent::Bootstrapped {
            progress: result.progress,
            today,
        });
        self.persist_progress();

        tracing::info!(
            streak = result.progress.streak,
            interactions = result.progress.interaction_count,
            "Session bootstrapped"
        );
        if result.celebrate {
            tracing::info!("🎉 {}-day learning streak!", result.progress.streak);
        }
        result
    }

    pub fn set_topic(&mut self, topic: impl Into<String>) {
        self.apply(SessionEvent::TopicChanged(topic.into()));
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.apply(SessionEvent::DifficultyChanged(difficulty));
    }

    pub fn toggle_theme(&mut self) {
        self.apply(SessionEvent::ThemeToggled);
    }

    /// Sends one topic to the relay in the given mode and records the outcome.
    pub async fn submit(
        &mut self,
        topic: &str,
        mode: Mode,
        difficulty: Difficulty,
    ) -> Result<SubmitOutcome, SessionError> {
        if self.state.loading {
            return Err(SessionError::Busy);
        }
        if topic.trim().is_empty() {
            return Err(SessionError::EmptyTopic);
        }

        let prompt = build_prompt(topic, mode, difficulty);
        self.apply(SessionEvent::SubmitStarted { mode });
        tracing::debug!(?mode, %difficulty, "Submitting prompt: {}", prompt);

        let relay = Arc::clone(&self.relay);
        let in_flight = InFlight(&mut self.state);
        let response = relay.send(&ChatRequest { message: prompt }).await;
        drop(in_flight);

        let outcome = match response {
            Ok(response) => match response.reply {
                Some(reply) => SubmitOutcome::Replied(reply),
                None => {
                    tracing::warn!(
                        message = ?response.message,
                        error = ?response.error,
                        "Relay returned no reply"
                    );
                    SubmitOutcome::Failed(SubmitFailure::NoReply)
                }
            },
            Err(e) => {
                tracing::error!("Error contacting relay: {}", e);
                SubmitOutcome::Failed(SubmitFailure::Transport(e.to_string()))
            }
        };

        match &outcome {
            SubmitOutcome::Replied(reply) => {
                self.apply(SessionEvent::SubmitSucceeded {
                    topic: topic.to_string(),
                    reply: reply.clone(),
                    mode,
                    difficulty,
                });
                self.persist_progress();
            }
            SubmitOutcome::Failed(failure) => {
                self.apply(SessionEvent::SubmitFailed(failure.clone()));
            }
        }

        Ok(outcome)
    }

    /// Runs one listening session. On a transcript the topic is replaced.
    pub async fn start_voice_capture(&mut self) -> Result<CaptureOutcome, SessionError> {
        if !self.recognizer.is_supported() {
            return Err(SessionError::SpeechUnsupported);
        }
        if self.state.listening {
            return Err(SessionError::AlreadyListening);
        }

        self.apply(SessionEvent::CaptureStarted);
        let outcome = self.recognizer.capture(DEFAULT_LANGUAGE).await;
        match &outcome {
            CaptureOutcome::Transcript(text) => {
                self.apply(SessionEvent::CaptureResult(text.clone()));
            }
            CaptureOutcome::Failed => {
                tracing::debug!("Speech capture ended without a result");
                self.apply(SessionEvent::CaptureFailed);
            }
        }
        Ok(outcome)
    }

    pub fn export_pdf(&self, text: &str) -> Result<PathBuf, SessionError> {
        Ok(self
            .exporter
            .export(&TextDocument::response(text), RESPONSE_FILE_NAME)?)
    }

    /// Exports whatever is currently in the reply panel.
    pub fn export_reply(&self) -> Result<PathBuf, SessionError> {
        match self.state.display.as_deref() {
            Some(text) if !text.is_empty() => self.export_pdf(text),
            _ => Err(SessionError::NothingToExport),
        }
    }

    pub fn export_readme(&self) -> Result<PathBuf, SessionError> {
        Ok(self.exporter.export(&TextDocument::readme(), README_FILE_NAME)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChatResponse, ProgressState};
    use crate::progress::MemoryProgressStore;
    use crate::session::RelayError;
    use crate::speech::UnsupportedRecognizer;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FakeRelay {
        replies: Mutex<Vec<Result<ChatResponse, RelayError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeRelay {
        fn new(replies: Vec<Result<ChatResponse, RelayError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn reply(text: &str) -> Result<ChatResponse, RelayError> {
            Ok(ChatResponse {
                reply: Some(text.to_string()),
                ..Default::default()
            })
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RelayClient for FakeRelay {
        async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, RelayError> {
            self.prompts.lock().unwrap().push(request.message.clone());
            self.replies.lock().unwrap().remove(0)
        }
    }

    struct ScriptedRecognizer(CaptureOutcome);

    #[async_trait]
    impl SpeechRecognizer for ScriptedRecognizer {
        fn is_supported(&self) -> bool {
            true
        }

        async fn capture(&self, language: &str) -> CaptureOutcome {
            assert_eq!(language, "en-US");
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct RecordingExporter {
        exported: Mutex<Vec<(TextDocument, String)>>,
    }

    impl DocumentExporter for RecordingExporter {
        fn export(&self, document: &TextDocument, file_name: &str) -> Result<PathBuf, ExportError> {
            self.exported
                .lock()
                .unwrap()
                .push((document.clone(), file_name.to_string()));
            Ok(Path::new("/tmp").join(file_name))
        }
    }

    fn controller_with(
        relay: Arc<FakeRelay>,
        store: Arc<MemoryProgressStore>,
        recognizer: Arc<dyn SpeechRecognizer>,
    ) -> (SessionController, Arc<RecordingExporter>) {
        let exporter = Arc::new(RecordingExporter::default());
        let controller = SessionController::new(relay, store, recognizer, exporter.clone());
        (controller, exporter)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[tokio::test]
    async fn test_quiz_submit_sends_quiz_prompt() {
        let relay = FakeRelay::new(vec![FakeRelay::reply("1. What is...")]);
        let (mut controller, _) = controller_with(
            relay.clone(),
            Arc::new(MemoryProgressStore::new()),
            Arc::new(UnsupportedRecognizer),
        );

        let outcome = controller
            .submit("Photosynthesis", Mode::Quiz, Difficulty::Beginner)
            .await
            .unwrap();

        assert_eq!(outcome, SubmitOutcome::Replied("1. What is...".to_string()));
        assert_eq!(
            relay.prompts(),
            vec!["Generate 5 multiple choice questions with 4 options and correct answers on the topic: Photosynthesis at a Beginner level."]
        );
        let record = &controller.state().history[0];
        assert!(record.is_quiz);
        assert!(!record.is_flashcard);
        assert_eq!(record.question, "Photosynthesis");
    }

    #[tokio::test]
    async fn test_same_topic_twice_dedupes_tag() {
        let relay = FakeRelay::new(vec![FakeRelay::reply("first"), FakeRelay::reply("second")]);
        let store = Arc::new(MemoryProgressStore::new());
        let (mut controller, _) =
            controller_with(relay, store.clone(), Arc::new(UnsupportedRecognizer));

        for _ in 0..2 {
            controller
                .submit("Photosynthesis in plants", Mode::Help, Difficulty::Beginner)
                .await
                .unwrap();
        }

        let state = controller.state();
        assert_eq!(state.history.len(), 2);
        assert_eq!(state.progress.interaction_count, 2);
        assert_eq!(state.topic_tags, vec!["Photosynthesis"]);
        assert_eq!(state.display.as_deref(), Some("second"));
        assert_eq!(store.load().unwrap().interaction_count, 2);
    }

    #[tokio::test]
    async fn test_missing_reply_shows_warning() {
        let relay = FakeRelay::new(vec![Ok(ChatResponse {
            message: Some("Invalid response from Groq".to_string()),
            ..Default::default()
        })]);
        let store = Arc::new(MemoryProgressStore::new());
        let (mut controller, _) =
            controller_with(relay, store.clone(), Arc::new(UnsupportedRecognizer));

        let outcome = controller
            .submit("Gravity", Mode::Flashcard, Difficulty::Advanced)
            .await
            .unwrap();

        assert_eq!(outcome, SubmitOutcome::Failed(SubmitFailure::NoReply));
        let state = controller.state();
        assert!(!state.loading);
        assert!(state.history.is_empty());
        assert!(state.topic_tags.is_empty());
        assert_eq!(state.progress.interaction_count, 0);
        assert_eq!(state.display.as_deref(), Some("⚠️ No response received from AI."));
        assert_eq!(store.get(crate::progress::PROGRESS_KEY), None);
    }

    #[tokio::test]
    async fn test_transport_failure_shows_error() {
        let decode_error = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let expected = format!("⚠️ Error contacting AI: {}", decode_error);
        let relay = FakeRelay::new(vec![Err(RelayError::Decode(decode_error))]);
        let (mut controller, _) = controller_with(
            relay,
            Arc::new(MemoryProgressStore::new()),
            Arc::new(UnsupportedRecognizer),
        );

        let outcome = controller
            .submit("Gravity", Mode::Help, Difficulty::Beginner)
            .await
            .unwrap();

        assert!(matches!(outcome, SubmitOutcome::Failed(SubmitFailure::Transport(_))));
        assert_eq!(controller.state().display.as_deref(), Some(expected.as_str()));
        assert!(controller.state().history.is_empty());
    }

    #[tokio::test]
    async fn test_empty_topic_is_rejected_without_calling_relay() {
        let relay = FakeRelay::new(vec![]);
        let (mut controller, _) = controller_with(
            relay.clone(),
            Arc::new(MemoryProgressStore::new()),
            Arc::new(UnsupportedRecognizer),
        );

        let err = controller
            .submit("   ", Mode::Help, Difficulty::Beginner)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::EmptyTopic));
        assert!(relay.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_submit_while_loading_is_busy() {
        let relay = FakeRelay::new(vec![]);
        let (mut controller, _) = controller_with(
            relay.clone(),
            Arc::new(MemoryProgressStore::new()),
            Arc::new(UnsupportedRecognizer),
        );
        controller.apply(SessionEvent::SubmitStarted { mode: Mode::Help });

        let err = controller
            .submit("Gravity", Mode::Quiz, Difficulty::Beginner)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Busy));
        assert!(relay.prompts().is_empty());
        assert_eq!(controller.state().mode, Mode::Help);
    }

    /// Never answers the first call; answers "late" afterwards.
    struct StallingRelay {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RelayClient for StallingRelay {
        async fn send(&self, _request: &ChatRequest) -> Result<ChatResponse, RelayError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                std::future::pending::<()>().await;
            }
            Ok(ChatResponse {
                reply: Some("late".to_string()),
                ..Default::default()
            })
        }
    }

    #[tokio::test]
    async fn test_abandoned_submit_does_not_leave_session_busy() {
        let relay = Arc::new(StallingRelay {
            calls: AtomicUsize::new(0),
        });
        let mut controller = SessionController::new(
            relay,
            Arc::new(MemoryProgressStore::new()),
            Arc::new(UnsupportedRecognizer),
            Arc::new(RecordingExporter::default()),
        );

        let abandoned = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            controller.submit("Gravity", Mode::Help, Difficulty::Beginner),
        )
        .await;
        assert!(abandoned.is_err());
        assert!(!controller.state().loading);

        let outcome = controller
            .submit("Gravity", Mode::Help, Difficulty::Beginner)
            .await
            .unwrap();
        assert_eq!(outcome, SubmitOutcome::Replied("late".to_string()));
        assert_eq!(controller.state().history.len(), 1);
    }

    #[tokio::test]
    async fn test_voice_capture_unsupported_changes_nothing() {
        let (mut controller, _) = controller_with(
            FakeRelay::new(vec![]),
            Arc::new(MemoryProgressStore::new()),
            Arc::new(UnsupportedRecognizer),
        );
        controller.set_topic("typed topic");

        let err = controller.start_voice_capture().await.unwrap_err();

        assert!(matches!(err, SessionError::SpeechUnsupported));
        assert_eq!(controller.state().topic, "typed topic");
        assert!(!controller.state().listening);
    }

    #[tokio::test]
    async fn test_voice_capture_sets_topic() {
        let (mut controller, _) = controller_with(
            FakeRelay::new(vec![]),
            Arc::new(MemoryProgressStore::new()),
            Arc::new(ScriptedRecognizer(CaptureOutcome::Transcript("Volcanoes".to_string()))),
        );

        let outcome = controller.start_voice_capture().await.unwrap();

        assert_eq!(outcome, CaptureOutcome::Transcript("Volcanoes".to_string()));
        assert_eq!(controller.state().topic, "Volcanoes");
        assert!(!controller.state().listening);
    }

    #[tokio::test]
    async fn test_voice_capture_failure_keeps_topic() {
        let (mut controller, _) = controller_with(
            FakeRelay::new(vec![]),
            Arc::new(MemoryProgressStore::new()),
            Arc::new(ScriptedRecognizer(CaptureOutcome::Failed)),
        );
        controller.set_topic("kept");

        let outcome = controller.start_voice_capture().await.unwrap();

        assert_eq!(outcome, CaptureOutcome::Failed);
        assert_eq!(controller.state().topic, "kept");
        assert!(!controller.state().listening);
    }

    #[test]
    fn test_bootstrap_persists_fresh_streak() {
        let yesterday = today().pred_opt().unwrap();
        let store = Arc::new(MemoryProgressStore::with_state(ProgressState {
            interaction_count: 4,
            streak: 2,
            last_active_date: Some(yesterday),
        }));
        let (mut controller, _) =
            controller_with(FakeRelay::new(vec![]), store.clone(), Arc::new(UnsupportedRecognizer));

        let result = controller.bootstrap(today());

        assert_eq!(result.progress.streak, 3);
        assert!(result.celebrate);
        assert_eq!(controller.state().progress.streak, 3);
        assert_eq!(controller.state().progress.interaction_count, 4);
        assert!(controller.state().tip.is_some());

        let saved = store.load().unwrap();
        assert_eq!(saved.streak, 3);
        assert_eq!(saved.last_active_date, Some(today()));
    }

    #[test]
    fn test_exports() {
        let (mut controller, exporter) = controller_with(
            FakeRelay::new(vec![]),
            Arc::new(MemoryProgressStore::new()),
            Arc::new(UnsupportedRecognizer),
        );

        assert!(matches!(controller.export_reply(), Err(SessionError::NothingToExport)));

        controller.apply(SessionEvent::SubmitFailed(SubmitFailure::NoReply));
        let path = controller.export_reply().unwrap();
        assert_eq!(path, Path::new("/tmp").join(RESPONSE_FILE_NAME));

        controller.export_readme().unwrap();

        let exported = exporter.exported.lock().unwrap();
        assert_eq!(exported.len(), 2);
        assert_eq!(exported[0].0.title.as_deref(), Some("AI LearnMate - AI Response"));
        assert_eq!(exported[1].1, README_FILE_NAME);
    }
}
