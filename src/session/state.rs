use super::prompt::first_word;
use super::tips::tip_of_day;
use crate::models::{Difficulty, InteractionRecord, Mode, ProgressState};
use chrono::NaiveDate;

pub const NO_RESPONSE_MESSAGE: &str = "⚠️ No response received from AI.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Label of the control that switches away from this theme.
    pub fn toggle_label(&self) -> &'static str {
        match self {
            Theme::Light => "🌙 Dark Mode",
            Theme::Dark => "☀️ Light Mode",
        }
    }
}

/// Why a submit produced no reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitFailure {
    /// The relay answered but without a `reply`.
    NoReply,
    /// The relay could not be reached or its answer could not be read.
    Transport(String),
}

impl SubmitFailure {
    pub fn display_text(&self) -> String {
        match self {
            SubmitFailure::NoReply => NO_RESPONSE_MESSAGE.to_string(),
            SubmitFailure::Transport(error) => format!("⚠️ Error contacting AI: {}", error),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    TopicChanged(String),
    DifficultyChanged(Difficulty),
    ThemeToggled,
    SubmitStarted { mode: Mode },
    SubmitSucceeded {
        topic: String,
        reply: String,
        mode: Mode,
        difficulty: Difficulty,
    },
    SubmitFailed(SubmitFailure),
    CaptureStarted,
    CaptureResult(String),
    CaptureFailed,
    Bootstrapped {
        progress: ProgressState,
        today: NaiveDate,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    pub topic: String,
    pub mode: Mode,
    pub difficulty: Difficulty,
    /// Text in the reply panel: the last reply or a warning. `None` hides the panel.
    pub display: Option<String>,
    pub loading: bool,
    pub listening: bool,
    pub history: Vec<InteractionRecord>,
    /// First words of submitted topics, deduplicated, in the order first seen.
    pub topic_tags: Vec<String>,
    pub progress: ProgressState,
    pub theme: Theme,
    pub tip: Option<&'static str>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply_heading(&self) -> &'static str {
        self.mode.reply_heading()
    }

    pub fn streak_label(&self) -> String {
        let streak = self.progress.streak;
        format!("{} day{}", streak, if streak == 1 { "" } else { "s" })
    }
}

pub fn reduce(mut state: SessionState, event: SessionEvent) -> SessionState {
    match event {
        SessionEvent::TopicChanged(topic) => {
            state.topic = topic;
        }
        SessionEvent::DifficultyChanged(difficulty) => {
            state.difficulty = difficulty;
        }
        SessionEvent::ThemeToggled => {
            state.theme = state.theme.toggled();
        }
        SessionEvent::SubmitStarted { mode } => {
            state.mode = mode;
            state.loading = true;
            state.display = None;
        }
        SessionEvent::SubmitSucceeded {
            topic,
            reply,
            mode,
            difficulty,
        } => {
            state.loading = false;
            state
                .history
                .push(InteractionRecord::new(&topic, &reply, mode, difficulty));
            state.progress.interaction_count += 1;
            if let Some(tag) = first_word(&topic) {
                if !state.topic_tags.iter().any(|t| t == tag) {
                    state.topic_tags.push(tag.to_string());
                }
            }
            state.display = Some(reply);
        }
        SessionEvent::SubmitFailed(failure) => {
            state.loading = false;
            state.display = Some(failure.display_text());
        }
        SessionEvent::CaptureStarted => {
            state.listening = true;
        }
        SessionEvent::CaptureResult(transcript) => {
            state.topic = transcript;
            state.listening = false;
        }
        SessionEvent::CaptureFailed => {
            state.listening = false;
        }
        SessionEvent::Bootstrapped { progress, today } => {
            state.progress = progress;
            state.tip = Some(tip_of_day(today));
        }
    }
    state
}
