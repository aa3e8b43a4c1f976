// src/models/chat.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub message: String,
}

/// Whatever `/api/chat` answered. Exactly one of `reply` or `message` is set by the relay.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(format!("Unknown difficulty: {}", other)),
        }
    }
}

/// Which submit action produced a prompt. Help is what a plain submit does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Help,
    Quiz,
    Flashcard,
}

impl Mode {
    pub fn is_quiz(&self) -> bool {
        matches!(self, Mode::Quiz)
    }

    pub fn is_flashcard(&self) -> bool {
        matches!(self, Mode::Flashcard)
    }

    /// Heading shown above a reply produced in this mode.
    pub fn reply_heading(&self) -> &'static str {
        match self {
            Mode::Quiz => "🧠 Quiz Questions",
            Mode::Flashcard => "🎯 Flashcards",
            Mode::Help => "📘 AI Response",
        }
    }

    /// Label used for the answer line in the history log.
    pub fn history_label(&self) -> &'static str {
        match self {
            Mode::Quiz => "Quiz",
            Mode::Flashcard => "Flashcards",
            Mode::Help => "Answer",
        }
    }
}

/// One question/answer exchange, kept for the current session only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRecord {
    pub question: String,
    pub answer: String,
    pub is_quiz: bool,
    pub is_flashcard: bool,
    pub difficulty: Difficulty,
}

impl InteractionRecord {
    pub fn new(question: &str, answer: &str, mode: Mode, difficulty: Difficulty) -> Self {
        Self {
            question: question.to_string(),
            answer: answer.to_string(),
            is_quiz: mode.is_quiz(),
            is_flashcard: mode.is_flashcard(),
            difficulty,
        }
    }

    pub fn mode(&self) -> Mode {
        if self.is_quiz {
            Mode::Quiz
        } else if self.is_flashcard {
            Mode::Flashcard
        } else {
            Mode::Help
        }
    }
}
