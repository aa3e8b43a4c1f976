use crate::models::{Difficulty, Mode};

/// Frames a topic for the completion model.
pub fn build_prompt(topic: &str, mode: Mode, difficulty: Difficulty) -> String {
    match mode {
        Mode::Quiz => format!(
            "Generate 5 multiple choice questions with 4 options and correct answers on the topic: {} at a {} level.",
            topic, difficulty
        ),
        Mode::Flashcard => format!(
            "Convert the topic '{}' into 5 concise flashcards with a question and a brief answer on each at a {} level.",
            topic, difficulty
        ),
        Mode::Help => format!("{} (Explain at a {} level)", topic, difficulty),
    }
}

/// The tag a topic is filed under: its first whitespace-delimited word.
pub fn first_word(topic: &str) -> Option<&str> {
    topic.split_whitespace().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_prompt() {
        assert_eq!(
            build_prompt("Photosynthesis", Mode::Quiz, Difficulty::Beginner),
            "Generate 5 multiple choice questions with 4 options and correct answers on the topic: Photosynthesis at a Beginner level."
        );
    }

    #[test]
    fn test_flashcard_prompt() {
        assert_eq!(
            build_prompt("Cell division", Mode::Flashcard, Difficulty::Advanced),
            "Convert the topic 'Cell division' into 5 concise flashcards with a question and a brief answer on each at a Advanced level."
        );
    }

    #[test]
    fn test_help_prompt() {
        assert_eq!(
            build_prompt("Ohm's law", Mode::Help, Difficulty::Intermediate),
            "Ohm's law (Explain at a Intermediate level)"
        );
    }

    #[test]
    fn test_first_word() {
        assert_eq!(first_word("  Quantum   physics basics"), Some("Quantum"));
        assert_eq!(first_word("Rust"), Some("Rust"));
        assert_eq!(first_word("   "), None);
    }
}
