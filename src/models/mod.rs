// src/models/mod.rs
pub mod chat;
pub mod progress;

pub use chat::{ChatRequest, ChatResponse, Difficulty, InteractionRecord, Mode};
pub use progress::ProgressState;
