//! Client-side learning session.
//!
//! [`SessionController`] owns everything one learner sees during a session:
//! the topic being typed, the chosen difficulty, replies, the history log,
//! topic tags and the durable streak. State changes go through [`reduce`] so
//! they can be checked without any rendering surface.

mod controller;
mod prompt;
mod relay_client;
mod state;
mod tips;

pub use controller::{SessionController, SessionError, SubmitOutcome};
pub use prompt::{build_prompt, first_word};
pub use relay_client::{HttpRelayClient, RelayClient, RelayError};
pub use state::{reduce, SessionEvent, SessionState, SubmitFailure, Theme};
pub use tips::{tip_of_day, TIPS};
