// src/models/progress.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Learning progress that survives between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    pub interaction_count: u64,
    pub streak: u32,
    pub last_active_date: Option<NaiveDate>,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            interaction_count: 0,
            streak: 1,
            last_active_date: None,
        }
    }
}
