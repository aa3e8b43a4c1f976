// src/progress.rs
//
// Durable learning progress: interaction count, daily streak and the last day
// the learner showed up. Stored as three string keys so the file reads the
// same as the browser's local storage entries.

use crate::models::ProgressState;
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

pub const PROGRESS_KEY: &str = "aiLearnMateProgress";
pub const LAST_DATE_KEY: &str = "aiLearnMateLastDate";
pub const STREAK_KEY: &str = "aiLearnMateStreak";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Streak lengths that earn a celebration.
pub const CELEBRATION_STREAKS: [u32; 3] = [3, 5, 10];

#[derive(Error, Debug)]
pub enum ProgressError {
    #[error("Failed to access progress file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Progress file is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub trait ProgressStore: Send + Sync {
    fn load(&self) -> Result<ProgressState, ProgressError>;
    fn save(&self, state: &ProgressState) -> Result<(), ProgressError>;
}

/// Result of the once-per-startup streak computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bootstrap {
    pub progress: ProgressState,
    pub celebrate: bool,
}

/// Rolls the stored streak forward to `today`.
///
/// Same day keeps the streak, the day after extends it by one, anything else
/// (a gap, a date in the future, or no record at all) starts over at 1.
pub fn bootstrap(stored: ProgressState, today: NaiveDate) -> Bootstrap {
    let streak = match stored.last_active_date {
        Some(last) if last == today => stored.streak.max(1),
        Some(last) if today.checked_sub_signed(Duration::days(1)) == Some(last) => {
            stored.streak.saturating_add(1)
        }
        _ => 1,
    };

    Bootstrap {
        progress: ProgressState {
            interaction_count: stored.interaction_count,
            streak,
            last_active_date: Some(today),
        },
        celebrate: CELEBRATION_STREAKS.contains(&streak),
    }
}

fn to_entries(state: &ProgressState) -> BTreeMap<String, String> {
    let mut entries = BTreeMap::new();
    entries.insert(PROGRESS_KEY.to_string(), state.interaction_count.to_string());
    entries.insert(STREAK_KEY.to_string(), state.streak.to_string());
    if let Some(date) = state.last_active_date {
        entries.insert(LAST_DATE_KEY.to_string(), date.format(DATE_FORMAT).to_string());
    }
    entries
}

// Unparseable values fall back to defaults rather than failing the load.
// A missing or broken streak reads as 0, so a visit the day after still starts at 1.
fn from_entries(entries: &BTreeMap<String, String>) -> ProgressState {
    if entries.is_empty() {
        return ProgressState::default();
    }
    ProgressState {
        interaction_count: entries
            .get(PROGRESS_KEY)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0),
        streak: entries
            .get(STREAK_KEY)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0),
        last_active_date: entries
            .get(LAST_DATE_KEY)
            .and_then(|v| NaiveDate::parse_from_str(v.trim(), DATE_FORMAT).ok()),
    }
}

/// Keeps progress in a small JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileProgressStore {
    path: PathBuf,
}

impl JsonFileProgressStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> ProgressError {
        ProgressError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ProgressStore for JsonFileProgressStore {
    fn load(&self) -> Result<ProgressState, ProgressError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No progress file at {}, starting fresh", self.path.display());
                return Ok(ProgressState::default());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let entries: BTreeMap<String, String> = serde_json::from_str(&raw)?;
        Ok(from_entries(&entries))
    }

    fn save(&self, state: &ProgressState) -> Result<(), ProgressError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_string_pretty(&to_entries(state))?;
        std::fs::write(&self.path, json).map_err(|e| self.io_error(e))?;
        tracing::debug!(
            interaction_count = state.interaction_count,
            streak = state.streak,
            "Saved progress to {}",
            self.path.display()
        );
        Ok(())
    }
}

/// Process-local store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryProgressStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: ProgressState) -> Self {
        Self {
            entries: Mutex::new(to_entries(&state)),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }
}

impl ProgressStore for MemoryProgressStore {
    fn load(&self) -> Result<ProgressState, ProgressError> {
        let entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(from_entries(&entries))
    }

    fn save(&self, state: &ProgressState) -> Result<(), ProgressError> {
        let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *entries = to_entries(state);
        Ok(())
    }
}
