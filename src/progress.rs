use crate::error::StorageError;
use crate::game::{question_key, Difficulty, GameSettings};
use crate::storage::KeyValueStore;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const PROGRESS_KEY: &str = "multiplication-game-progress";
pub const SESSIONS_KEY: &str = "multiplication-game-sessions";
pub const SETTINGS_KEY: &str = "multiplication-game-settings";

/// Most recent sessions kept in history
pub const MAX_SESSIONS: usize = 50;

/// Running tally for one multiplier/multiplicand pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub multiplier: u32,
    pub multiplicand: u32,
    pub times_wrong: u32,
    pub times_correct: u32,
    pub last_attempt: DateTime<Utc>,
}

impl QuestionRecord {
    pub fn attempts(&self) -> u32 {
        self.times_wrong + self.times_correct
    }

    pub fn is_challenging(&self) -> bool {
        self.times_wrong > self.times_correct
    }

    /// Answered wrong at some point and right at some point
    pub fn has_improved(&self) -> bool {
        self.times_wrong > 0 && self.times_correct > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncorrectAnswer {
    pub multiplier: u32,
    pub multiplicand: u32,
    /// `None` when the typed answer was not a number
    pub user_answer: Option<i64>,
    pub correct_answer: u32,
}

/// Summary of one completed game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    pub date: DateTime<Utc>,
    pub score: u32,
    pub total: u32,
    pub difficulty: Difficulty,
    pub tables: Vec<u32>,
    pub incorrect_questions: Vec<IncorrectAnswer>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalStats {
    pub total_games: usize,
    pub total_correct: u64,
    pub total_questions: u64,
}

pub type Progress = BTreeMap<String, QuestionRecord>;

/// Per-pair statistics, session history and last-used settings on top of a
/// key-value store.
///
/// Storage failures never reach the caller: reads degrade to empty state and
/// writes are logged and dropped.
#[derive(Debug)]
pub struct ProgressStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ProgressStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn get_progress(&self) -> Progress {
        self.read_json(PROGRESS_KEY)
    }

    pub fn record_answer(&self, multiplier: u32, multiplicand: u32, correct: bool) {
        self.record_answer_at(multiplier, multiplicand, correct, Utc::now())
    }

    pub fn record_answer_at(
        &self,
        multiplier: u32,
        multiplicand: u32,
        correct: bool,
        at: DateTime<Utc>,
    ) {
        let mut progress = self.get_progress();
        let record = progress
            .entry(question_key(multiplier, multiplicand))
            .or_insert_with(|| QuestionRecord {
                multiplier,
                multiplicand,
                times_wrong: 0,
                times_correct: 0,
                last_attempt: at,
            });

        if correct {
            record.times_correct += 1;
        } else {
            record.times_wrong += 1;
        }
        record.last_attempt = at;

        if let Err(e) = self.write_json(PROGRESS_KEY, &progress) {
            tracing::warn!(error = %e, "failed to save progress");
        }
    }

    /// Pairs answered wrong more often than right, worst first; ties in
    /// table order
    pub fn challenging_questions(&self) -> Vec<QuestionRecord> {
        let mut records: Vec<QuestionRecord> = self
            .get_progress()
            .into_values()
            .filter(QuestionRecord::is_challenging)
            .collect();
        records.sort_by_key(|r| {
            (
                std::cmp::Reverse(r.times_wrong - r.times_correct),
                r.multiplier,
                r.multiplicand,
            )
        });
        records
    }

    /// Records for the given pairs that have been both missed and answered correctly
    pub fn improved_questions(&self, incorrect_this_session: &[IncorrectAnswer]) -> Vec<QuestionRecord> {
        let progress = self.get_progress();
        incorrect_this_session
            .iter()
            .filter_map(|q| progress.get(&question_key(q.multiplier, q.multiplicand)))
            .filter(|r| r.has_improved())
            .cloned()
            .collect()
    }

    pub fn get_sessions(&self) -> Vec<GameSession> {
        self.read_json(SESSIONS_KEY)
    }

    pub fn save_session(&self, session: GameSession) {
        let mut sessions = self.get_sessions();
        sessions.push(session);
        if sessions.len() > MAX_SESSIONS {
            let excess = sessions.len() - MAX_SESSIONS;
            sessions.drain(..excess);
        }

        match self.write_json(SESSIONS_KEY, &sessions) {
            Ok(()) => tracing::debug!(sessions = sessions.len(), "saved session"),
            Err(e) => tracing::warn!(error = %e, "failed to save session"),
        }
    }

    pub fn get_total_stats(&self) -> TotalStats {
        self.get_sessions()
            .iter()
            .fold(TotalStats::default(), |mut acc, s| {
                acc.total_games += 1;
                acc.total_correct += u64::from(s.score);
                acc.total_questions += u64::from(s.total);
                acc
            })
    }

    pub fn saved_settings(&self) -> GameSettings {
        let settings: GameSettings = self.read_json(SETTINGS_KEY);
        let settings = settings.normalized();
        if settings.tables.is_empty() {
            return GameSettings::default();
        }
        settings
    }

    pub fn save_settings(&self, settings: &GameSettings) {
        if let Err(e) = self.write_json(SETTINGS_KEY, settings) {
            tracing::warn!(error = %e, "failed to save settings");
        }
    }

    /// Forget all progress, history and saved settings
    pub fn reset(&self) -> Result<(), StorageError> {
        for key in [PROGRESS_KEY, SESSIONS_KEY, SETTINGS_KEY] {
            self.store.remove(key)?;
        }
        Ok(())
    }

    fn read_json<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.store.get(key) {
            Ok(Some(data)) => serde_json::from_str(&data).unwrap_or_else(|e| {
                tracing::warn!(key, error = %e, "ignoring corrupt stored value");
                T::default()
            }),
            Ok(None) => T::default(),
            Err(e) => {
                tracing::warn!(key, error = %e, "storage unavailable");
                T::default()
            }
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let data = serde_json::to_string(value).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key, &data)
    }
}
