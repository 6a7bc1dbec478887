use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Highest table and highest multiplicand practised
pub const MAX_FACTOR: u32 = 12;

/// Question counts offered on the setup screen
pub const QUESTION_COUNTS: [u32; 4] = [5, 10, 15, 20];

/// Time limits offered on the setup screen, in seconds
pub const TIME_LIMITS: [u32; 4] = [60, 120, 180, 300];

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    /// three options, wrong ones far from the answer
    #[default]
    Easy,
    /// three options, wrong ones within a couple of the answer
    Medium,
    /// type the answer
    Hard,
}

impl Difficulty {
    pub fn is_multiple_choice(&self) -> bool {
        !matches!(self, Difficulty::Hard)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GameMode {
    /// fixed number of questions
    #[default]
    Questions,
    /// answer as many as possible before the clock runs out
    Time,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    pub tables: BTreeSet<u32>,
    pub difficulty: Difficulty,
    pub game_mode: GameMode,
    pub question_count: u32,
    /// seconds
    pub time_limit: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            tables: all_tables(),
            difficulty: Difficulty::Easy,
            game_mode: GameMode::Questions,
            question_count: 10,
            time_limit: 180,
        }
    }
}

impl GameSettings {
    /// Drop tables outside 0..=12 and put back the default for a zero
    /// question count or time limit
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();
        self.tables.retain(|t| *t <= MAX_FACTOR);
        if self.question_count == 0 {
            self.question_count = defaults.question_count;
        }
        if self.time_limit == 0 {
            self.time_limit = defaults.time_limit;
        }
        self
    }
}

pub fn all_tables() -> BTreeSet<u32> {
    (0..=MAX_FACTOR).collect()
}
