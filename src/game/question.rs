use super::settings::MAX_FACTOR;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Question {
    pub multiplier: u32,
    pub multiplicand: u32,
    pub answer: u32,
}

impl Question {
    pub fn new(multiplier: u32, multiplicand: u32) -> Self {
        Self {
            multiplier,
            multiplicand,
            answer: multiplier * multiplicand,
        }
    }

    pub fn key(&self) -> String {
        question_key(self.multiplier, self.multiplicand)
    }

    pub fn is_correct(&self, answer: Option<i64>) -> bool {
        answer == Some(i64::from(self.answer))
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} × {}", self.multiplier, self.multiplicand)
    }
}

/// Canonical pair key used to index progress records, e.g. `7x8`
pub fn question_key(multiplier: u32, multiplicand: u32) -> String {
    format!("{multiplier}x{multiplicand}")
}

/// Build `count` questions from the selected tables.
///
/// The pool is every table paired with 0..=12. It is shuffled and drawn from
/// the front; once exhausted it is reshuffled and drawing continues, so pairs
/// repeat only after the whole pool has been used. A repeat may land right
/// after a reshuffle boundary.
pub fn generate_questions<R: Rng + ?Sized>(
    tables: &[u32],
    count: usize,
    rng: &mut R,
) -> Vec<Question> {
    let mut pool: Vec<Question> = tables
        .iter()
        .flat_map(|&table| (0..=MAX_FACTOR).map(move |i| Question::new(table, i)))
        .collect();

    if pool.is_empty() {
        return Vec::new();
    }

    let mut questions = Vec::with_capacity(count);
    while questions.len() < count {
        pool.shuffle(rng);
        let remaining = count - questions.len();
        questions.extend(pool.iter().take(remaining).copied());
    }

    tracing::debug!(
        tables = tables.len(),
        pool = pool.len(),
        count,
        "generated questions"
    );
    questions
}
