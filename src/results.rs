use crate::game::{question_key, score_message};
use crate::progress::{Progress, QuestionRecord};
use crate::session::GameResults;

/// Most "improved" pairs shown after a game
pub const MAX_IMPROVED: usize = 5;

/// Everything the results screen shows after a game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsSummary {
    pub score: u32,
    pub total: u32,
    pub percentage: u32,
    pub message: &'static str,
    /// Pairs that used to trip the player up but were not missed this game
    pub improved: Vec<String>,
    /// Pairs missed this game that have been missed before
    pub still_challenging: Vec<String>,
}

impl ResultsSummary {
    /// Build the summary from a finished game and the progress map read
    /// after the game's answers were recorded.
    pub fn build(results: &GameResults, progress: &Progress) -> Self {
        let percentage = results.percentage();

        let still_challenging = results
            .incorrect_questions
            .iter()
            .filter(|q| {
                progress
                    .get(&question_key(q.multiplier, q.multiplicand))
                    .is_some_and(|r| r.times_wrong > 1)
            })
            .map(|q| pair_label(q.multiplier, q.multiplicand))
            .collect();

        let improved = progress
            .values()
            .filter(|r| r.has_improved())
            .filter(|r| {
                !results
                    .incorrect_questions
                    .iter()
                    .any(|q| q.multiplier == r.multiplier && q.multiplicand == r.multiplicand)
            })
            .filter(|r| results.settings.tables.contains(&r.multiplier))
            .take(MAX_IMPROVED)
            .map(record_label)
            .collect();

        Self {
            score: results.score,
            total: results.total,
            percentage,
            message: score_message(percentage),
            improved,
            still_challenging,
        }
    }
}

pub fn pair_label(multiplier: u32, multiplicand: u32) -> String {
    format!("{multiplier} × {multiplicand}")
}

fn record_label(record: &QuestionRecord) -> String {
    pair_label(record.multiplier, record.multiplicand)
}
