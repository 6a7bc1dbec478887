use crate::error::GameError;
use crate::game::{
    generate_questions, generate_wrong_answers, random_positive_message, shuffle_options,
    GameMode, GameSettings, Question,
};
use crate::progress::{GameSession, IncorrectAnswer, ProgressStore};
use crate::storage::KeyValueStore;
use chrono::{DateTime, Utc};
use rand::Rng;

/// Questions generated up front for a timed game
pub const TIME_MODE_QUESTIONS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Correct { message: &'static str },
    Incorrect { user_answer: Option<i64> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub question: Question,
    pub feedback: Feedback,
    pub finished: bool,
}

impl AnswerOutcome {
    pub fn is_correct(&self) -> bool {
        matches!(self.feedback, Feedback::Correct { .. })
    }
}

/// What a finished game hands to the results screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResults {
    pub score: u32,
    pub total: u32,
    pub incorrect_questions: Vec<IncorrectAnswer>,
    pub settings: GameSettings,
}

impl GameResults {
    /// Rounded percentage correct, zero when nothing was answered
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (f64::from(self.score) / f64::from(self.total) * 100.0).round() as u32
    }

    pub fn to_session(&self, date: DateTime<Utc>) -> GameSession {
        GameSession {
            date,
            score: self.score,
            total: self.total,
            difficulty: self.settings.difficulty,
            tables: self.settings.tables.iter().copied().collect(),
            incorrect_questions: self.incorrect_questions.clone(),
        }
    }
}

/// One game being played: question index, countdown and score
#[derive(Debug)]
pub struct Game<R: Rng> {
    settings: GameSettings,
    questions: Vec<Question>,
    current: usize,
    options: Vec<u32>,
    score: u32,
    answered: u32,
    incorrect: Vec<IncorrectAnswer>,
    seconds_remaining: Option<u32>,
    finished: bool,
    rng: R,
}

impl<R: Rng> Game<R> {
    pub fn new(settings: GameSettings, mut rng: R) -> Result<Self, GameError> {
        let settings = settings.normalized();
        if settings.tables.is_empty() {
            return Err(GameError::NoTables);
        }

        let (count, seconds_remaining) = match settings.game_mode {
            GameMode::Questions => {
                if settings.question_count == 0 {
                    return Err(GameError::NoQuestions);
                }
                (settings.question_count as usize, None)
            }
            GameMode::Time => {
                if settings.time_limit == 0 {
                    return Err(GameError::NoTime);
                }
                (TIME_MODE_QUESTIONS, Some(settings.time_limit))
            }
        };

        let tables: Vec<u32> = settings.tables.iter().copied().collect();
        let questions = generate_questions(&tables, count, &mut rng);
        tracing::debug!(
            mode = %settings.game_mode,
            difficulty = %settings.difficulty,
            questions = questions.len(),
            "starting game"
        );

        let mut game = Self {
            settings,
            questions,
            current: 0,
            options: Vec::new(),
            score: 0,
            answered: 0,
            incorrect: Vec::new(),
            seconds_remaining,
            finished: false,
            rng,
        };
        game.prepare_options();
        Ok(game)
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn current_question(&self) -> Option<&Question> {
        if self.finished {
            return None;
        }
        self.questions.get(self.current)
    }

    /// 1-based position of the current question
    pub fn question_number(&self) -> usize {
        self.current + 1
    }

    /// Shuffled choices for the current question; empty on hard
    pub fn options(&self) -> &[u32] {
        &self.options
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn answered(&self) -> u32 {
        self.answered
    }

    pub fn seconds_remaining(&self) -> Option<u32> {
        self.seconds_remaining
    }

    pub fn has_finished(&self) -> bool {
        self.finished
    }

    /// Fraction of the game done, for a progress bar
    pub fn progress_fraction(&self) -> f64 {
        match (self.settings.game_mode, self.seconds_remaining) {
            (GameMode::Time, Some(remaining)) => {
                let limit = f64::from(self.settings.time_limit);
                (limit - f64::from(remaining)) / limit
            }
            _ => self.current as f64 / f64::from(self.settings.question_count),
        }
    }

    /// Score the current question and move on.
    ///
    /// `None` stands for "no answer" and counts as wrong. Every submission is
    /// recorded in `progress`.
    pub fn submit_answer<S: KeyValueStore>(
        &mut self,
        answer: Option<i64>,
        progress: &ProgressStore<S>,
    ) -> Result<AnswerOutcome, GameError> {
        let question = *self.current_question().ok_or(GameError::Finished)?;
        let correct = question.is_correct(answer);

        self.answered += 1;
        progress.record_answer(question.multiplier, question.multiplicand, correct);

        let feedback = if correct {
            self.score += 1;
            Feedback::Correct {
                message: random_positive_message(&mut self.rng),
            }
        } else {
            self.incorrect.push(IncorrectAnswer {
                multiplier: question.multiplier,
                multiplicand: question.multiplicand,
                user_answer: answer,
                correct_answer: question.answer,
            });
            Feedback::Incorrect {
                user_answer: answer,
            }
        };

        self.advance();

        Ok(AnswerOutcome {
            question,
            feedback,
            finished: self.finished,
        })
    }

    /// One second of the countdown. Returns true once the game is over.
    pub fn on_tick(&mut self) -> bool {
        if self.finished {
            return true;
        }
        if let Some(remaining) = self.seconds_remaining.as_mut() {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                tracing::debug!("time is up");
                self.finished = true;
            }
        }
        self.finished
    }

    /// End the game and store its summary in the session history
    pub fn finish<S: KeyValueStore>(self, progress: &ProgressStore<S>) -> GameResults {
        let results = GameResults {
            score: self.score,
            total: self.answered,
            incorrect_questions: self.incorrect,
            settings: self.settings,
        };
        progress.save_session(results.to_session(Utc::now()));
        results
    }

    fn advance(&mut self) {
        let next = self.current + 1;
        let reached_count = match self.settings.game_mode {
            GameMode::Questions => next >= self.settings.question_count as usize,
            GameMode::Time => false,
        };
        let out_of_questions = reached_count || next >= self.questions.len();

        if out_of_questions {
            self.finished = true;
            self.options.clear();
        } else {
            self.current = next;
            self.prepare_options();
        }
    }

    fn prepare_options(&mut self) {
        self.options.clear();
        if !self.settings.difficulty.is_multiple_choice() {
            return;
        }
        if let Some(question) = self.questions.get(self.current).copied() {
            let wrong = generate_wrong_answers(question.answer, self.settings.difficulty, &mut self.rng);
            self.options = shuffle_options(question.answer, &wrong, &mut self.rng);
        }
    }
}
