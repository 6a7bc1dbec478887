pub mod distractor;
pub mod feedback;
pub mod question;
pub mod settings;

// Re-export the main types for convenience
pub use distractor::{
    generate_wrong_answers, shuffle_options, DistractorSelector, NeighbourSelector, OffsetSelector,
};
pub use feedback::{random_positive_message, score_message, POSITIVE_MESSAGES};
pub use question::{generate_questions, question_key, Question};
pub use settings::{Difficulty, GameMode, GameSettings};
