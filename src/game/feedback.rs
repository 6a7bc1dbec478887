use rand::seq::SliceRandom;
use rand::Rng;

pub const POSITIVE_MESSAGES: [&str; 10] = [
    "Brilliant!",
    "Well done!",
    "Fantastic!",
    "Superb!",
    "Amazing!",
    "You're a star!",
    "Excellent!",
    "Marvellous!",
    "Top marks!",
    "Spot on!",
];

pub fn random_positive_message<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    POSITIVE_MESSAGES.choose(rng).copied().unwrap_or("Well done!")
}

/// Headline for the results screen based on the rounded percentage
pub fn score_message(percentage: u32) -> &'static str {
    match percentage {
        100.. => "Perfect score! You're a maths superstar!",
        80..=99 => "Brilliant work! Keep it up!",
        60..=79 => "Good effort! Practice makes perfect!",
        40..=59 => "Nice try! You'll get better!",
        _ => "Keep practising, you've got this!",
    }
}
