use super::settings::Difficulty;
use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::RangeInclusive;

/// Number of wrong options shown next to the correct one
pub const DISTRACTOR_COUNT: usize = 2;

/// Strategy for adding wrong answers to a partially filled option list
pub trait DistractorSelector {
    /// Push distinct values (never `correct`) onto `chosen` until it holds
    /// `DISTRACTOR_COUNT` entries or the strategy runs out of candidates.
    fn fill<R: Rng + ?Sized>(&self, correct: u32, chosen: &mut Vec<u32>, rng: &mut R);
}

/// Random signed offset from the answer, clamped at zero
#[derive(Debug, Clone)]
pub struct OffsetSelector {
    pub offsets: RangeInclusive<u32>,
}

impl OffsetSelector {
    pub const EASY: OffsetSelector = OffsetSelector { offsets: 5..=20 };
    pub const FALLBACK: OffsetSelector = OffsetSelector { offsets: 3..=5 };
}

impl DistractorSelector for OffsetSelector {
    fn fill<R: Rng + ?Sized>(&self, correct: u32, chosen: &mut Vec<u32>, rng: &mut R) {
        while chosen.len() < DISTRACTOR_COUNT {
            let offset = rng.gen_range(self.offsets.clone());
            let wrong = if rng.gen_bool(0.5) {
                correct + offset
            } else {
                correct.saturating_sub(offset)
            };
            if wrong != correct && !chosen.contains(&wrong) {
                chosen.push(wrong);
            }
        }
    }
}

/// Values within two of the answer, drawn without replacement
#[derive(Debug, Clone, Copy)]
pub struct NeighbourSelector;

impl DistractorSelector for NeighbourSelector {
    fn fill<R: Rng + ?Sized>(&self, correct: u32, chosen: &mut Vec<u32>, rng: &mut R) {
        let mut candidates: Vec<u32> = [
            correct.checked_sub(2),
            correct.checked_sub(1),
            Some(correct + 1),
            Some(correct + 2),
        ]
        .into_iter()
        .flatten()
        .filter(|n| *n != correct && !chosen.contains(n))
        .collect();

        candidates.shuffle(rng);
        while chosen.len() < DISTRACTOR_COUNT {
            match candidates.pop() {
                Some(wrong) => chosen.push(wrong),
                None => break,
            }
        }
    }
}

/// Wrong options for a multiple-choice question.
///
/// Easy answers sit 5 to 20 away from the truth. Medium answers prefer the
/// close neighbours and fall back to a 3 to 5 offset. Hard questions are typed,
/// so they get no options.
pub fn generate_wrong_answers<R: Rng + ?Sized>(
    correct: u32,
    difficulty: Difficulty,
    rng: &mut R,
) -> Vec<u32> {
    let mut chosen = Vec::with_capacity(DISTRACTOR_COUNT);
    match difficulty {
        Difficulty::Easy => OffsetSelector::EASY.fill(correct, &mut chosen, rng),
        Difficulty::Medium => {
            NeighbourSelector.fill(correct, &mut chosen, rng);
            OffsetSelector::FALLBACK.fill(correct, &mut chosen, rng);
        }
        Difficulty::Hard => {}
    }
    chosen
}

/// Correct answer and distractors in a uniformly random order
pub fn shuffle_options<R: Rng + ?Sized>(correct: u32, wrong: &[u32], rng: &mut R) -> Vec<u32> {
    let mut options = Vec::with_capacity(wrong.len() + 1);
    options.push(correct);
    options.extend_from_slice(wrong);
    options.shuffle(rng);
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assert_valid(correct: u32, wrong: &[u32]) {
        assert_eq!(wrong.len(), 2, "correct={correct} wrong={wrong:?}");
        assert_ne!(wrong[0], wrong[1]);
        assert!(!wrong.contains(&correct));
    }

    #[test]
    fn easy_distractors_are_far_and_valid() {
        let mut rng = StdRng::seed_from_u64(3);
        for correct in 0..=144 {
            let wrong = generate_wrong_answers(correct, Difficulty::Easy, &mut rng);
            assert_valid(correct, &wrong);
            for w in wrong {
                let distance = w.abs_diff(correct);
                // clamping at zero can shrink the distance for small answers
                assert!(distance <= 20);
                if w != 0 {
                    assert!(distance >= 5, "correct={correct} w={w}");
                }
            }
        }
    }

    #[test]
    fn medium_distractors_are_neighbours() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let wrong = generate_wrong_answers(24, Difficulty::Medium, &mut rng);
            assert_valid(24, &wrong);
            for w in &wrong {
                assert!([22, 23, 25, 26].contains(w));
            }
        }
    }

    #[test]
    fn medium_distractors_near_zero() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut wrong = generate_wrong_answers(0, Difficulty::Medium, &mut rng);
        wrong.sort();
        assert_eq!(wrong, vec![1, 2]);

        for _ in 0..20 {
            let wrong = generate_wrong_answers(1, Difficulty::Medium, &mut rng);
            assert_valid(1, &wrong);
            assert!(wrong.iter().all(|w| [0, 2, 3].contains(w)));
        }
    }

    #[test]
    fn fallback_fills_when_neighbours_run_out() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut chosen = vec![];
        OffsetSelector::FALLBACK.fill(10, &mut chosen, &mut rng);
        assert_valid(10, &chosen);
        assert!(chosen.iter().all(|w| (3..=5).contains(&w.abs_diff(10))));
    }

    #[test]
    fn hard_has_no_distractors() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(generate_wrong_answers(42, Difficulty::Hard, &mut rng).is_empty());
    }

    #[test]
    fn shuffled_options_contain_everything() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut options = shuffle_options(56, &[54, 58], &mut rng);
        options.sort();
        assert_eq!(options, vec![54, 56, 58]);
    }
}
