//! Spaced-repetition scheduling for quiz questions.
//!
//! A simplified SM-2-style update: answering correctly stretches the review
//! interval by a factor that grows with the question's difficulty factor;
//! answering incorrectly resets the interval to one day. The whole thing is
//! a pure function of prior state, the correctness signal, and the supplied
//! clock, so identical inputs always produce identical schedules.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const INITIAL_INTERVAL_DAYS: f64 = 1.0;
const INITIAL_DIFFICULTY: f64 = 0.5;
const MIN_DIFFICULTY: f64 = 0.1;
const MAX_DIFFICULTY: f64 = 2.5;

/// Review state for one quiz question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
    pub next_review_at: DateTime<Utc>,
    /// Days until the next review; never below 1.
    pub interval_days: f64,
    /// Ease signal in `[0.1, 2.5]`; higher means the question has been
    /// answered correctly more often.
    pub difficulty_factor: f64,
}

impl ReviewState {
    fn initial(now: DateTime<Utc>) -> Self {
        Self {
            next_review_at: now,
            interval_days: INITIAL_INTERVAL_DAYS,
            difficulty_factor: INITIAL_DIFFICULTY,
        }
    }
}

/// Per-question review schedule for one quiz. Created fresh whenever a new
/// analysis is produced; mutated only through [`SpacedRepetition::update`]
/// by the single owning caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpacedRepetition {
    entries: BTreeMap<usize, ReviewState>,
}

impl SpacedRepetition {
    /// Schedule every question of a fresh quiz for immediate review.
    pub fn initialize(question_count: usize, now: DateTime<Utc>) -> Self {
        let entries = (0..question_count).map(|idx| (idx, ReviewState::initial(now))).collect();
        Self { entries }
    }

    /// Apply a correctness signal for one question and return the new state.
    ///
    /// Quality is 4 for a correct answer and 1 for an incorrect one. The
    /// difficulty factor moves by `(quality - 3) * 0.1` and is clamped to
    /// `[0.1, 2.5]`. A correct answer multiplies the interval by
    /// `1.3 + difficulty'` (never shrinking below one day); an incorrect
    /// answer resets it to one day. An index that was never initialized
    /// updates from the initial state.
    pub fn update(&mut self, index: usize, is_correct: bool, now: DateTime<Utc>) -> &ReviewState {
        let prior = self.entries.remove(&index).unwrap_or_else(|| ReviewState::initial(now));

        let quality: f64 = if is_correct { 4.0 } else { 1.0 };
        let difficulty =
            (prior.difficulty_factor + (quality - 3.0) * 0.1).clamp(MIN_DIFFICULTY, MAX_DIFFICULTY);
        let interval = if is_correct {
            (prior.interval_days * (1.3 + difficulty)).max(1.0)
        } else {
            1.0
        };

        let next = ReviewState {
            next_review_at: now + days(interval),
            interval_days: interval,
            difficulty_factor: difficulty,
        };
        self.entries.insert(index, next);
        &self.entries[&index]
    }

    pub fn get(&self, index: usize) -> Option<&ReviewState> {
        self.entries.get(&index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate states in question order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &ReviewState)> {
        self.entries.iter().map(|(idx, state)| (*idx, state))
    }
}

fn days(n: f64) -> Duration {
    Duration::milliseconds((n * 86_400_000.0) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn initialize_schedules_every_question_now() {
        let srs = SpacedRepetition::initialize(3, t0());
        assert_eq!(srs.len(), 3);
        for (_, state) in srs.iter() {
            assert_eq!(state.next_review_at, t0());
            assert_eq!(state.interval_days, 1.0);
            assert_eq!(state.difficulty_factor, 0.5);
        }
    }

    #[test]
    fn correct_answer_stretches_interval() {
        let mut srs = SpacedRepetition::initialize(1, t0());
        let state = srs.update(0, true, t0()).clone();

        // difficulty 0.5 + 0.1 = 0.6; interval 1.0 * (1.3 + 0.6) = 1.9
        assert!((state.difficulty_factor - 0.6).abs() < 1e-9);
        assert!((state.interval_days - 1.9).abs() < 1e-9);
        let scheduled_ms = (state.next_review_at - t0()).num_milliseconds() as f64;
        assert!((scheduled_ms - 1.9 * 86_400_000.0).abs() < 10.0);
    }

    #[test]
    fn incorrect_answer_resets_interval_to_one_day() {
        let mut srs = SpacedRepetition::initialize(1, t0());
        for _ in 0..4 {
            srs.update(0, true, t0());
        }
        let grown = srs.get(0).unwrap().interval_days;
        assert!(grown > 10.0);

        let state = srs.update(0, false, t0());
        assert_eq!(state.interval_days, 1.0);
        assert_eq!(state.next_review_at, t0() + Duration::days(1));
    }

    #[test]
    fn correct_answer_never_shrinks_interval_below_prior_times_growth_floor() {
        let mut srs = SpacedRepetition::initialize(1, t0());
        let mut prior = srs.get(0).unwrap().interval_days;
        for _ in 0..6 {
            let state = srs.update(0, true, t0());
            assert!(state.interval_days >= prior * 1.3);
            prior = state.interval_days;
        }
    }

    #[test]
    fn difficulty_clamps_at_bounds() {
        let mut srs = SpacedRepetition::initialize(1, t0());
        for _ in 0..30 {
            srs.update(0, true, t0());
        }
        assert_eq!(srs.get(0).unwrap().difficulty_factor, 2.5);

        for _ in 0..30 {
            srs.update(0, false, t0());
        }
        assert_eq!(srs.get(0).unwrap().difficulty_factor, 0.1);
    }

    #[test]
    fn update_is_reproducible_for_identical_inputs() {
        let mut a = SpacedRepetition::initialize(2, t0());
        let mut b = SpacedRepetition::initialize(2, t0());
        for correct in [true, false, true, true] {
            a.update(1, correct, t0());
            b.update(1, correct, t0());
        }
        assert_eq!(a.get(1), b.get(1));
    }

    #[test]
    fn unknown_index_updates_from_initial_state() {
        let mut srs = SpacedRepetition::default();
        let state = srs.update(7, true, t0());
        assert!((state.interval_days - 1.9).abs() < 1e-9);
    }
}
