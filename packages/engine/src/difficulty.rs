//! Difficulty Adjustment
//!
//! Turns one answer event into the difficulty of the next question.
//! Three additive rules are applied in a fixed order and each one that
//! fires leaves a line in the recommendation's reasoning trace:
//!
//! 1. correctness x response speed
//! 2. trend of the recency window (also picks the selection strategy)
//! 3. current mastery level
//!
//! The sum is applied to the current difficulty, clamped to [1, 5] and
//! rounded to one decimal.

use crate::config::DifficultyParams;
use crate::sanitize::{clamp_difficulty, clamp_unit, round_tenth};
use crate::types::{PerformanceWindow, Recommendation, SelectionStrategy};

pub struct DifficultyAdjuster {
    params: DifficultyParams,
}

impl DifficultyAdjuster {
    pub fn new(params: DifficultyParams) -> Self {
        Self { params }
    }

    pub fn recommend(
        &self,
        current_difficulty: f64,
        is_correct: bool,
        response_time_seconds: f64,
        recent: &PerformanceWindow,
        mastery_level: f64,
    ) -> Recommendation {
        let p = &self.params;
        let mut reasoning = Vec::with_capacity(3);

        let (mut delta, reason) = self.answer_delta(is_correct, response_time_seconds);
        reasoning.push(reason.to_string());

        let recent_accuracy = recent.accuracy().unwrap_or(p.empty_window_accuracy);
        let (strategy, confidence) = if recent_accuracy > p.strong_trend_threshold {
            delta += p.strong_trend_delta;
            reasoning.push("Strong recent performance - challenging learner".to_string());
            (SelectionStrategy::Challenge, p.challenge_confidence)
        } else if recent_accuracy < p.weak_trend_threshold {
            delta += p.weak_trend_delta;
            reasoning.push("Weak recent performance - reviewing fundamentals".to_string());
            (SelectionStrategy::Review, p.review_confidence)
        } else {
            reasoning.push("Steady recent performance - targeting current level".to_string());
            (SelectionStrategy::Targeted, p.targeted_confidence)
        };

        let mastery_level = clamp_unit(mastery_level);
        if mastery_level > p.high_mastery_threshold {
            delta += p.high_mastery_delta;
            reasoning.push("High mastery - pushing boundaries".to_string());
        } else if mastery_level < p.low_mastery_threshold {
            delta += p.low_mastery_delta;
            reasoning.push("Low mastery - building foundation".to_string());
        }

        let next_difficulty = round_tenth(clamp_difficulty(current_difficulty + delta));

        tracing::debug!(
            current_difficulty,
            next_difficulty,
            delta,
            recent_accuracy,
            strategy = %strategy,
            "difficulty adjusted"
        );

        Recommendation {
            next_difficulty,
            strategy,
            confidence: clamp_unit(confidence),
            reasoning,
        }
    }

    fn answer_delta(&self, is_correct: bool, response_time_seconds: f64) -> (f64, &'static str) {
        let p = &self.params;
        if is_correct {
            if response_time_seconds < p.quick_correct_secs {
                (
                    p.quick_correct_delta,
                    "Quick correct answer - increasing difficulty",
                )
            } else if response_time_seconds < p.steady_correct_secs {
                (
                    p.steady_correct_delta,
                    "Correct answer at good pace - slight increase",
                )
            } else {
                (p.slow_correct_delta, "Correct but slow - minimal increase")
            }
        } else if response_time_seconds < p.quick_incorrect_secs {
            (
                p.quick_incorrect_delta,
                "Quick incorrect answer - significant decrease",
            )
        } else if response_time_seconds > p.slow_incorrect_secs {
            (
                p.slow_incorrect_delta,
                "Slow incorrect answer - decrease difficulty",
            )
        } else {
            (p.incorrect_delta, "Incorrect answer - moderate decrease")
        }
    }
}

impl Default for DifficultyAdjuster {
    fn default() -> Self {
        Self::new(DifficultyParams::default())
    }
}
