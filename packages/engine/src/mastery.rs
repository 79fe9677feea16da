//! Mastery Estimation
//!
//! - [`ConsistencyScorer`] - stability of the recent correctness sequence
//! - [`MasteryEstimator`] - accuracy adjusted for difficulty, consistency
//!   and sample size

use crate::config::MasteryParams;
use crate::sanitize::{clamp_unit, population_std_dev};
use crate::types::PerformanceWindow;

pub struct ConsistencyScorer {
    floor: f64,
}

impl ConsistencyScorer {
    pub fn new(floor: f64) -> Self {
        Self { floor }
    }

    /// `1 - stddev` of the window, never below the floor; 1 for fewer than two samples.
    pub fn score(&self, window: &PerformanceWindow) -> f64 {
        if window.len() < 2 {
            return 1.0;
        }
        let samples: Vec<f64> = window.scores().collect();
        clamp_unit((1.0 - population_std_dev(&samples)).max(self.floor))
    }
}

impl Default for ConsistencyScorer {
    fn default() -> Self {
        Self::new(MasteryParams::default().consistency_floor)
    }
}

pub struct MasteryEstimator {
    params: MasteryParams,
}

impl MasteryEstimator {
    pub fn new(params: MasteryParams) -> Self {
        Self { params }
    }

    pub fn estimate(
        &self,
        correct_answers: u32,
        total_questions: u32,
        average_difficulty: f64,
        consistency_score: f64,
    ) -> f64 {
        if total_questions == 0 {
            return 0.0;
        }
        let p = &self.params;

        let accuracy = correct_answers as f64 / total_questions as f64;
        let mut mastery =
            accuracy + (average_difficulty - p.baseline_difficulty) * p.difficulty_bonus;
        mastery *= clamp_unit(consistency_score);

        // full weight once enough questions have been seen
        let reliability = (total_questions as f64 / p.reliability_questions as f64).min(1.0);
        mastery *= reliability;

        clamp_unit(mastery)
    }
}

impl Default for MasteryEstimator {
    fn default() -> Self {
        Self::new(MasteryParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consistency_of_uniform_window_is_one() {
        let scorer = ConsistencyScorer::default();
        assert_eq!(scorer.score(&PerformanceWindow::from_scores(&[1, 1, 1, 1])), 1.0);
        assert_eq!(scorer.score(&PerformanceWindow::from_scores(&[0, 0, 0])), 1.0);
    }

    #[test]
    fn test_consistency_of_alternating_window() {
        let scorer = ConsistencyScorer::default();
        let score = scorer.score(&PerformanceWindow::from_scores(&[1, 0, 1, 0]));
        assert!(score < 1.0);
        assert!((score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_consistency_short_window() {
        let scorer = ConsistencyScorer::default();
        assert_eq!(scorer.score(&PerformanceWindow::new()), 1.0);
        assert_eq!(scorer.score(&PerformanceWindow::from_scores(&[0])), 1.0);
    }

    #[test]
    fn test_consistency_respects_floor() {
        let scorer = ConsistencyScorer::new(0.6);
        let score = scorer.score(&PerformanceWindow::from_scores(&[1, 0, 1, 0]));
        assert_eq!(score, 0.6);
    }

    #[test]
    fn test_no_questions_means_no_mastery() {
        let estimator = MasteryEstimator::default();
        assert_eq!(estimator.estimate(0, 0, 5.0, 1.0), 0.0);
        assert_eq!(estimator.estimate(0, 0, 1.0, 0.1), 0.0);
    }

    #[test]
    fn test_high_accuracy_on_hard_items() {
        let estimator = MasteryEstimator::default();
        let mastery = estimator.estimate(18, 20, 4.0, 0.9);
        assert!((mastery - 0.9).abs() < 1e-9, "got {}", mastery);
    }

    #[test]
    fn test_reliability_ramps_with_question_count() {
        let estimator = MasteryEstimator::default();
        let early = estimator.estimate(5, 5, 3.0, 1.0);
        let later = estimator.estimate(20, 20, 3.0, 1.0);

        assert!((early - 0.25).abs() < 1e-9);
        assert!((later - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_mastery_is_clamped() {
        let estimator = MasteryEstimator::default();
        assert_eq!(estimator.estimate(30, 30, 5.0, 1.0), 1.0);
        assert_eq!(estimator.estimate(0, 30, 1.0, 1.0), 0.0);
    }
}
