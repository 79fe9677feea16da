//! Performance Prediction
//!
//! Forecasts accuracy at a planned difficulty and suggests a session
//! length. Used for planning and reporting only.

use crate::config::PredictionParams;
use crate::sanitize::clamp_unit;
use crate::types::PerformancePrediction;

pub struct PerformancePredictor {
    params: PredictionParams,
}

impl PerformancePredictor {
    pub fn new(params: PredictionParams) -> Self {
        Self { params }
    }

    pub fn predict(
        &self,
        current_mastery: f64,
        target_difficulty: f64,
        questions_planned: u32,
    ) -> PerformancePrediction {
        let p = &self.params;

        let difficulty_gap = target_difficulty - current_mastery * p.mastery_scale;
        let mut expected_accuracy = (current_mastery - difficulty_gap * p.gap_weight)
            .clamp(p.min_accuracy, p.max_accuracy);

        if questions_planned > p.fatigue_threshold {
            expected_accuracy *= p.fatigue_factor;
        }

        let confidence_interval = (
            clamp_unit(expected_accuracy - p.interval_margin),
            clamp_unit(expected_accuracy + p.interval_margin),
        );

        let recommended_session_length = if current_mastery < p.low_mastery {
            p.short_session
        } else if current_mastery > p.high_mastery {
            p.long_session
        } else {
            p.base_session
        };

        PerformancePrediction {
            expected_accuracy,
            confidence_interval,
            recommended_session_length,
        }
    }
}

impl Default for PerformancePredictor {
    fn default() -> Self {
        Self::new(PredictionParams::default())
    }
}
