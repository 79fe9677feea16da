use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::sanitize::all_finite;
use crate::types::DEFAULT_WINDOW_CAPACITY;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyParams {
    pub quick_correct_secs: f64,
    pub steady_correct_secs: f64,
    pub quick_incorrect_secs: f64,
    pub slow_incorrect_secs: f64,
    pub quick_correct_delta: f64,
    pub steady_correct_delta: f64,
    pub slow_correct_delta: f64,
    pub quick_incorrect_delta: f64,
    pub slow_incorrect_delta: f64,
    pub incorrect_delta: f64,
    pub strong_trend_threshold: f64,
    pub weak_trend_threshold: f64,
    pub strong_trend_delta: f64,
    pub weak_trend_delta: f64,
    pub challenge_confidence: f64,
    pub review_confidence: f64,
    pub targeted_confidence: f64,
    /// Recent accuracy assumed for an empty window
    pub empty_window_accuracy: f64,
    pub high_mastery_threshold: f64,
    pub low_mastery_threshold: f64,
    pub high_mastery_delta: f64,
    pub low_mastery_delta: f64,
}

impl Default for DifficultyParams {
    fn default() -> Self {
        Self {
            quick_correct_secs: 10.0,
            steady_correct_secs: 20.0,
            quick_incorrect_secs: 5.0,
            slow_incorrect_secs: 30.0,
            quick_correct_delta: 1.0,
            steady_correct_delta: 0.5,
            slow_correct_delta: 0.2,
            quick_incorrect_delta: -1.5,
            slow_incorrect_delta: -1.0,
            incorrect_delta: -0.7,
            strong_trend_threshold: 0.8,
            weak_trend_threshold: 0.4,
            strong_trend_delta: 0.3,
            weak_trend_delta: -0.5,
            challenge_confidence: 0.8,
            review_confidence: 0.9,
            targeted_confidence: 0.6,
            empty_window_accuracy: 0.5,
            high_mastery_threshold: 0.8,
            low_mastery_threshold: 0.3,
            high_mastery_delta: 0.2,
            low_mastery_delta: -0.3,
        }
    }
}

impl DifficultyParams {
    fn values(&self) -> [f64; 22] {
        [
            self.quick_correct_secs,
            self.steady_correct_secs,
            self.quick_incorrect_secs,
            self.slow_incorrect_secs,
            self.quick_correct_delta,
            self.steady_correct_delta,
            self.slow_correct_delta,
            self.quick_incorrect_delta,
            self.slow_incorrect_delta,
            self.incorrect_delta,
            self.strong_trend_threshold,
            self.weak_trend_threshold,
            self.strong_trend_delta,
            self.weak_trend_delta,
            self.challenge_confidence,
            self.review_confidence,
            self.targeted_confidence,
            self.empty_window_accuracy,
            self.high_mastery_threshold,
            self.low_mastery_threshold,
            self.high_mastery_delta,
            self.low_mastery_delta,
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionParams {
    /// Max distance from target for targeted candidates
    pub targeted_window: f64,
    /// Width of the challenge / review bands
    pub band_width: f64,
    /// Max distance from target for random candidates
    pub random_window: f64,
    /// Fixed RNG seed, system time when unset
    pub seed: Option<u64>,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            targeted_window: 0.5,
            band_width: 1.0,
            random_window: 1.0,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MasteryParams {
    pub baseline_difficulty: f64,
    /// Mastery bonus per difficulty level above baseline
    pub difficulty_bonus: f64,
    /// Question count at which the estimate gets full weight
    pub reliability_questions: u32,
    pub consistency_floor: f64,
}

impl Default for MasteryParams {
    fn default() -> Self {
        Self {
            baseline_difficulty: 3.0,
            difficulty_bonus: 0.1,
            reliability_questions: 20,
            consistency_floor: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionParams {
    /// Maps mastery [0, 1] onto the difficulty scale
    pub mastery_scale: f64,
    pub gap_weight: f64,
    pub min_accuracy: f64,
    pub max_accuracy: f64,
    pub fatigue_threshold: u32,
    pub fatigue_factor: f64,
    pub interval_margin: f64,
    pub low_mastery: f64,
    pub high_mastery: f64,
    pub short_session: u32,
    pub base_session: u32,
    pub long_session: u32,
}

impl Default for PredictionParams {
    fn default() -> Self {
        Self {
            mastery_scale: 5.0,
            gap_weight: 0.1,
            min_accuracy: 0.1,
            max_accuracy: 0.95,
            fatigue_threshold: 15,
            fatigue_factor: 0.95,
            interval_margin: 0.1,
            low_mastery: 0.3,
            high_mastery: 0.8,
            short_session: 8,
            base_session: 10,
            long_session: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VelocityParams {
    /// Number of most recent samples considered, 0 means all
    pub timeframe: usize,
    pub trend_threshold: f64,
    pub advance_mastery: f64,
    pub support_mastery: f64,
}

impl Default for VelocityParams {
    fn default() -> Self {
        Self {
            timeframe: 7,
            trend_threshold: 0.02,
            advance_mastery: 0.8,
            support_mastery: 0.4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationParams {
    pub min_difficulty_responses: usize,
    pub min_discrimination_responses: usize,
    pub default_difficulty: f64,
    pub default_discrimination: f64,
    pub default_success_rate: f64,
    pub default_response_time_seconds: f64,
}

impl Default for CalibrationParams {
    fn default() -> Self {
        Self {
            min_difficulty_responses: 5,
            min_discrimination_responses: 10,
            default_difficulty: 3.0,
            default_discrimination: 0.5,
            default_success_rate: 0.5,
            default_response_time_seconds: 15.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub difficulty: DifficultyParams,
    pub selection: SelectionParams,
    pub mastery: MasteryParams,
    pub prediction: PredictionParams,
    pub velocity: VelocityParams,
    pub calibration: CalibrationParams,
    pub window_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            difficulty: DifficultyParams::default(),
            selection: SelectionParams::default(),
            mastery: MasteryParams::default(),
            prediction: PredictionParams::default(),
            velocity: VelocityParams::default(),
            calibration: CalibrationParams::default(),
            window_capacity: DEFAULT_WINDOW_CAPACITY,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("ENGINE_WINDOW_CAPACITY") {
            config.window_capacity = val.parse().unwrap_or(DEFAULT_WINDOW_CAPACITY);
        }
        if let Ok(val) = std::env::var("ENGINE_VELOCITY_TIMEFRAME") {
            config.velocity.timeframe = val.parse().unwrap_or(VelocityParams::default().timeframe);
        }
        if let Ok(val) = std::env::var("ENGINE_SELECTION_SEED") {
            config.selection.seed = val.parse().ok();
        }

        config
    }

    /// Parses a (possibly partial) JSON document; missing fields keep their defaults.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.window_capacity == 0 {
            return Err(invalid("window_capacity must be at least 1"));
        }

        let d = &self.difficulty;
        if !all_finite(&d.values()) {
            return Err(invalid("difficulty params must be finite"));
        }
        if d.quick_correct_secs > d.steady_correct_secs {
            return Err(invalid("quick_correct_secs exceeds steady_correct_secs"));
        }
        if d.quick_incorrect_secs > d.slow_incorrect_secs {
            return Err(invalid("quick_incorrect_secs exceeds slow_incorrect_secs"));
        }
        if d.weak_trend_threshold > d.strong_trend_threshold {
            return Err(invalid("weak_trend_threshold exceeds strong_trend_threshold"));
        }
        if d.low_mastery_threshold > d.high_mastery_threshold {
            return Err(invalid("low_mastery_threshold exceeds high_mastery_threshold"));
        }

        let s = &self.selection;
        if !all_finite(&[s.targeted_window, s.band_width, s.random_window])
            || s.targeted_window < 0.0
            || s.band_width < 0.0
            || s.random_window < 0.0
        {
            return Err(invalid("selection windows must be finite and non-negative"));
        }

        let m = &self.mastery;
        if m.reliability_questions == 0 {
            return Err(invalid("reliability_questions must be positive"));
        }
        if !all_finite(&[m.baseline_difficulty, m.difficulty_bonus, m.consistency_floor]) {
            return Err(invalid("mastery params must be finite"));
        }

        let p = &self.prediction;
        if !all_finite(&[
            p.mastery_scale,
            p.gap_weight,
            p.min_accuracy,
            p.max_accuracy,
            p.fatigue_factor,
            p.interval_margin,
            p.low_mastery,
            p.high_mastery,
        ]) {
            return Err(invalid("prediction params must be finite"));
        }
        if p.min_accuracy > p.max_accuracy {
            return Err(invalid("min_accuracy exceeds max_accuracy"));
        }
        if p.low_mastery > p.high_mastery {
            return Err(invalid("prediction low_mastery exceeds high_mastery"));
        }

        let v = &self.velocity;
        if !all_finite(&[v.trend_threshold, v.advance_mastery, v.support_mastery])
            || v.trend_threshold < 0.0
        {
            return Err(invalid("velocity params must be finite, threshold non-negative"));
        }

        let c = &self.calibration;
        if !all_finite(&[
            c.default_difficulty,
            c.default_discrimination,
            c.default_success_rate,
            c.default_response_time_seconds,
        ]) {
            return Err(invalid("calibration defaults must be finite"));
        }

        Ok(())
    }
}

fn invalid(msg: &str) -> EngineError {
    EngineError::InvalidConfig(msg.to_string())
}
