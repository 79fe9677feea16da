//! Numeric sanitization
//!
//! Every component clamps its outputs through these helpers so that
//! floating drift never leaks a value outside its documented range.

use crate::types::{MAX_DIFFICULTY, MIN_DIFFICULTY};

/// Clamp to [0, 1]
pub fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Clamp to the difficulty scale [1, 5]
pub fn clamp_difficulty(value: f64) -> f64 {
    value.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

/// Round half away from zero to one decimal place
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Population standard deviation, 0 for an empty input
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// True when no value is NaN or infinite
pub fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}
