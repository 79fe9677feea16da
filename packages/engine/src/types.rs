//! Common Types and Constants
//!
//! Shared data structures used across the engine components.

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==================== Constants ====================

/// Lowest item / session difficulty
pub const MIN_DIFFICULTY: f64 = 1.0;

/// Highest item / session difficulty
pub const MAX_DIFFICULTY: f64 = 5.0;

/// Neutral difficulty used when nothing better is known
pub const BASELINE_DIFFICULTY: f64 = 3.0;

/// Default cap of the recency window
pub const DEFAULT_WINDOW_CAPACITY: usize = 10;

// ==================== Strategy ====================

/// Question selection policy attached to a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SelectionStrategy {
    #[default]
    Random,
    Targeted,
    Review,
    Challenge,
}

impl SelectionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Targeted => "targeted",
            Self::Review => "review",
            Self::Challenge => "challenge",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "targeted" => Self::Targeted,
            "review" => Self::Review,
            "challenge" => Self::Challenge,
            _ => Self::Random,
        }
    }
}

impl fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==================== Items ====================

/// Calibrated question metadata as served by the Question Store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    /// Continuous difficulty in [1, 5]
    pub difficulty: f64,
    pub average_response_time_seconds: f64,
    /// Empirical fraction of correct responses
    pub success_rate: f64,
    pub discrimination_index: f64,
}

impl Item {
    /// Item with neutral metrics, as used before any response data exists.
    pub fn new(id: impl Into<String>, difficulty: f64) -> Self {
        Self {
            id: id.into(),
            difficulty,
            average_response_time_seconds: 15.0,
            success_rate: 0.5,
            discrimination_index: 0.5,
        }
    }

    pub fn with_discrimination(mut self, discrimination_index: f64) -> Self {
        self.discrimination_index = discrimination_index;
        self
    }
}

/// One historical answer to an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    pub item_id: String,
    pub correct: bool,
    pub response_time_seconds: f64,
    pub session_id: String,
}

/// Overall counters of the session that owns a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTotals {
    pub correct_answers: u32,
    pub questions_answered: u32,
}

impl SessionTotals {
    pub fn accuracy(&self) -> f64 {
        if self.questions_answered > 0 {
            self.correct_answers as f64 / self.questions_answered as f64
        } else {
            0.0
        }
    }
}

// ==================== Performance Window ====================

/// Bounded, most-recent-last sequence of binary outcomes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredWindow")]
pub struct PerformanceWindow {
    outcomes: VecDeque<bool>,
    capacity: usize,
}

/// Wire form of a window; loading re-applies the capacity floor and trim.
#[derive(Deserialize)]
struct StoredWindow {
    outcomes: VecDeque<bool>,
    capacity: usize,
}

impl From<StoredWindow> for PerformanceWindow {
    fn from(stored: StoredWindow) -> Self {
        let mut window = Self::with_capacity(stored.capacity);
        for correct in stored.outcomes {
            window.record(correct);
        }
        window
    }
}

impl PerformanceWindow {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_WINDOW_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            outcomes: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Window holding `outcomes` in order, trimmed to the default capacity.
    pub fn from_outcomes(outcomes: impl IntoIterator<Item = bool>) -> Self {
        let mut window = Self::new();
        for correct in outcomes {
            window.record(correct);
        }
        window
    }

    /// Same as [`from_outcomes`](Self::from_outcomes) with `1`/`0` scores; any non-zero counts as correct.
    pub fn from_scores(scores: &[u8]) -> Self {
        Self::from_outcomes(scores.iter().map(|&s| s != 0))
    }

    pub fn record(&mut self, correct: bool) {
        self.outcomes.push_back(correct);
        while self.outcomes.len() > self.capacity {
            self.outcomes.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.outcomes.iter().copied()
    }

    /// Outcomes as 1.0 / 0.0 samples.
    pub fn scores(&self) -> impl Iterator<Item = f64> + '_ {
        self.iter().map(|c| if c { 1.0 } else { 0.0 })
    }

    /// Mean of the window, `None` when empty.
    pub fn accuracy(&self) -> Option<f64> {
        if self.outcomes.is_empty() {
            return None;
        }
        Some(self.scores().sum::<f64>() / self.outcomes.len() as f64)
    }
}

impl Default for PerformanceWindow {
    fn default() -> Self {
        Self::new()
    }
}

// ==================== Mastery ====================

/// Per (learner, topic) mastery estimate, always within [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MasteryRecord {
    value: f64,
}

impl MasteryRecord {
    pub fn new(value: f64) -> Self {
        Self {
            value: crate::sanitize::clamp_unit(value),
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Replaces the stored value and returns the applied change.
    pub fn update(&mut self, value: f64) -> f64 {
        let previous = self.value;
        self.value = crate::sanitize::clamp_unit(value);
        self.value - previous
    }
}

// ==================== Recommendation ====================

/// Outcome of one difficulty adjustment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// In [1, 5], rounded to one decimal
    pub next_difficulty: f64,
    pub strategy: SelectionStrategy,
    pub confidence: f64,
    /// Rules that fired, in application order
    pub reasoning: Vec<String>,
}

impl Recommendation {
    pub fn reasoning_summary(&self) -> String {
        self.reasoning.join(" | ")
    }
}

// ==================== Prediction ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformancePrediction {
    pub expected_accuracy: f64,
    pub confidence_interval: (f64, f64),
    pub recommended_session_length: u32,
}

// ==================== Velocity ====================

/// Dated mastery observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterySample {
    pub date: DateTime<Utc>,
    pub mastery: f64,
}

impl MasterySample {
    pub fn new(date: DateTime<Utc>, mastery: f64) -> Self {
        Self { date, mastery }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LearningTrend {
    Improving,
    #[default]
    Stable,
    Declining,
}

impl LearningTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Stable => "stable",
            Self::Declining => "declining",
        }
    }
}

/// Suggested reaction to a learning trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Intervention {
    ReviewFundamentals,
    AdvanceTopics,
    AdditionalSupport,
}

impl Intervention {
    pub fn message(&self) -> &'static str {
        match self {
            Self::ReviewFundamentals => "Consider reviewing fundamentals or reducing difficulty",
            Self::AdvanceTopics => "Learner is ready for more challenging topics",
            Self::AdditionalSupport => {
                "May need additional support or a different learning approach"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VelocityReport {
    /// Mastery change per day
    pub velocity: f64,
    pub trend: LearningTrend,
    pub intervention: Option<Intervention>,
}

impl Default for VelocityReport {
    fn default() -> Self {
        Self {
            velocity: 0.0,
            trend: LearningTrend::Stable,
            intervention: None,
        }
    }
}
