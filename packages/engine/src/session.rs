//! Session State
//!
//! Per learner/topic session: current difficulty, answer counters, the
//! recency window and the ordered history of served items. Mutated by the
//! caller after every answer; callers serialize updates per session.

use chrono::{DateTime, Utc};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::sanitize::clamp_difficulty;
use crate::selection::selection_rng;
use crate::types::{PerformanceWindow, Recommendation, SelectionStrategy, DEFAULT_WINDOW_CAPACITY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Active,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub session_id: String,
    pub topic_id: String,
    pub current_difficulty: f64,
    pub questions_answered: u32,
    pub correct_answers: u32,
    pub answered_item_ids: Vec<String>,
    pub window: PerformanceWindow,
    /// Strategy of the most recent recommendation
    pub last_strategy: Option<SelectionStrategy>,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Per-session random source for question picks
    pub selection_rng: ChaCha8Rng,
}

impl SessionState {
    pub fn new(topic_id: impl Into<String>, initial_difficulty: f64) -> Self {
        Self::with_window_capacity(topic_id, initial_difficulty, DEFAULT_WINDOW_CAPACITY)
    }

    pub fn with_window_capacity(
        topic_id: impl Into<String>,
        initial_difficulty: f64,
        capacity: usize,
    ) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            topic_id: topic_id.into(),
            current_difficulty: clamp_difficulty(initial_difficulty),
            questions_answered: 0,
            correct_answers: 0,
            answered_item_ids: Vec::new(),
            window: PerformanceWindow::with_capacity(capacity),
            last_strategy: None,
            status: SessionStatus::Active,
            started_at: Utc::now(),
            completed_at: None,
            selection_rng: selection_rng(None),
        }
    }

    /// Reseeds the question-pick stream; `None` keeps a time-based seed.
    pub fn with_selection_seed(mut self, seed: Option<u64>) -> Self {
        self.selection_rng = selection_rng(seed);
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    /// Commits one answer and the recommendation computed for it.
    pub fn record_answer(&mut self, correct: bool, recommendation: &Recommendation) -> EngineResult<()> {
        self.ensure_active()?;

        self.window.record(correct);
        self.questions_answered += 1;
        if correct {
            self.correct_answers += 1;
        }
        self.current_difficulty = clamp_difficulty(recommendation.next_difficulty);
        self.last_strategy = Some(recommendation.strategy);
        Ok(())
    }

    /// Appends `item_id` to the history unless it is already there.
    pub fn mark_served(&mut self, item_id: &str) {
        if !self.answered_item_ids.iter().any(|id| id == item_id) {
            self.answered_item_ids.push(item_id.to_string());
        }
    }

    /// Forgets served items so an exhausted pool can be reused.
    pub fn reset_history(&mut self) {
        self.answered_item_ids.clear();
    }

    pub fn complete(&mut self) {
        if self.status == SessionStatus::Completed {
            return;
        }
        self.status = SessionStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    pub fn accuracy(&self) -> f64 {
        if self.questions_answered == 0 {
            0.0
        } else {
            self.correct_answers as f64 / self.questions_answered as f64
        }
    }

    pub fn summary(&self, response_times_seconds: &[f64]) -> SessionSummary {
        let accuracy_percent = (self.accuracy() * 100.0).round() as u32;
        let average_response_seconds = if response_times_seconds.is_empty() {
            0
        } else {
            let total: f64 = response_times_seconds.iter().sum();
            (total / response_times_seconds.len() as f64).round().max(0.0) as u32
        };

        SessionSummary {
            questions_answered: self.questions_answered,
            correct_answers: self.correct_answers,
            accuracy_percent,
            average_response_seconds,
            performance_level: PerformanceLevel::from_accuracy_percent(accuracy_percent),
        }
    }

    pub(crate) fn ensure_active(&self) -> EngineResult<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(EngineError::SessionClosed(self.session_id.clone()))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PerformanceLevel {
    Excellent,
    Good,
    Fair,
    NeedsPractice,
}

impl PerformanceLevel {
    pub fn from_accuracy_percent(percent: u32) -> Self {
        match percent {
            90.. => Self::Excellent,
            80..=89 => Self::Good,
            70..=79 => Self::Fair,
            _ => Self::NeedsPractice,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::NeedsPractice => "Needs Practice",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub questions_answered: u32,
    pub correct_answers: u32,
    pub accuracy_percent: u32,
    pub average_response_seconds: u32,
    pub performance_level: PerformanceLevel,
}
