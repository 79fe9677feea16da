//! # adaptive-quiz-engine - adaptive assessment core
//!
//! Pure decision functions behind an adaptive quiz:
//!
//! - **Difficulty adjustment** - next difficulty and selection strategy per answer
//! - **Question selection** - concrete item from a pool for a recommendation
//! - **Mastery estimation** - 0-1 topic mastery from accuracy, difficulty, consistency
//! - **Performance prediction** - expected accuracy and session length
//! - **Learning velocity** - mastery trend and intervention suggestion
//! - **Item calibration** - empirical difficulty and discrimination per item
//!
//! ## Design
//!
//! - **No owned state** - sessions, mastery records and item metadata are
//!   passed in by the caller; components only hold their parameters
//! - **Never fails on numbers** - outputs are clamped, small samples fall
//!   back to neutral defaults
//! - **Parallel safe** - different learners can be processed concurrently
//!   without coordination
//!
//! ## Modules
//!
//! - [`difficulty`] - difficulty adjuster
//! - [`selection`] - question selector, per-session seeded RNG
//! - [`mastery`] - mastery estimator and consistency scorer
//! - [`prediction`] - performance predictor
//! - [`velocity`] - learning velocity analyzer
//! - [`calibration`] - item calibrator
//! - [`store`] - Question Store seam and in-memory implementation
//! - [`session`] - session lifecycle and summary
//! - [`engine`] - facade wiring the per-answer loop
//! - [`config`], [`error`], [`logging`], [`sanitize`], [`types`]
//!
//! ## Example
//!
//! ```rust
//! use adaptive_quiz_engine::{AdaptiveEngine, AnswerEvent, EngineConfig, Item, MasteryRecord};
//!
//! let engine = AdaptiveEngine::new(EngineConfig::default()).unwrap();
//! let pool = vec![Item::new("q1", 2.5), Item::new("q2", 3.0), Item::new("q3", 3.8)];
//!
//! let mut session = engine.start_session("fractions", 3.0);
//! let mut mastery = MasteryRecord::default();
//!
//! let first = engine.next_item(&mut session, &pool).unwrap().id.clone();
//! let outcome = engine
//!     .process_answer(
//!         &mut session,
//!         &mut mastery,
//!         &AnswerEvent { item_id: first, is_correct: true, response_time_seconds: 8.0 },
//!     )
//!     .unwrap();
//! assert!(outcome.recommendation.next_difficulty >= 1.0);
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod calibration;
pub mod config;
pub mod difficulty;
pub mod engine;
pub mod error;
pub mod logging;
pub mod mastery;
pub mod prediction;
pub mod sanitize;
pub mod selection;
pub mod session;
pub mod store;
pub mod types;
pub mod velocity;

// ============================================================================
// Re-exports
// ============================================================================

pub use types::*;

pub use calibration::{discrimination_from_rates, ItemCalibrator, ScoredResponse};
pub use config::{
    CalibrationParams, DifficultyParams, EngineConfig, MasteryParams, PredictionParams,
    SelectionParams, VelocityParams,
};
pub use difficulty::DifficultyAdjuster;
pub use engine::{AdaptiveEngine, AnswerEvent, AnswerOutcome, MasteryChange};
pub use error::{EngineError, EngineResult};
pub use mastery::{ConsistencyScorer, MasteryEstimator};
pub use prediction::PerformancePredictor;
pub use selection::{selection_rng, QuestionSelector};
pub use session::{PerformanceLevel, SessionState, SessionStatus, SessionSummary};
pub use store::{InMemoryQuestionStore, QuestionStore};
pub use velocity::{parse_sample_date, LearningVelocityAnalyzer};
