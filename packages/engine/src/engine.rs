use serde::{Deserialize, Serialize};

use crate::calibration::ItemCalibrator;
use crate::config::EngineConfig;
use crate::difficulty::DifficultyAdjuster;
use crate::error::EngineResult;
use crate::mastery::{ConsistencyScorer, MasteryEstimator};
use crate::prediction::PerformancePredictor;
use crate::selection::QuestionSelector;
use crate::session::SessionState;
use crate::store::QuestionStore;
use crate::types::*;
use crate::velocity::LearningVelocityAnalyzer;

/// One answered question as reported by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEvent {
    pub item_id: String,
    pub is_correct: bool,
    pub response_time_seconds: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryChange {
    pub previous: f64,
    pub current: f64,
    pub delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub recommendation: Recommendation,
    pub consistency: f64,
    pub mastery: MasteryChange,
}

/// Wires the decision components into the per-answer control flow.
///
/// Holds no learner state: sessions and mastery records are passed in and
/// mutated in place, so one `&AdaptiveEngine` can serve any number of
/// learners concurrently as long as each session has a single writer.
pub struct AdaptiveEngine {
    config: EngineConfig,
    adjuster: DifficultyAdjuster,
    selector: QuestionSelector,
    consistency: ConsistencyScorer,
    mastery: MasteryEstimator,
    predictor: PerformancePredictor,
    velocity: LearningVelocityAnalyzer,
    calibrator: ItemCalibrator,
}

impl AdaptiveEngine {
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;

        Ok(Self {
            adjuster: DifficultyAdjuster::new(config.difficulty.clone()),
            selector: QuestionSelector::new(config.selection.clone()),
            consistency: ConsistencyScorer::new(config.mastery.consistency_floor),
            mastery: MasteryEstimator::new(config.mastery.clone()),
            predictor: PerformancePredictor::new(config.prediction.clone()),
            velocity: LearningVelocityAnalyzer::new(config.velocity.clone()),
            calibrator: ItemCalibrator::new(config.calibration.clone()),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn start_session(&self, topic_id: &str, initial_difficulty: f64) -> SessionState {
        let session = SessionState::with_window_capacity(
            topic_id,
            initial_difficulty,
            self.config.window_capacity,
        )
        .with_selection_seed(self.config.selection.seed);
        tracing::info!(
            session_id = %session.session_id,
            topic_id = %topic_id,
            difficulty = session.current_difficulty,
            "session started"
        );
        session
    }

    pub fn process_answer(
        &self,
        session: &mut SessionState,
        mastery: &mut MasteryRecord,
        event: &AnswerEvent,
    ) -> EngineResult<AnswerOutcome> {
        session.ensure_active()?;

        let mut window = session.window.clone();
        window.record(event.is_correct);

        let recommendation = self.adjuster.recommend(
            session.current_difficulty,
            event.is_correct,
            event.response_time_seconds,
            &window,
            mastery.value(),
        );

        let consistency = self.consistency.score(&window);
        let questions_answered = session.questions_answered + 1;
        let correct_answers = session.correct_answers + u32::from(event.is_correct);
        let estimate = self.mastery.estimate(
            correct_answers,
            questions_answered,
            session.current_difficulty,
            consistency,
        );

        session.record_answer(event.is_correct, &recommendation)?;
        session.mark_served(&event.item_id);

        let previous = mastery.value();
        let delta = mastery.update(estimate);

        tracing::debug!(
            session_id = %session.session_id,
            item_id = %event.item_id,
            correct = event.is_correct,
            next_difficulty = recommendation.next_difficulty,
            strategy = %recommendation.strategy,
            mastery = mastery.value(),
            "answer processed"
        );

        Ok(AnswerOutcome {
            recommendation,
            consistency,
            mastery: MasteryChange {
                previous,
                current: mastery.value(),
                delta,
            },
        })
    }

    /// Chooses and marks the next item; `None` when every pool item has been served.
    ///
    /// Before the first answer the random strategy is used around the
    /// session's starting difficulty. Randomness is drawn from the session's
    /// own stream, so picks never depend on other sessions.
    pub fn next_item<'a>(
        &self,
        session: &mut SessionState,
        pool: &'a [Item],
    ) -> Option<&'a Item> {
        let strategy = match session.last_strategy {
            Some(strategy) if session.questions_answered > 0 => strategy,
            _ => SelectionStrategy::Random,
        };

        let selected = self.selector.select(
            &mut session.selection_rng,
            pool,
            session.current_difficulty,
            strategy,
            &session.answered_item_ids,
        );

        match selected {
            Some(item) => session.mark_served(&item.id),
            None => tracing::warn!(
                session_id = %session.session_id,
                served = session.answered_item_ids.len(),
                "no unanswered item left for session"
            ),
        }
        selected
    }

    pub fn predict(
        &self,
        mastery: &MasteryRecord,
        target_difficulty: f64,
        questions_planned: u32,
    ) -> PerformancePrediction {
        self.predictor
            .predict(mastery.value(), target_difficulty, questions_planned)
    }

    pub fn analyze_velocity(&self, history: &[MasterySample]) -> VelocityReport {
        self.velocity.analyze(history)
    }

    /// Calibrated metrics for every item of a topic.
    pub fn topic_pool<S: QuestionStore + ?Sized>(
        &self,
        store: &S,
        topic_id: &str,
    ) -> EngineResult<Vec<Item>> {
        self.calibrator.topic_metrics(store, topic_id)
    }

    pub fn recalibrate_topic<S: QuestionStore + ?Sized>(
        &self,
        store: &S,
        topic_id: &str,
    ) -> EngineResult<usize> {
        self.calibrator.recalibrate_topic(store, topic_id)
    }
}
