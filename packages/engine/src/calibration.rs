//! Item Calibration
//!
//! Recomputes an item's empirical difficulty and discrimination index from
//! its accumulated response log, and aggregates the per-item metrics the
//! question selector consumes.
//!
//! - difficulty: `6 - 5 * success_rate`, rounded to one decimal, clamped to [1, 5]
//! - discrimination: success rate of the top third of responders (ranked by
//!   their session accuracy) minus that of the bottom third
//!
//! Both fall back to neutral defaults when the log is too small.

use rayon::prelude::*;

use crate::config::CalibrationParams;
use crate::error::EngineResult;
use crate::sanitize::{clamp_difficulty, clamp_unit, round_tenth};
use crate::store::QuestionStore;
use crate::types::{Item, ResponseRecord};

/// A response joined with the overall accuracy of its session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredResponse {
    pub correct: bool,
    pub session_accuracy: f64,
}

pub struct ItemCalibrator {
    params: CalibrationParams,
}

impl ItemCalibrator {
    pub fn new(params: CalibrationParams) -> Self {
        Self { params }
    }

    pub fn calibrate_difficulty(&self, responses: &[ResponseRecord]) -> f64 {
        if responses.len() < self.params.min_difficulty_responses || responses.is_empty() {
            return self.params.default_difficulty;
        }
        let success_rate = success_rate(responses.iter().map(|r| r.correct));
        clamp_difficulty(round_tenth(6.0 - success_rate * 5.0))
    }

    pub fn discrimination_index(&self, responses: &[ScoredResponse]) -> f64 {
        if responses.len() < self.params.min_discrimination_responses {
            return self.params.default_discrimination;
        }

        let group = responses.len() / 3;
        if group == 0 {
            return self.params.default_discrimination;
        }

        let mut ranked = responses.to_vec();
        // stable: equal accuracies keep log order
        ranked.sort_by(|a, b| {
            b.session_accuracy
                .partial_cmp(&a.session_accuracy)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let top = success_rate(ranked[..group].iter().map(|r| r.correct));
        let bottom = success_rate(ranked[ranked.len() - group..].iter().map(|r| r.correct));

        discrimination_from_rates(top, bottom)
    }

    /// Current metrics for `item`, recomputed from the store's response log.
    pub fn item_metrics<S: QuestionStore + ?Sized>(
        &self,
        store: &S,
        item: &Item,
    ) -> EngineResult<Item> {
        let responses = store.responses(&item.id)?;
        let p = &self.params;

        let (success, average_time) = if responses.is_empty() {
            (p.default_success_rate, p.default_response_time_seconds)
        } else {
            let total_time: f64 = responses.iter().map(|r| r.response_time_seconds).sum();
            (
                success_rate(responses.iter().map(|r| r.correct)),
                total_time / responses.len() as f64,
            )
        };

        let scored = self.score_responses(store, &responses)?;

        Ok(Item {
            id: item.id.clone(),
            difficulty: self.calibrate_difficulty(&responses),
            average_response_time_seconds: average_time,
            success_rate: clamp_unit(success),
            discrimination_index: self.discrimination_index(&scored),
        })
    }

    /// Metrics for every item of a topic, computed in parallel.
    pub fn topic_metrics<S: QuestionStore + ?Sized>(
        &self,
        store: &S,
        topic_id: &str,
    ) -> EngineResult<Vec<Item>> {
        let items = store.items(topic_id)?;
        items
            .par_iter()
            .map(|item| self.item_metrics(store, item))
            .collect()
    }

    /// Writes the recalibrated difficulty of one item back to the store.
    pub fn recalibrate_item<S: QuestionStore + ?Sized>(
        &self,
        store: &S,
        item_id: &str,
    ) -> EngineResult<f64> {
        let responses = store.responses(item_id)?;
        let difficulty = self.calibrate_difficulty(&responses);
        store.set_item_difficulty(item_id, difficulty)?;

        tracing::info!(
            item_id = %item_id,
            responses = responses.len(),
            difficulty,
            "item difficulty recalibrated"
        );
        Ok(difficulty)
    }

    /// Recalibrates every item of a topic; returns how many were written.
    pub fn recalibrate_topic<S: QuestionStore + ?Sized>(
        &self,
        store: &S,
        topic_id: &str,
    ) -> EngineResult<usize> {
        let items = store.items(topic_id)?;
        let written = items
            .par_iter()
            .map(|item| {
                self.recalibrate_item(store, &item.id).map_err(|err| {
                    tracing::warn!(error = %err, item_id = %item.id, "recalibration failed");
                    err
                })
            })
            .collect::<EngineResult<Vec<f64>>>()?;
        Ok(written.len())
    }

    /// Joins responses with their session's accuracy; responses of unknown sessions are dropped.
    fn score_responses<S: QuestionStore + ?Sized>(
        &self,
        store: &S,
        responses: &[ResponseRecord],
    ) -> EngineResult<Vec<ScoredResponse>> {
        let mut scored = Vec::with_capacity(responses.len());
        for response in responses {
            if let Some(totals) = store.session_totals(&response.session_id)? {
                scored.push(ScoredResponse {
                    correct: response.correct,
                    session_accuracy: totals.accuracy(),
                });
            }
        }
        Ok(scored)
    }
}

impl Default for ItemCalibrator {
    fn default() -> Self {
        Self::new(CalibrationParams::default())
    }
}

pub fn discrimination_from_rates(top_success_rate: f64, bottom_success_rate: f64) -> f64 {
    clamp_unit(top_success_rate - bottom_success_rate)
}

fn success_rate(outcomes: impl Iterator<Item = bool>) -> f64 {
    let (correct, total) = outcomes.fold((0usize, 0usize), |(c, t), ok| (c + ok as usize, t + 1));
    if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    }
}
