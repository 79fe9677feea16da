//! Learning Velocity
//!
//! Mastery change per day over the most recent samples of a learner's
//! history, the resulting trend and a suggested intervention.
//!
//! The timeframe counts samples, not calendar days: the last `timeframe`
//! samples are taken and the velocity divides by the real elapsed days
//! between the first and last of them.

use chrono::{DateTime, NaiveDate, Utc};

use crate::config::VelocityParams;
use crate::error::{EngineError, EngineResult};
use crate::types::{Intervention, LearningTrend, MasterySample, VelocityReport};

const MILLIS_PER_DAY: f64 = 1000.0 * 60.0 * 60.0 * 24.0;

pub struct LearningVelocityAnalyzer {
    params: VelocityParams,
}

impl LearningVelocityAnalyzer {
    pub fn new(params: VelocityParams) -> Self {
        Self { params }
    }

    pub fn analyze(&self, history: &[MasterySample]) -> VelocityReport {
        self.analyze_with_timeframe(history, self.params.timeframe)
    }

    /// `timeframe == 0` uses the whole history.
    pub fn analyze_with_timeframe(
        &self,
        history: &[MasterySample],
        timeframe: usize,
    ) -> VelocityReport {
        if history.len() < 2 {
            return VelocityReport::default();
        }

        let start = if timeframe == 0 {
            0
        } else {
            history.len().saturating_sub(timeframe)
        };
        let recent = &history[start..];
        let (oldest, newest) = match (recent.first(), recent.last()) {
            (Some(oldest), Some(newest)) => (oldest, newest),
            _ => return VelocityReport::default(),
        };

        let days = (newest.date - oldest.date).num_milliseconds() as f64 / MILLIS_PER_DAY;
        let velocity = if days > 0.0 {
            (newest.mastery - oldest.mastery) / days
        } else {
            0.0
        };

        let p = &self.params;
        let trend = if velocity > p.trend_threshold {
            LearningTrend::Improving
        } else if velocity < -p.trend_threshold {
            LearningTrend::Declining
        } else {
            LearningTrend::Stable
        };

        let intervention = match trend {
            LearningTrend::Declining => Some(Intervention::ReviewFundamentals),
            LearningTrend::Stable if newest.mastery > p.advance_mastery => {
                Some(Intervention::AdvanceTopics)
            }
            LearningTrend::Stable if newest.mastery < p.support_mastery => {
                Some(Intervention::AdditionalSupport)
            }
            _ => None,
        };

        tracing::debug!(
            samples = recent.len(),
            days,
            velocity,
            trend = trend.as_str(),
            "learning velocity analyzed"
        );

        VelocityReport {
            velocity,
            trend,
            intervention,
        }
    }
}

impl Default for LearningVelocityAnalyzer {
    fn default() -> Self {
        Self::new(VelocityParams::default())
    }
}

/// Parses an RFC 3339 timestamp or a plain `YYYY-MM-DD` date (midnight UTC).
pub fn parse_sample_date(raw: &str) -> EngineResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| EngineError::InvalidDate(raw.to_string()))
}

impl MasterySample {
    pub fn parse(date: &str, mastery: f64) -> EngineResult<Self> {
        Ok(Self::new(parse_sample_date(date)?, mastery))
    }
}
