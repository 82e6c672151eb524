use chrono::{DateTime, Duration, Timelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use utoipa::ToSchema;

use crate::predict::error::PredictError;

/// One instant of the forecast window, in UTC and observer-local time
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TimeSample {
    pub utc: DateTime<Utc>,
    #[schema(value_type = String, format = DateTime)]
    pub local: DateTime<Tz>,
}

impl TimeSample {
    pub fn new(utc: DateTime<Utc>, tz: Tz) -> Self {
        Self {
            utc,
            local: utc.with_timezone(&tz),
        }
    }

    pub fn local_hour(&self) -> u32 {
        self.local.hour()
    }
}

/// Fixed-interval sampling of `[start, end)` shared by every satellite in a run
#[derive(Debug, Clone)]
pub struct ForecastGrid {
    samples: Vec<TimeSample>,
    step: Duration,
}

impl ForecastGrid {
    pub fn new(
        start: DateTime<Utc>,
        days_ahead: u32,
        step: Duration,
        tz: Tz,
    ) -> Result<Self, PredictError> {
        let end = start
            .checked_add_signed(Duration::days(i64::from(days_ahead)))
            .ok_or(PredictError::WindowOverflow(days_ahead))?;
        Self::between(start, end, step, tz)
    }

    pub fn between(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        step: Duration,
        tz: Tz,
    ) -> Result<Self, PredictError> {
        if step <= Duration::zero() {
            return Err(PredictError::InvalidStep);
        }

        let mut samples = Vec::new();
        let mut cursor = start;
        while cursor < end {
            samples.push(TimeSample::new(cursor, tz));
            cursor += step;
        }

        if samples.is_empty() {
            return Err(PredictError::EmptyGrid);
        }

        Ok(Self { samples, step })
    }

    pub fn samples(&self) -> &[TimeSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn step_minutes(&self) -> f64 {
        self.step.num_milliseconds() as f64 / 60_000.0
    }

    pub fn utc_times(&self) -> Vec<DateTime<Utc>> {
        self.samples.iter().map(|s| s.utc).collect()
    }
}
