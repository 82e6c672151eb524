use chrono::{DateTime, Utc};
use serde::Serialize;
use sgp4::{Constants, Elements};

use crate::predict::error::PredictError;
use crate::predict::ground_station::{teme_to_ecef, GroundStation};
use crate::tle::TleSet;

/// Topocentric satellite state at one grid instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositionSample {
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
    pub range_km: f64,
}

impl PositionSample {
    pub fn above_horizon(&self) -> bool {
        self.elevation_deg > 0.0
    }
}

/// Produces a satellite's position series over a set of instants
pub trait Propagator {
    fn propagate(
        &self,
        tle: &TleSet,
        times: &[DateTime<Utc>],
    ) -> Result<Vec<PositionSample>, PredictError>;
}

pub struct Sgp4Propagator {
    station: GroundStation,
}

impl Sgp4Propagator {
    pub fn new(station: GroundStation) -> Self {
        Self { station }
    }
}

impl Propagator for Sgp4Propagator {
    fn propagate(
        &self,
        tle: &TleSet,
        times: &[DateTime<Utc>],
    ) -> Result<Vec<PositionSample>, PredictError> {
        let elements = Elements::from_tle(
            Some(tle.name.clone()),
            tle.line1.as_bytes(),
            tle.line2.as_bytes(),
        )
        .map_err(|e| PredictError::InvalidElements(e.to_string()))?;
        let constants = Constants::from_elements(&elements)
            .map_err(|e| PredictError::InvalidElements(e.to_string()))?;

        times
            .iter()
            .map(|t| propagate_sample(&self.station, &elements, &constants, *t))
            .collect()
    }
}

pub fn propagate_sample(
    station: &GroundStation,
    elements: &Elements,
    constants: &Constants,
    timestamp: DateTime<Utc>,
) -> Result<PositionSample, PredictError> {
    let minutes = elements
        .datetime_to_minutes_since_epoch(&timestamp.naive_utc())
        .map_err(|e| PredictError::Propagation(e.to_string()))?;

    let prediction = constants
        .propagate(minutes)
        .map_err(|e| PredictError::Propagation(e.to_string()))?;

    let sat_ecef = teme_to_ecef(prediction.position, sidereal_time(timestamp));
    let (elevation, azimuth, range_km) = station.look_at(sat_ecef);

    Ok(PositionSample {
        elevation_deg: elevation,
        azimuth_deg: azimuth,
        range_km,
    })
}

/// Greenwich sidereal angle in radians
pub fn sidereal_time(timestamp: DateTime<Utc>) -> f64 {
    sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&timestamp.naive_utc()))
}
