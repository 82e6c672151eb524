use serde::Serialize;
use utoipa::ToSchema;

use crate::predict::grid::TimeSample;
use crate::predict::visibility::TimeOfDay;

/// A predicted satellite pass, fully classified
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Pass {
    pub satellite: String,
    pub start: TimeSample,
    pub max: TimeSample,
    pub end: TimeSample,
    pub start_azimuth_deg: f64,
    pub max_azimuth_deg: f64,
    pub end_azimuth_deg: f64,
    pub start_elevation_deg: f64,
    pub end_elevation_deg: f64,
    pub max_elevation_deg: f64,
    pub duration_minutes: f64,
    pub sun_elevation_deg: f64,
    pub observer_dark: bool,
    pub time_category: TimeOfDay,
    pub potentially_visible: bool,
    pub magnitude: f64,
}

/// Why a satellite contributed no passes to a catalog
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SkippedSatellite {
    pub name: String,
    pub reason: String,
}

/// Result of analyzing one satellite over the forecast grid
#[derive(Debug, Clone)]
pub enum SatelliteOutcome {
    Predicted { name: String, passes: Vec<Pass> },
    Skipped(SkippedSatellite),
}
