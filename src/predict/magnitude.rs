const ISS_MAGNITUDE: f64 = -3.0;
const HUBBLE_MAGNITUDE: f64 = 2.0;
const ROCKET_BODY_MAGNITUDE: f64 = 3.5;
const SPACE_STATION_MAGNITUDE: f64 = -2.0;
const GENERIC_MAGNITUDE: f64 = 4.0;

const REFERENCE_ELEVATION_DEG: f64 = 10.0;
const BRIGHTENING_PER_DEG: f64 = 0.02;
const BRIGHTEST: f64 = -4.0;
const FAINTEST: f64 = 6.0;

/// Keyword-based brightness guess. Lower is brighter.
#[derive(Debug, Clone)]
pub struct MagnitudeModel {
    rocket_bodies: Vec<String>,
    space_stations: Vec<String>,
}

impl Default for MagnitudeModel {
    fn default() -> Self {
        Self::new(
            ["CZ-4B", "CZ-2C", "SL-", "R/B"].map(String::from).to_vec(),
            ["CSS", "TIANHE", "TIANGONG"].map(String::from).to_vec(),
        )
    }
}

impl MagnitudeModel {
    pub fn new(rocket_bodies: Vec<String>, space_stations: Vec<String>) -> Self {
        let upper = |v: Vec<String>| -> Vec<String> {
            v.into_iter().map(|k| k.to_uppercase()).collect()
        };
        Self {
            rocket_bodies: upper(rocket_bodies),
            space_stations: upper(space_stations),
        }
    }

    pub fn base_magnitude(&self, satellite_name: &str) -> f64 {
        let name = satellite_name.to_uppercase();
        let contains_any = |keywords: &[String]| keywords.iter().any(|k| name.contains(k.as_str()));

        if name.contains("ISS") {
            ISS_MAGNITUDE
        } else if name.contains("HST") || name.contains("HUBBLE") {
            HUBBLE_MAGNITUDE
        } else if contains_any(&self.rocket_bodies) {
            ROCKET_BODY_MAGNITUDE
        } else if contains_any(&self.space_stations) {
            SPACE_STATION_MAGNITUDE
        } else {
            GENERIC_MAGNITUDE
        }
    }

    pub fn estimate(&self, satellite_name: &str, max_elevation_deg: f64) -> f64 {
        let base = self.base_magnitude(satellite_name);
        let adjusted = base - (max_elevation_deg - REFERENCE_ELEVATION_DEG) * BRIGHTENING_PER_DEG;
        adjusted.clamp(BRIGHTEST, FAINTEST)
    }
}
