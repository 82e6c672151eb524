use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};

use crate::predict::ground_station::{teme_to_ecef, GroundStation};
use crate::predict::propagation::sidereal_time;

const AU_KM: f64 = 149_597_870.7;
const CACHE_RESOLUTION_SECONDS: i64 = 600;

/// Solar elevation above the observer's horizon, in degrees
pub trait SolarModel {
    fn elevation_deg(&self, at: DateTime<Utc>) -> f64;
}

/// Low-precision solar coordinates (Astronomical Almanac), good to about 0.01°
pub struct LowPrecisionSun {
    station: GroundStation,
}

impl LowPrecisionSun {
    pub fn new(station: GroundStation) -> Self {
        Self { station }
    }
}

impl SolarModel for LowPrecisionSun {
    fn elevation_deg(&self, at: DateTime<Utc>) -> f64 {
        let sun_teme = sun_position_km(at);
        let sun_ecef = teme_to_ecef(sun_teme, sidereal_time(at));
        let (elevation, _, _) = self.station.look_at(sun_ecef);
        elevation
    }
}

/// Geocentric equatorial position of the Sun, true equator of date
fn sun_position_km(at: DateTime<Utc>) -> [f64; 3] {
    let n = sgp4::julian_years_since_j2000(&at.naive_utc()) * 365.25;

    let mean_longitude = (280.460 + 0.985_647_4 * n).rem_euclid(360.0);
    let mean_anomaly = (357.528 + 0.985_600_3 * n).rem_euclid(360.0).to_radians();
    let ecliptic_longitude = (mean_longitude
        + 1.915 * mean_anomaly.sin()
        + 0.020 * (2.0 * mean_anomaly).sin())
    .to_radians();
    let obliquity = (23.439 - 0.000_000_4 * n).to_radians();
    let distance_au =
        1.000_14 - 0.016_71 * mean_anomaly.cos() - 0.000_14 * (2.0 * mean_anomaly).cos();

    let r = distance_au * AU_KM;
    [
        r * ecliptic_longitude.cos(),
        r * obliquity.cos() * ecliptic_longitude.sin(),
        r * obliquity.sin() * ecliptic_longitude.sin(),
    ]
}

/// Memoizes solar elevation per 10-minute bucket for the lifetime of one forecast run.
///
/// Every query is answered with the elevation at the nearest bucket boundary, so the
/// result never depends on which instant first populated a bucket.
pub struct SolarElevationCache<M> {
    model: M,
    entries: HashMap<i64, f64>,
}

impl<M: SolarModel> SolarElevationCache<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            entries: HashMap::new(),
        }
    }

    pub fn elevation_deg(&mut self, at: DateTime<Utc>) -> f64 {
        let bucket = bucket_of(at);
        let model = &self.model;
        *self
            .entries
            .entry(bucket)
            .or_insert_with(|| model.elevation_deg(bucket_instant(bucket)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

fn bucket_of(at: DateTime<Utc>) -> i64 {
    (at.timestamp() + CACHE_RESOLUTION_SECONDS / 2).div_euclid(CACHE_RESOLUTION_SECONDS)
}

fn bucket_instant(bucket: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(bucket * CACHE_RESOLUTION_SECONDS, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}
