use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::predict::{ForecastSettings, GroundStation, MagnitudeModel, MAX_DAYS_AHEAD};
use crate::tle::{default_sources, CatalogSource};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Latitude {0} is outside [-90, 90]")]
    Latitude(f64),
    #[error("Longitude {0} is outside [-180, 180]")]
    Longitude(f64),
    #[error("Unknown time zone: {0}")]
    UnknownTimezone(String),
    #[error("days_ahead {0} is outside 1..={max}", max = MAX_DAYS_AHEAD)]
    DaysAhead(u32),
    #[error("Minimum elevation {0} is outside [-90, 90]")]
    MinElevation(f64),
    #[error("Grid step must be positive")]
    Step,
    #[error("Duration out of range: {0}")]
    DurationRange(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub observer: ObserverConfig,
    #[serde(default)]
    pub satellites: SatellitesConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub magnitude: MagnitudeConfig,
    #[serde(default)]
    pub web: WebConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObserverConfig {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude_m: f64,
    pub timezone: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SatellitesConfig {
    #[serde(default = "default_min_elevation")]
    pub min_elevation: f64,
    #[serde(default = "default_days_ahead")]
    pub days_ahead: u32,
    #[serde(default = "default_step", deserialize_with = "deserialize_duration")]
    pub step: Duration,
}

impl Default for SatellitesConfig {
    fn default() -> Self {
        Self {
            min_elevation: default_min_elevation(),
            days_ahead: default_days_ahead(),
            step: default_step(),
        }
    }
}

fn default_min_elevation() -> f64 {
    10.0
}

fn default_days_ahead() -> u32 {
    1
}

fn default_step() -> Duration {
    Duration::from_secs(3 * 60)
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    #[serde(default = "default_max_age", deserialize_with = "deserialize_duration")]
    pub max_age: Duration,
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(
        default = "default_retry_delay",
        deserialize_with = "deserialize_duration"
    )]
    pub retry_delay: Duration,
    #[serde(default = "default_timeout", deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
    #[serde(default = "default_sources")]
    pub sources: Vec<CatalogSource>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            max_age: default_max_age(),
            retries: default_retries(),
            retry_delay: default_retry_delay(),
            timeout: default_timeout(),
            sources: default_sources(),
        }
    }
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("tle_cache")
}

fn default_max_age() -> Duration {
    Duration::from_secs(24 * 3600)
}

fn default_retries() -> u32 {
    3
}

fn default_retry_delay() -> Duration {
    Duration::from_secs(5)
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

#[derive(Debug, Clone, Deserialize)]
pub struct MagnitudeConfig {
    #[serde(default = "default_rocket_bodies")]
    pub rocket_bodies: Vec<String>,
    #[serde(default = "default_space_stations")]
    pub space_stations: Vec<String>,
}

impl Default for MagnitudeConfig {
    fn default() -> Self {
        Self {
            rocket_bodies: default_rocket_bodies(),
            space_stations: default_space_stations(),
        }
    }
}

fn default_rocket_bodies() -> Vec<String> {
    ["CZ-4B", "CZ-2C", "SL-", "R/B"].map(String::from).to_vec()
}

fn default_space_stations() -> Vec<String> {
    ["CSS", "TIANHE", "TIANGONG"].map(String::from).to_vec()
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    pub fn ground_station(&self) -> GroundStation {
        GroundStation::new(
            self.observer.latitude,
            self.observer.longitude,
            self.observer.altitude_m,
        )
    }

    /// Check everything the forecast assumes; any failure here is fatal
    pub fn forecast_settings(&self) -> Result<ForecastSettings, ConfigError> {
        let observer = &self.observer;
        if !(-90.0..=90.0).contains(&observer.latitude) {
            return Err(ConfigError::Latitude(observer.latitude));
        }
        if !(-180.0..=180.0).contains(&observer.longitude) {
            return Err(ConfigError::Longitude(observer.longitude));
        }
        let timezone = observer
            .timezone
            .trim()
            .parse::<chrono_tz::Tz>()
            .map_err(|_| ConfigError::UnknownTimezone(observer.timezone.clone()))?;

        let satellites = &self.satellites;
        if !(1..=MAX_DAYS_AHEAD).contains(&satellites.days_ahead) {
            return Err(ConfigError::DaysAhead(satellites.days_ahead));
        }
        // NaN fails the range check too
        if !(-90.0..=90.0).contains(&satellites.min_elevation) {
            return Err(ConfigError::MinElevation(satellites.min_elevation));
        }
        if satellites.step.is_zero() {
            return Err(ConfigError::Step);
        }
        let step = chrono::Duration::from_std(satellites.step)
            .map_err(|e| ConfigError::DurationRange(e.to_string()))?;

        Ok(ForecastSettings {
            station: self.ground_station(),
            timezone,
            min_elevation: satellites.min_elevation,
            days_ahead: satellites.days_ahead,
            step,
            magnitudes: MagnitudeModel::new(
                self.magnitude.rocket_bodies.clone(),
                self.magnitude.space_stations.clone(),
            ),
        })
    }
}
