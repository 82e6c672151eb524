mod catalog;
mod error;
mod forecast;
mod grid;
mod ground_station;
mod magnitude;
mod pass_finder;
mod propagation;
mod segment;
mod sun;
mod types;
mod visibility;

pub use catalog::PassCatalog;
pub use error::PredictError;
pub use forecast::{run_forecast, ForecastSettings, MAX_DAYS_AHEAD};
pub use grid::TimeSample;
pub use ground_station::GroundStation;
pub use magnitude::MagnitudeModel;
pub use types::{Pass, SkippedSatellite};
pub use visibility::TimeOfDay;
