use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

use crate::predict::catalog::{CatalogBuilder, PassCatalog};
use crate::predict::error::PredictError;
use crate::predict::grid::ForecastGrid;
use crate::predict::ground_station::GroundStation;
use crate::predict::magnitude::MagnitudeModel;
use crate::predict::propagation::Sgp4Propagator;
use crate::predict::sun::LowPrecisionSun;
use crate::tle::TleSet;

/// Longest forecast horizon accepted from config, CLI or HTTP
pub const MAX_DAYS_AHEAD: u32 = 14;

/// Validated inputs of one forecast run
#[derive(Debug, Clone)]
pub struct ForecastSettings {
    pub station: GroundStation,
    pub timezone: Tz,
    pub min_elevation: f64,
    pub days_ahead: u32,
    pub step: Duration,
    pub magnitudes: MagnitudeModel,
}

/// Predict and classify passes for every satellite over `[start, start + days_ahead)`
pub fn run_forecast(
    settings: &ForecastSettings,
    satellites: &[TleSet],
    start: DateTime<Utc>,
) -> Result<PassCatalog, PredictError> {
    let grid = ForecastGrid::new(start, settings.days_ahead, settings.step, settings.timezone)?;
    log::info!(
        "Forecasting {} satellites over {} samples ({} min step)",
        satellites.len(),
        grid.len(),
        grid.step_minutes()
    );

    let builder = CatalogBuilder::new(
        Sgp4Propagator::new(settings.station),
        LowPrecisionSun::new(settings.station),
        grid,
        settings.min_elevation,
        settings.magnitudes.clone(),
    );
    Ok(builder.build(satellites))
}
