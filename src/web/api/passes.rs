use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::predict::{run_forecast, Pass, SkippedSatellite, MAX_DAYS_AHEAD};
use crate::web::api::error::{ApiError, ApiResult};
use crate::web::server::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PassesQuery {
    /// Forecast horizon in days (1-14)
    pub days: Option<u32>,
    /// Minimum peak elevation in degrees
    pub min_elevation: Option<f64>,
    /// Only return potentially visible passes
    #[serde(default)]
    pub visible_only: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PassesResponse {
    pub passes: Vec<Pass>,
    pub skipped: Vec<SkippedSatellite>,
    pub satellite_count: usize,
    pub visible_count: usize,
}

#[utoipa::path(
    get,
    path = "/api/passes",
    tag = "passes",
    params(PassesQuery),
    responses(
        (status = 200, description = "Passes sorted by start time", body = PassesResponse),
        (status = 400, description = "Invalid parameters"),
        (status = 503, description = "No satellites loaded")
    )
)]
pub async fn list_passes(
    State(state): State<AppState>,
    Query(query): Query<PassesQuery>,
) -> ApiResult<Json<PassesResponse>> {
    let mut settings = (*state.settings).clone();

    if let Some(days) = query.days {
        if days == 0 || days > MAX_DAYS_AHEAD {
            return Err(ApiError::Validation(format!(
                "days must be between 1 and {}",
                MAX_DAYS_AHEAD
            )));
        }
        settings.days_ahead = days;
    }

    if let Some(min_el) = query.min_elevation {
        if !(-90.0..=90.0).contains(&min_el) {
            return Err(ApiError::Validation(
                "min_elevation must be between -90 and 90".into(),
            ));
        }
        settings.min_elevation = min_el;
    }

    let satellites = state.satellites.read().await;
    if satellites.is_empty() {
        return Err(ApiError::NoSatellites);
    }

    let catalog = run_forecast(&settings, &satellites, Utc::now())?;
    let visible_count = catalog.visible_count();
    let catalog = if query.visible_only {
        catalog.into_visible()
    } else {
        catalog
    };

    Ok(Json(PassesResponse {
        passes: catalog.passes,
        skipped: catalog.skipped,
        satellite_count: catalog.satellite_count,
        visible_count,
    }))
}
