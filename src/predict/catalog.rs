use serde::Serialize;
use utoipa::ToSchema;

use crate::predict::grid::ForecastGrid;
use crate::predict::magnitude::MagnitudeModel;
use crate::predict::pass_finder::find_passes;
use crate::predict::propagation::Propagator;
use crate::predict::sun::{SolarElevationCache, SolarModel};
use crate::predict::types::{Pass, SatelliteOutcome, SkippedSatellite};
use crate::predict::visibility::TimeOfDay;
use crate::tle::TleSet;

/// All passes of one forecast run, sorted by start time
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PassCatalog {
    pub passes: Vec<Pass>,
    pub skipped: Vec<SkippedSatellite>,
    pub satellite_count: usize,
}

impl PassCatalog {
    pub fn visible(&self) -> impl Iterator<Item = &Pass> {
        self.passes.iter().filter(|p| p.potentially_visible)
    }

    pub fn not_visible(&self) -> impl Iterator<Item = &Pass> {
        self.passes.iter().filter(|p| !p.potentially_visible)
    }

    pub fn visible_in(&self, category: TimeOfDay) -> Vec<&Pass> {
        self.visible()
            .filter(|p| p.time_category == category)
            .collect()
    }

    pub fn evening(&self) -> Vec<&Pass> {
        self.visible_in(TimeOfDay::Evening)
    }

    pub fn morning(&self) -> Vec<&Pass> {
        self.visible_in(TimeOfDay::Morning)
    }

    pub fn visible_count(&self) -> usize {
        self.visible().count()
    }

    /// Keep only potentially visible passes
    pub fn into_visible(mut self) -> Self {
        self.passes.retain(|p| p.potentially_visible);
        self
    }
}

/// Runs the per-satellite pipeline over a shared grid. The solar elevation cache
/// lives exactly as long as the builder.
pub struct CatalogBuilder<P, M> {
    propagator: P,
    sun: SolarElevationCache<M>,
    grid: ForecastGrid,
    min_elevation: f64,
    magnitudes: MagnitudeModel,
}

impl<P: Propagator, M: SolarModel> CatalogBuilder<P, M> {
    pub fn new(
        propagator: P,
        solar_model: M,
        grid: ForecastGrid,
        min_elevation: f64,
        magnitudes: MagnitudeModel,
    ) -> Self {
        Self {
            propagator,
            sun: SolarElevationCache::new(solar_model),
            grid,
            min_elevation,
            magnitudes,
        }
    }

    pub fn analyze(&mut self, tle: &TleSet) -> SatelliteOutcome {
        let times = self.grid.utc_times();
        let result = self.propagator.propagate(tle, &times).and_then(|positions| {
            find_passes(
                &tle.name,
                &positions,
                &self.grid,
                self.min_elevation,
                &mut self.sun,
                &self.magnitudes,
            )
        });

        match result {
            Ok(passes) => SatelliteOutcome::Predicted {
                name: tle.name.clone(),
                passes,
            },
            Err(e) => SatelliteOutcome::Skipped(SkippedSatellite {
                name: tle.name.clone(),
                reason: e.to_string(),
            }),
        }
    }

    pub fn build(mut self, satellites: &[TleSet]) -> PassCatalog {
        let total = satellites.len();
        let mut passes = Vec::new();
        let mut skipped = Vec::new();

        for (i, tle) in satellites.iter().enumerate() {
            log::debug!("Analyzing {} ({}/{})", tle.name, i + 1, total);
            match self.analyze(tle) {
                SatelliteOutcome::Predicted {
                    name,
                    passes: found,
                } => {
                    log::debug!("{}: {} passes", name, found.len());
                    passes.extend(found);
                }
                SatelliteOutcome::Skipped(skip) => {
                    log::warn!("Skipping {}: {}", skip.name, skip.reason);
                    skipped.push(skip);
                }
            }
        }

        // Stable: ties keep satellite processing order
        passes.sort_by_key(|p| p.start.utc);

        log::info!(
            "{} passes from {} satellites ({} skipped, {} solar lookups cached)",
            passes.len(),
            total,
            skipped.len(),
            self.sun.len()
        );

        PassCatalog {
            passes,
            skipped,
            satellite_count: total,
        }
    }
}
