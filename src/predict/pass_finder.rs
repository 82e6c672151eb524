use std::ops::Range;

use crate::predict::error::PredictError;
use crate::predict::grid::ForecastGrid;
use crate::predict::magnitude::MagnitudeModel;
use crate::predict::propagation::PositionSample;
use crate::predict::segment::segment_passes;
use crate::predict::sun::{SolarElevationCache, SolarModel};
use crate::predict::types::Pass;
use crate::predict::visibility::classify;

/// Sample indices of one qualifying above-horizon window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassWindow {
    pub start: usize,
    pub max: usize,
    /// Last above-horizon sample (inclusive)
    pub end: usize,
    pub samples: usize,
    pub max_elevation_deg: f64,
}

/// Extract the extrema of `positions[range]`, or `None` if the window never
/// reaches `min_elevation`. Exact ties keep the earliest maximum.
pub fn summarize_window(
    range: Range<usize>,
    positions: &[PositionSample],
    min_elevation: f64,
) -> Option<PassWindow> {
    let window = positions.get(range.clone())?;
    let first = window.first()?;

    let mut max_offset = 0;
    let mut max_el = first.elevation_deg;
    for (offset, sample) in window.iter().enumerate().skip(1) {
        if sample.elevation_deg > max_el {
            max_el = sample.elevation_deg;
            max_offset = offset;
        }
    }

    if max_el < min_elevation {
        return None;
    }

    Some(PassWindow {
        start: range.start,
        max: range.start + max_offset,
        end: range.end - 1,
        samples: range.len(),
        max_elevation_deg: max_el,
    })
}

/// Find and classify all passes of one satellite over the forecast grid
pub fn find_passes<M: SolarModel>(
    satellite: &str,
    positions: &[PositionSample],
    grid: &ForecastGrid,
    min_elevation: f64,
    sun: &mut SolarElevationCache<M>,
    magnitudes: &MagnitudeModel,
) -> Result<Vec<Pass>, PredictError> {
    if positions.len() != grid.len() {
        return Err(PredictError::SeriesMismatch {
            positions: positions.len(),
            grid: grid.len(),
        });
    }

    let above: Vec<bool> = positions.iter().map(PositionSample::above_horizon).collect();
    let times = grid.samples();

    let passes = segment_passes(&above)
        .into_iter()
        .filter_map(|range| summarize_window(range, positions, min_elevation))
        .map(|window| {
            let start = &times[window.start];
            let sun_elevation = sun.elevation_deg(start.utc);
            let visibility = classify(start.local_hour(), sun_elevation);

            Pass {
                satellite: satellite.to_string(),
                start: start.clone(),
                max: times[window.max].clone(),
                end: times[window.end].clone(),
                start_azimuth_deg: positions[window.start].azimuth_deg,
                max_azimuth_deg: positions[window.max].azimuth_deg,
                end_azimuth_deg: positions[window.end].azimuth_deg,
                start_elevation_deg: positions[window.start].elevation_deg,
                end_elevation_deg: positions[window.end].elevation_deg,
                max_elevation_deg: window.max_elevation_deg,
                duration_minutes: window.samples as f64 * grid.step_minutes(),
                sun_elevation_deg: sun_elevation,
                observer_dark: visibility.observer_dark,
                time_category: visibility.category,
                potentially_visible: visibility.potentially_visible,
                magnitude: magnitudes.estimate(satellite, window.max_elevation_deg),
            }
        })
        .collect();

    Ok(passes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::visibility::TimeOfDay;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    struct FixedSun(f64);

    impl SolarModel for FixedSun {
        fn elevation_deg(&self, _at: DateTime<Utc>) -> f64 {
            self.0
        }
    }

    fn series(elevations: &[f64]) -> Vec<PositionSample> {
        elevations
            .iter()
            .enumerate()
            .map(|(i, &el)| PositionSample {
                elevation_deg: el,
                azimuth_deg: 100.0 + i as f64,
                range_km: 1000.0,
            })
            .collect()
    }

    fn grid_at(hour: u32, samples: i64, tz: chrono_tz::Tz) -> ForecastGrid {
        let start = tz
            .with_ymd_and_hms(2026, 1, 15, hour, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        ForecastGrid::between(
            start,
            start + Duration::minutes(3 * samples),
            Duration::minutes(3),
            tz,
        )
        .unwrap()
    }

    fn run(elevations: &[f64], min_elevation: f64, hour: u32, sun_el: f64) -> Vec<Pass> {
        let grid = grid_at(hour, elevations.len() as i64, chrono_tz::UTC);
        let mut sun = SolarElevationCache::new(FixedSun(sun_el));
        find_passes(
            "ISS (ZARYA)",
            &series(elevations),
            &grid,
            min_elevation,
            &mut sun,
            &MagnitudeModel::default(),
        )
        .unwrap()
    }

    #[test]
    fn single_pass_over_threshold() {
        let passes = run(&[0.0, 0.0, 5.0, 40.0, 8.0, 0.0, 0.0], 10.0, 20, -20.0);
        assert_eq!(passes.len(), 1);

        let pass = &passes[0];
        let grid = grid_at(20, 7, chrono_tz::UTC);
        assert_eq!(pass.max_elevation_deg, 40.0);
        assert_eq!(pass.max, grid.samples()[3]);
        assert_eq!(pass.start, grid.samples()[2]);
        assert_eq!(pass.end, grid.samples()[4]);
        assert_eq!(pass.duration_minutes, 9.0);
        assert_eq!(pass.start_azimuth_deg, 102.0);
        assert_eq!(pass.max_azimuth_deg, 103.0);
        assert_eq!(pass.end_azimuth_deg, 104.0);
        assert_eq!(pass.start_elevation_deg, 5.0);
        assert_eq!(pass.end_elevation_deg, 8.0);
        assert_eq!(pass.time_category, TimeOfDay::Evening);
        assert!(pass.potentially_visible);
    }

    #[test]
    fn sub_threshold_pass_is_dropped() {
        let passes = run(&[0.0, 0.0, 5.0, 40.0, 8.0, 0.0, 0.0], 50.0, 20, -20.0);
        assert!(passes.is_empty());
    }

    #[test]
    fn open_pass_is_truncated_at_grid_end() {
        let passes = run(&[0.0, 0.0, 0.0, 0.0, 12.0, 25.0, 30.0], 10.0, 20, -20.0);
        assert_eq!(passes.len(), 1);
        let grid = grid_at(20, 7, chrono_tz::UTC);
        assert_eq!(passes[0].end, grid.samples()[6]);
        assert_eq!(passes[0].max, grid.samples()[6]);
        assert_eq!(passes[0].duration_minutes, 9.0);
    }

    #[test]
    fn tied_maximum_keeps_first_sample() {
        let positions = series(&[0.0, 20.0, 35.0, 35.0, 35.0, 10.0, 0.0]);
        let window = summarize_window(1..6, &positions, 10.0).unwrap();
        assert_eq!(window.max, 2);
        assert_eq!(window.start, 1);
        assert_eq!(window.end, 5);
        assert_eq!(window.samples, 5);
    }

    #[test]
    fn every_pass_meets_threshold() {
        let elevations = [1.0, 9.9, 0.0, 10.0, 0.0, 45.0, 12.0, 0.0, 3.0];
        for threshold in [0.0, 5.0, 10.0, 11.0, 50.0] {
            for pass in run(&elevations, threshold, 2, -20.0) {
                assert!(pass.max_elevation_deg >= threshold);
                assert!(pass.max_elevation_deg >= pass.start_elevation_deg);
                assert!(pass.max_elevation_deg >= pass.end_elevation_deg);
                assert!(pass.start.utc <= pass.max.utc && pass.max.utc <= pass.end.utc);
            }
        }
        assert_eq!(run(&elevations, 10.0, 2, -20.0).len(), 2);
        assert_eq!(run(&elevations, 0.0, 2, -20.0).len(), 4);
    }

    #[test]
    fn morning_boundary_hour() {
        let passes = run(&[0.0, 30.0, 0.0], 10.0, 8, -8.0);
        assert_eq!(passes[0].time_category, TimeOfDay::Morning);
        assert!(passes[0].potentially_visible);
    }

    #[test]
    fn category_uses_local_start_time() {
        // 10:00 UTC is 19:00 in Tokyo
        let grid = grid_at(19, 3, chrono_tz::Asia::Tokyo);
        assert_eq!(grid.samples()[0].utc.format("%H").to_string(), "10");
        let mut sun = SolarElevationCache::new(FixedSun(-12.0));
        let passes = find_passes(
            "CSS (TIANHE)",
            &series(&[0.0, 30.0, 0.0]),
            &grid,
            10.0,
            &mut sun,
            &MagnitudeModel::default(),
        )
        .unwrap();
        assert_eq!(passes[0].time_category, TimeOfDay::Evening);
    }

    #[test]
    fn twilight_blocks_visibility() {
        let passes = run(&[0.0, 30.0, 0.0], 10.0, 19, -3.0);
        assert!(!passes[0].observer_dark);
        assert!(!passes[0].potentially_visible);
        assert_eq!(passes[0].sun_elevation_deg, -3.0);
    }

    /// Dark until `cutoff`, daylight from then on
    struct SunriseAt {
        cutoff: DateTime<Utc>,
    }

    impl SolarModel for SunriseAt {
        fn elevation_deg(&self, at: DateTime<Utc>) -> f64 {
            if at < self.cutoff {
                -10.0
            } else {
                5.0
            }
        }
    }

    #[test]
    fn sun_is_sampled_at_pass_start() {
        let grid = grid_at(20, 10, chrono_tz::UTC);
        let cutoff = grid.samples()[0].utc + Duration::minutes(10);
        let mut sun = SolarElevationCache::new(SunriseAt { cutoff });

        // Rises at 20:03 in the dark, peaks at 20:18 and sets at 20:24 after the cutoff
        let passes = find_passes(
            "ISS (ZARYA)",
            &series(&[0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 50.0, 20.0, 5.0, 0.0]),
            &grid,
            10.0,
            &mut sun,
            &MagnitudeModel::default(),
        )
        .unwrap();

        assert_eq!(passes.len(), 1);
        let pass = &passes[0];
        assert!(pass.max.utc > cutoff && pass.end.utc > cutoff);
        assert_eq!(pass.sun_elevation_deg, -10.0);
        assert!(pass.observer_dark);
        assert!(pass.potentially_visible);
        assert_eq!(sun.len(), 1);
    }

    #[test]
    fn magnitude_uses_name_and_peak() {
        let passes = run(&[0.0, 60.0, 0.0], 10.0, 22, -20.0);
        assert!((passes[0].magnitude - (-4.0)).abs() < 1e-9);
    }

    #[test]
    fn mismatched_series_is_an_error() {
        let grid = grid_at(20, 5, chrono_tz::UTC);
        let mut sun = SolarElevationCache::new(FixedSun(-20.0));
        let result = find_passes(
            "X",
            &series(&[0.0, 1.0]),
            &grid,
            0.0,
            &mut sun,
            &MagnitudeModel::default(),
        );
        assert!(matches!(
            result,
            Err(PredictError::SeriesMismatch { positions: 2, grid: 5 })
        ));
    }
}
