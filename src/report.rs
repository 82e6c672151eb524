use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::predict::{ForecastSettings, Pass, PassCatalog};

/// Plain-text report of the visible passes, bucketed for evening and morning viewing.
///
/// Visible Night passes are counted in the total but have no table of their own.
pub fn render_table(
    settings: &ForecastSettings,
    catalog: &PassCatalog,
    now: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    let station = &settings.station;

    let _ = writeln!(out, "Satellite Pass Predictor with Visibility Analysis");
    let _ = writeln!(
        out,
        "Observer: {:.4}°, {:.4}°, {}m",
        station.latitude_deg, station.longitude_deg, station.altitude_m
    );
    let _ = writeln!(out, "Timezone: {}", settings.timezone);
    let _ = writeln!(out, "Minimum elevation: {}°", settings.min_elevation);
    let _ = writeln!(
        out,
        "Satellites: {} analyzed, {} skipped, {} passes ({} not visible)",
        catalog.satellite_count,
        catalog.skipped.len(),
        catalog.passes.len(),
        catalog.not_visible().count()
    );
    let _ = writeln!(
        out,
        "\nCurrent local time: {}",
        now.with_timezone(&settings.timezone)
            .format("%Y-%m-%d %H:%M:%S %Z")
    );

    let visible = catalog.visible_count();
    if visible > 0 {
        let _ = writeln!(out, "\nPOTENTIALLY VISIBLE PASSES ({} total)", visible);
        let _ = writeln!(out, "(Observer in darkness, optimal viewing conditions)");
        write_passes(&mut out, &catalog.evening(), "EVENING PASSES (6 PM - 11 PM)");
        write_passes(&mut out, &catalog.morning(), "MORNING PASSES (4 AM - 8 AM)");
    } else {
        let _ = writeln!(
            out,
            "\nNo potentially visible passes found in next {} hours",
            settings.days_ahead * 24
        );
    }

    let _ = writeln!(
        out,
        "\nNote: Only passes with sun below -6° (civil twilight or darker) are shown."
    );
    let _ = writeln!(out, "Mag = estimated magnitude (lower/negative = brighter).");
    let _ = writeln!(
        out,
        "Times shown in local timezone. Directions shown as azimuth degrees (0°-360°)."
    );
    out
}

fn write_passes(out: &mut String, passes: &[&Pass], title: &str) {
    if passes.is_empty() {
        return;
    }

    let _ = writeln!(out, "\n{} ({} passes):", title, passes.len());
    let _ = writeln!(
        out,
        "Start | Start Dir | Stop  | Stop Dir | Max Alt | Mag   | Satellite"
    );
    let _ = writeln!(out, "{}", "-".repeat(75));

    for pass in passes {
        let _ = writeln!(
            out,
            "{:>5} | {:>9} | {:>5} | {:>8} | {:>7} | {:>5} | {}",
            pass.start.local.format("%H:%M").to_string(),
            azimuth(pass.start_azimuth_deg),
            pass.end.local.format("%H:%M").to_string(),
            azimuth(pass.end_azimuth_deg),
            format!("{:3.0}°", pass.max_elevation_deg),
            format!("{:+4.1}", pass.magnitude),
            pass.satellite
        );
    }
}

fn azimuth(deg: f64) -> String {
    format!("{:.0}°", deg)
}
