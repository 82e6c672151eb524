use serde::Serialize;
use strum_macros::Display;
use utoipa::ToSchema;

/// Sun elevation below which the sky is dark enough to see reflected sunlight
pub const DARKNESS_THRESHOLD_DEG: f64 = -6.0;

/// Local time-of-day bucket of a pass start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema, Display)]
pub enum TimeOfDay {
    Evening,
    Morning,
    Daytime,
    Night,
}

impl TimeOfDay {
    /// Buckets are tested in order; hour 8 falls in both Morning and Daytime and
    /// resolves to Morning.
    pub fn from_local_hour(hour: u32) -> Self {
        if (18..=23).contains(&hour) {
            TimeOfDay::Evening
        } else if (4..=8).contains(&hour) {
            TimeOfDay::Morning
        } else if (8..=17).contains(&hour) {
            TimeOfDay::Daytime
        } else {
            TimeOfDay::Night
        }
    }

    pub fn allows_viewing(&self) -> bool {
        matches!(
            self,
            TimeOfDay::Evening | TimeOfDay::Morning | TimeOfDay::Night
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub category: TimeOfDay,
    pub observer_dark: bool,
    pub potentially_visible: bool,
}

pub fn is_dark(sun_elevation_deg: f64) -> bool {
    sun_elevation_deg < DARKNESS_THRESHOLD_DEG
}

pub fn classify(local_hour: u32, sun_elevation_deg: f64) -> Visibility {
    let category = TimeOfDay::from_local_hour(local_hour);
    let observer_dark = is_dark(sun_elevation_deg);
    Visibility {
        category,
        observer_dark,
        potentially_visible: observer_dark && category.allows_viewing(),
    }
}
