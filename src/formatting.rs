//! Duration, pace and distance formatting
//!
//! All fields are truncated, never rounded, so the strings match what the
//! app displays for the same inputs.

use crate::models::Units;

/// Kilometres in one mile
pub const KM_PER_MILE: f64 = 1.609344;

/// Returned for any pace that cannot be computed
pub const EMPTY_PACE: &str = "0:00";

/// `H:MM:SS` from one hour up, `M:SS` below
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Minutes and seconds per distance unit, `M:SS`
pub fn format_pace(distance: f64, duration_seconds: f64) -> String {
    if !distance.is_finite() || distance <= 0.0 {
        return EMPTY_PACE.to_string();
    }
    if !duration_seconds.is_finite() || duration_seconds < 0.0 {
        return EMPTY_PACE.to_string();
    }

    let pace_minutes = (duration_seconds / 60.0) / distance;
    if !pace_minutes.is_finite() {
        return EMPTY_PACE.to_string();
    }

    let minutes = pace_minutes.trunc();
    let seconds = ((pace_minutes - minutes) * 60.0).trunc();

    format!("{}:{:02}", minutes as u64, seconds as u64)
}

/// Suffix shown after a pace string
pub fn pace_label(units: Units) -> &'static str {
    match units {
        Units::Metric => "/km",
        Units::Imperial => "/mi",
    }
}

/// Two decimals plus unit, e.g. `5.00 km`
pub fn format_distance(distance: f64, units: Units) -> String {
    let unit = match units {
        Units::Metric => "km",
        Units::Imperial => "mi",
    };
    let distance = if distance.is_finite() { distance.max(0.0) } else { 0.0 };
    format!("{:.2} {}", distance, unit)
}

pub fn km_to_miles(km: f64) -> f64 {
    km / KM_PER_MILE
}

pub fn miles_to_km(miles: f64) -> f64 {
    miles * KM_PER_MILE
}
