/// Seconds in one (mean solar) day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// 1 Astronomical Unit in metres (IAU 2012 exact definition).
pub const METERS_PER_AU: f64 = 149_597_870_700.0;

/// Convert days to seconds.
#[inline]
pub fn days_to_seconds(days: f64) -> f64 {
    days * SECONDS_PER_DAY
}

/// Wrap an angle in radians into `[0, 2π)`.
#[inline]
pub fn normalize_angle(radians: f64) -> f64 {
    let wrapped = radians.rem_euclid(std::f64::consts::TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= std::f64::consts::TAU {
        0.0
    } else {
        wrapped
    }
}

/// Format a distance in metres with the most readable unit.
///
/// Examples:
/// - 500.0 -> "500.000 m"
/// - 6.371e6 -> "6371.000 km"
/// - 1.496e11 -> "1.000 AU"
pub fn format_distance(meters: f64) -> String {
    let abs = meters.abs();
    if abs >= 0.01 * METERS_PER_AU {
        format!("{:.3} AU", meters / METERS_PER_AU)
    } else if abs >= 1_000.0 {
        format!("{:.3} km", meters / 1_000.0)
    } else {
        format!("{meters:.3} m")
    }
}
