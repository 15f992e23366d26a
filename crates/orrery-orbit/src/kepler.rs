//! Kepler's equation and the position/velocity of a body on its orbit.

use std::f64::consts::PI;

use orrery_math::{DVec3, quat_transform};

use crate::elements::OrbitalElements;

/// Newton iteration stops once the correction falls below this (radians).
pub const KEPLER_TOLERANCE: f64 = 1e-12;

/// Upper bound on Newton iterations before the best estimate is returned.
pub const KEPLER_MAX_ITERATIONS: u32 = 30;

/// Result of solving `M = E - e sin E` for the eccentric anomaly `E`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeplerSolution {
    pub eccentric_anomaly: f64,
    pub iterations: u32,
    /// `false` when the iteration budget ran out. The anomaly is then the
    /// last estimate, which is still usable for display.
    pub converged: bool,
}

/// Solve Kepler's equation with the default tolerance and iteration limit.
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> KeplerSolution {
    solve_kepler_bounded(
        mean_anomaly,
        eccentricity,
        KEPLER_TOLERANCE,
        KEPLER_MAX_ITERATIONS,
    )
}

/// Solve Kepler's equation by Newton-Raphson.
///
/// Starts from `E = M`, or from `π` for highly eccentric orbits where the
/// plain guess can overshoot.
pub fn solve_kepler_bounded(
    mean_anomaly: f64,
    eccentricity: f64,
    tolerance: f64,
    max_iterations: u32,
) -> KeplerSolution {
    let mut e_anom = if eccentricity > 0.8 { PI } else { mean_anomaly };

    for iteration in 1..=max_iterations {
        let residual = e_anom - eccentricity * e_anom.sin() - mean_anomaly;
        let derivative = 1.0 - eccentricity * e_anom.cos();
        let delta = residual / derivative;
        e_anom -= delta;
        if delta.abs() < tolerance {
            return KeplerSolution {
                eccentric_anomaly: e_anom,
                iterations: iteration,
                converged: true,
            };
        }
    }

    KeplerSolution {
        eccentric_anomaly: e_anom,
        iterations: max_iterations,
        converged: false,
    }
}

/// Position and velocity of a body relative to the focus it orbits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitalState {
    pub position: DVec3,
    pub velocity: DVec3,
    pub true_anomaly: f64,
    /// Distance from the focus.
    pub radius: f64,
    pub solution: KeplerSolution,
}

/// Full orbital state at absolute simulated time `t` (seconds).
pub fn kepler_state_at_time(elements: &OrbitalElements, t: f64) -> OrbitalState {
    let a = elements.semi_major_axis();
    let e = elements.eccentricity();
    let mean_anomaly = elements.mean_anomaly_at(t);

    let solution = solve_kepler(mean_anomaly, e);
    let e_anom = solution.eccentric_anomaly;
    let (sin_e, cos_e) = e_anom.sin_cos();

    let (sin_half, cos_half) = (e_anom / 2.0).sin_cos();
    let true_anomaly = 2.0 * ((1.0 + e).sqrt() * sin_half).atan2((1.0 - e).sqrt() * cos_half);
    let radius = a * (1.0 - e * cos_e);

    let (sin_nu, cos_nu) = true_anomaly.sin_cos();
    let plane_position = DVec3::new(radius * cos_nu, radius * sin_nu, 0.0);

    // d/dt of (a(cos E - e), b sin E) with dE/dt = n / (1 - e cos E).
    let semi_minor = a * (1.0 - e * e).sqrt();
    let e_rate = elements.mean_motion() / (1.0 - e * cos_e);
    let plane_velocity = DVec3::new(-a * sin_e * e_rate, semi_minor * cos_e * e_rate, 0.0);

    let frame = elements.frame();
    OrbitalState {
        position: quat_transform(frame, plane_position),
        velocity: quat_transform(frame, plane_velocity),
        true_anomaly,
        radius,
        solution,
    }
}

/// Position relative to the orbited focus at absolute simulated time `t`.
///
/// Pure: the same elements and time always give the same bits.
pub fn kepler_position_at_time(elements: &OrbitalElements, t: f64) -> DVec3 {
    kepler_state_at_time(elements, t).position
}
