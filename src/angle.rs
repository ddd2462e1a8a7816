//! Angle utilities used by the track fitter.
use nalgebra::Vector3;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Normalizes an angle into the range [0, 2π).
#[inline]
pub fn normalize_full_turn(angle: f64) -> f64 {
    let norm = angle.rem_euclid(TAU);
    if norm >= TAU - 1e-12 {
        0.0
    } else {
        norm
    }
}

/// Unsigned angle between two vectors in radians, in [0, π].
/// Zero if either vector has no length.
#[inline]
pub fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    if a.norm() <= f64::EPSILON || b.norm() <= f64::EPSILON {
        return 0.0;
    }
    a.cross(b).norm().atan2(a.dot(b))
}

/// Angle between two lines, treating antipodal directions as equivalent.
/// Returns a value in [0, π/2].
#[inline]
pub fn angle_between_lines(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    let ang = angle_between(a, b);
    if ang > FRAC_PI_2 {
        PI - ang
    } else {
        ang
    }
}

/// Deviation of a line from the vertical, in [0, π/2].
#[inline]
pub fn tilt_from_vertical(v: &Vector3<f64>) -> f64 {
    angle_between_lines(v, &Vector3::new(0.0, 0.0, -1.0))
}
