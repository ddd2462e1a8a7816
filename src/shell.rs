//! Spherical shell geometry: binning of directions and straight-line
//! projections onto the shell surface.
//!
//! Zenith is measured from `+z`, azimuth is `atan2(y, x)` in `(-π, π]`. Raw cell
//! `(z, a)` covers zenith `[z·Δθ, (z+1)·Δθ)` and azimuth
//! `[a·Δφ − π, (a+1)·Δφ − π)`; cell angles are reported at the lower edge.
use crate::error::Result;
use crate::grid::GridTopology;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const EPS: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellGeometry {
    pub topology: GridTopology,
    /// Shell radius in millimetres.
    pub radius: f64,
}

impl Default for ShellGeometry {
    fn default() -> Self {
        Self {
            topology: GridTopology::default(),
            radius: 17_700.0,
        }
    }
}

impl ShellGeometry {
    pub fn new(topology: GridTopology, radius: f64) -> Result<Self> {
        topology.validate()?;
        Ok(Self { topology, radius })
    }

    #[inline]
    pub fn zenith_step(&self) -> f64 {
        PI / self.topology.zenith_bins as f64
    }

    #[inline]
    pub fn azimuth_step(&self) -> f64 {
        2.0 * PI / self.topology.azimuth_bins as f64
    }

    /// Raw cell containing the direction of `p`; `None` for the origin.
    pub fn cell_of(&self, p: &Vector3<f64>) -> Option<(usize, usize)> {
        let (theta, phi) = angles_of(p)?;
        let z = ((theta / self.zenith_step()) as usize).min(self.topology.zenith_bins - 1);
        let a = (((phi + PI) / self.azimuth_step()) as usize).min(self.topology.azimuth_bins - 1);
        Some((z, a))
    }

    /// Lower-edge angles `(θ, φ)` of raw cell `(z, a)`.
    pub fn angles_of_cell(&self, z: usize, a: usize) -> (f64, f64) {
        (
            z as f64 * self.zenith_step(),
            a as f64 * self.azimuth_step() - PI,
        )
    }

    /// Unit direction of the lower edge of raw cell `(z, a)`.
    pub fn direction_of(&self, z: usize, a: usize) -> Vector3<f64> {
        let (theta, phi) = self.angles_of_cell(z, a);
        point_at_angles(1.0, theta, phi)
    }

    /// Point on the shell at the lower edge of raw cell `(z, a)`.
    pub fn point_of_cell(&self, z: usize, a: usize) -> Vector3<f64> {
        self.direction_of(z, a) * self.radius
    }
}

/// `(θ, φ)` of a vector, `None` when it has no direction.
pub fn angles_of(p: &Vector3<f64>) -> Option<(f64, f64)> {
    let r = p.norm();
    if r <= EPS {
        return None;
    }
    let theta = (p.z / r).clamp(-1.0, 1.0).acos();
    let phi = p.y.atan2(p.x);
    Some((theta, phi))
}

/// Zenith angle of `p`, `0` at the origin.
pub fn zenith_of(p: &Vector3<f64>) -> f64 {
    angles_of(p).map(|(t, _)| t).unwrap_or(0.0)
}

pub fn point_at_angles(radius: f64, theta: f64, phi: f64) -> Vector3<f64> {
    Vector3::new(
        radius * theta.sin() * phi.cos(),
        radius * theta.sin() * phi.sin(),
        radius * theta.cos(),
    )
}

/// Whether the infinite line through `point` along `dir` meets the shell.
pub fn crosses_shell(point: &Vector3<f64>, dir: &Vector3<f64>, radius: f64) -> bool {
    let d = dir.normalize();
    let along = point.dot(&d);
    let dist2 = point.norm_squared() - along * along;
    dist2 <= radius * radius
}

/// Walk backwards from `point` along `dir` to the shell.
///
/// Returns the intersection that lies behind `point` with respect to `dir`
/// (the entry point of a track travelling along `dir`). A line that misses the
/// shell yields its point of closest approach to the centre.
pub fn entry_on_shell(point: &Vector3<f64>, dir: &Vector3<f64>, radius: f64) -> Vector3<f64> {
    let d = dir.normalize();
    let along = point.dot(&d);
    let dist2 = point.norm_squared() - along * along;
    let half_chord = (radius * radius - dist2).max(0.0).sqrt();
    point - d * (along + half_chord)
}
