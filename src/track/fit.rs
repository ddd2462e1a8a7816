use crate::angle::{angle_between, angle_between_lines, normalize_full_turn, tilt_from_vertical};
use crate::centroid::{CandidatePoint, MAX_CANDIDATES};
use crate::error::{Error, Result};
use crate::grid::ScalarGrid;
use crate::shell::{entry_on_shell, ShellGeometry};
use log::debug;
use nalgebra::{Rotation3, Unit, Vector3};
use serde::Serialize;
use std::f64::consts::TAU;

/// Above this mismatch (rad) the rotation angle is taken the other way round.
pub const ROTATION_TOLERANCE: f64 = 0.2;

const EPS: f64 = 1e-9;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrackEstimate {
    /// Where the track enters the shell.
    pub incidence_point: Vector3<f64>,
    /// Unit direction of travel, pointing downward.
    pub direction: Vector3<f64>,
    /// Distance of the off-track reference point from the fitted line (mm).
    pub transverse_residual: f64,
    /// Azimuth of that offset around the track, in [0, 2π).
    pub rotation_residual: f64,
    /// First-hit time at the incidence point's cell.
    pub candidate_time: f64,
    pub candidates_used: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrackFit {
    NoTrack,
    Fitted(TrackEstimate),
}

impl TrackFit {
    pub fn estimate(&self) -> Option<&TrackEstimate> {
        match self {
            Self::NoTrack => None,
            Self::Fitted(e) => Some(e),
        }
    }
}

/// `v` or `-v`, whichever points down; `None` for a zero vector.
fn downward(v: Vector3<f64>) -> Option<Unit<Vector3<f64>>> {
    let v = if v.z < 0.0 { v } else { -v };
    Unit::try_new(v, EPS)
}

/// Offset of `q` from the line through `origin` along `dir`.
fn perpendicular_offset(
    q: &Vector3<f64>,
    origin: &Vector3<f64>,
    dir: &Unit<Vector3<f64>>,
) -> Vector3<f64> {
    let rel = q - origin;
    rel - dir.into_inner() * rel.dot(dir)
}

/// Angle of `offset` around `dir`, measured from the reference `(0, d.z, -d.y)`.
fn rotation_residual(offset: &Vector3<f64>, dir: &Unit<Vector3<f64>>) -> f64 {
    if offset.norm() <= EPS {
        return 0.0;
    }
    let mut reference = Vector3::new(0.0, dir.z, -dir.y);
    if reference.norm() <= EPS {
        reference = Vector3::y();
    }
    let ang = angle_between(offset, &reference);
    let rotated = Rotation3::from_axis_angle(dir, ang) * reference;
    if angle_between(offset, &rotated) > ROTATION_TOLERANCE {
        normalize_full_turn(TAU - ang)
    } else {
        normalize_full_turn(ang)
    }
}

/// Fit a track through `candidates`.
///
/// Candidates are ordered by descending height first and fitted through
/// the shell points along their centroid directions. `charge_center` is the
/// charge-weighted centre of the event; it anchors the one-point fit and is the
/// residual reference of the two-point fit. Five or more candidates are
/// rejected with [`Error::AmbiguousTrackInput`].
pub fn fit_track(
    candidates: &[CandidatePoint],
    charge_center: Option<Vector3<f64>>,
    geometry: &ShellGeometry,
    time_map: &ScalarGrid,
) -> Result<TrackFit> {
    let n = candidates.len();
    if n > MAX_CANDIDATES {
        return Err(Error::AmbiguousTrackInput { count: n });
    }
    if n == 0 {
        debug!("fit_track no candidates");
        return Ok(TrackFit::NoTrack);
    }
    if time_map.dims() != geometry.topology.raw_dims() {
        return Err(Error::DimensionMismatch {
            expected: geometry.topology.raw_dims(),
            actual: time_map.dims(),
        });
    }

    // Ordered by centroid height, then moved out to the shell along the
    // centroid's direction.
    let mut ordered: Vec<&CandidatePoint> = candidates.iter().collect();
    ordered.sort_by(|a, b| b.position.z.total_cmp(&a.position.z));
    let p: Vec<Vector3<f64>> = ordered
        .iter()
        .map(|c| {
            c.position
                .try_normalize(EPS)
                .map_or(c.position, |d| d * geometry.radius)
        })
        .collect();

    // (direction, point the line passes through, residual reference)
    let (dir, anchor, reference, scale) = match n {
        1 => {
            let Some(center) = charge_center else {
                debug!("fit_track single candidate without charge centre");
                return Ok(TrackFit::NoTrack);
            };
            let Some(dir) = downward(center - p[0]) else {
                debug!("fit_track single candidate at charge centre");
                return Ok(TrackFit::NoTrack);
            };
            (dir, p[0], None, 1.0)
        }
        2 => {
            let Some(dir) = Unit::try_new(p[1] - p[0], EPS) else {
                return Ok(TrackFit::NoTrack);
            };
            (dir, p[0], charge_center, 2.0)
        }
        3 => {
            // (chord start, chord end, unused point); the start is the higher end.
            let chords = [(0, 1, 2), (1, 2, 0), (0, 2, 1)];
            let mut best = chords[0];
            let mut best_tilt = f64::INFINITY;
            for c in chords {
                let tilt = tilt_from_vertical(&(p[c.0] - p[c.1]));
                if tilt < best_tilt {
                    best_tilt = tilt;
                    best = c;
                }
            }
            let Some(dir) = downward(p[best.0] - p[best.1]) else {
                return Ok(TrackFit::NoTrack);
            };
            (dir, p[best.0], Some(p[best.2]), 1.0)
        }
        _ => {
            let pairings = [((0, 1), (2, 3)), ((0, 2), (1, 3)), ((0, 3), (1, 2))];
            let mut best = pairings[0];
            let mut best_angle = f64::INFINITY;
            for pr in pairings {
                let a = p[pr.0 .0] - p[pr.0 .1];
                let b = p[pr.1 .0] - p[pr.1 .1];
                let angle = angle_between_lines(&a, &b);
                if angle < best_angle {
                    best_angle = angle;
                    best = pr;
                }
            }
            let Some(dir) = downward(p[best.0 .0] - p[best.0 .1]) else {
                return Ok(TrackFit::NoTrack);
            };
            (dir, p[0], Some(p[best.1 .0]), 1.0)
        }
    };

    let incidence_point = entry_on_shell(&anchor, &dir, geometry.radius);
    let (transverse_residual, rotation_residual) = match reference {
        Some(q) => {
            let off = perpendicular_offset(&q, &incidence_point, &dir);
            (scale * off.norm(), rotation_residual(&off, &dir))
        }
        None => (0.0, 0.0),
    };
    let candidate_time = geometry
        .cell_of(&incidence_point)
        .map(|(z, a)| time_map.get(z, a))
        .unwrap_or(0.0);

    let estimate = TrackEstimate {
        incidence_point,
        direction: dir.into_inner(),
        transverse_residual,
        rotation_residual,
        candidate_time,
        candidates_used: n,
    };
    debug!(
        "fit_track n={} dir=({:.3},{:.3},{:.3}) dis={:.1} ang={:.3} t={:.2}",
        n,
        estimate.direction.x,
        estimate.direction.y,
        estimate.direction.z,
        estimate.transverse_residual,
        estimate.rotation_residual,
        estimate.candidate_time
    );
    Ok(TrackFit::Fitted(estimate))
}
