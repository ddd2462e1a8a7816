//! Candidate surface points from the consensus label map.
//!
//! Every used sensor is binned to its raw cell; the cell and all of its
//! ghost-margin copies are looked up in the consensus map, and every distinct
//! label found accumulates the sensor's charge-weighted position. Regions near
//! a pole are often labelled twice (once per side of the mirror), so nearby
//! polar centroids are deduplicated before the slots are filled.
use crate::error::Result;
use crate::grid::{LabelGrid, ScalarGrid};
use crate::sensors::SensorTable;
use crate::shell::{zenith_of, ShellGeometry};
use log::debug;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Upper bound on candidate points per event.
pub const MAX_CANDIDATES: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CentroidParams {
    /// Polar centroids closer than this (mm) are treated as one region.
    /// Empirically tuned for the 17.7 m shell.
    pub dedup_distance: f64,
    /// Zenith below which a centroid is in the north pole band.
    pub north_band: f64,
    /// Zenith above which a centroid is in the south pole band.
    pub south_band: f64,
    pub max_candidates: usize,
}

impl Default for CentroidParams {
    fn default() -> Self {
        Self {
            dedup_distance: 3000.0,
            north_band: 0.314,
            south_band: 2.826,
            max_candidates: MAX_CANDIDATES,
        }
    }
}

impl CentroidParams {
    fn same_pole_band(&self, p: &Vector3<f64>, q: &Vector3<f64>) -> bool {
        let (tp, tq) = (zenith_of(p), zenith_of(q));
        (tp < self.north_band && tq < self.north_band)
            || (tp > self.south_band && tq > self.south_band)
    }
}

/// A confident hit region reduced to one point on (or inside) the shell.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CandidatePoint {
    /// Consensus label the point was computed from.
    pub label: u32,
    /// Charge-weighted centroid of the region's sensors.
    pub position: Vector3<f64>,
    /// Distance of the centroid from the shell centre.
    pub radius: f64,
    pub zenith_bin: usize,
    pub azimuth_bin: usize,
    /// Number of sensor hits that fed the centroid.
    pub area: usize,
    /// First-hit time at the centroid's raw cell.
    pub time: f64,
}

#[derive(Default)]
struct Accum {
    weighted: Vector3<f64>,
    charge: f64,
    hits: usize,
}

/// Reduce the consensus regions to at most `params.max_candidates` points.
///
/// Regions are visited in label order. Once the slots are full, later regions
/// can still replace a slot they duplicate but never open a new one.
///
/// `consensus` is an extended label map of `geometry.topology`, `time_map`
/// is raw sized.
pub fn extract_candidates(
    sensors: &SensorTable,
    consensus: &LabelGrid,
    time_map: &ScalarGrid,
    geometry: &ShellGeometry,
    params: &CentroidParams,
) -> Result<Vec<CandidatePoint>> {
    let topo = &geometry.topology;
    let ext = topo.extended_dims();
    if consensus.dims() != ext {
        return Err(crate::error::Error::DimensionMismatch {
            expected: ext,
            actual: consensus.dims(),
        });
    }
    if time_map.dims() != topo.raw_dims() {
        return Err(crate::error::Error::DimensionMismatch {
            expected: topo.raw_dims(),
            actual: time_map.dims(),
        });
    }

    let mut acc: BTreeMap<u32, Accum> = BTreeMap::new();
    let mut seen: Vec<u32> = Vec::with_capacity(4);
    for rec in sensors.used() {
        let Some((z, a)) = geometry.cell_of(&rec.position) else {
            continue;
        };
        seen.clear();
        for (ez, ea) in topo.aliases(z, a) {
            let label = consensus.get(ez, ea);
            if label == 0 || seen.contains(&label) {
                continue;
            }
            seen.push(label);
            let e = acc.entry(label).or_default();
            e.weighted += rec.position * rec.charge;
            e.charge += rec.charge;
            e.hits += 1;
        }
    }

    let mut slots: Vec<CandidatePoint> = Vec::with_capacity(params.max_candidates);
    for (label, e) in acc.iter() {
        if e.charge <= 0.0 {
            debug!("extract_candidates label={} skipped: no charge", label);
            continue;
        }
        let position = e.weighted / e.charge;
        let Some((z, a)) = geometry.cell_of(&position) else {
            continue;
        };
        let candidate = CandidatePoint {
            label: *label,
            position,
            radius: position.norm(),
            zenith_bin: z,
            azimuth_bin: a,
            area: e.hits,
            time: time_map.get(z, a),
        };

        let duplicate = slots.iter().position(|s| {
            (s.position - position).norm() < params.dedup_distance
                && params.same_pole_band(&s.position, &position)
        });
        match duplicate {
            Some(i) => {
                debug!(
                    "extract_candidates label={} duplicates label={} hits={} vs {}",
                    label, slots[i].label, e.hits, slots[i].area
                );
                if slots[i].area < e.hits {
                    slots[i] = candidate;
                }
            }
            None if slots.len() < params.max_candidates => slots.push(candidate),
            None => debug!("extract_candidates label={} dropped: slots full", label),
        }
    }

    debug!(
        "extract_candidates regions={} candidates={}",
        acc.len(),
        slots.len()
    );
    Ok(slots)
}
