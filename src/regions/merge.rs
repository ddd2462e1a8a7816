//! Reconciliation of the loose and tight region maps.
//!
//! The tight map marks confident cores; the loose map marks the full extent of
//! activity, which merges neighbouring cores into one blob. [`union_cut`]
//! splits such blobs by removing the footprint of the (dilated) cores and
//! raising the loose threshold locally. [`combine`] then labels the union of
//! both maps into the consensus.
use super::area_cut::{clear_cells, relabel};
use super::labeler::{label_components, Labeling};
use super::stats::RegionTable;
use crate::error::Result;
use crate::grid::{GridTopology, GridView, LabelGrid, ScalarGrid};
use crate::ops::expand_labels;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Loose regions overlapping several cores are cut above this size.
pub const MULTI_OVERLAP_MIN_AREA: usize = 200;
/// Loose regions overlapping a single core are cut above this size.
pub const SINGLE_OVERLAP_MIN_AREA: usize = 300;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnionCutParams {
    /// Label dilation passes applied to the tight map.
    pub dilation_passes: usize,
    pub multi_overlap_min_area: usize,
    pub single_overlap_min_area: usize,
    /// Fraction of the region maximum outside the cores.
    pub region_fraction: f64,
    /// Fraction of the region peak when several cores overlap.
    pub multi_peak_fraction: f64,
    /// Fraction of the region peak when one core overlaps.
    pub single_peak_fraction: f64,
    pub relabel_min_area: usize,
}

impl Default for UnionCutParams {
    fn default() -> Self {
        Self {
            dilation_passes: 14,
            multi_overlap_min_area: MULTI_OVERLAP_MIN_AREA,
            single_overlap_min_area: SINGLE_OVERLAP_MIN_AREA,
            region_fraction: 0.75,
            multi_peak_fraction: 0.7,
            single_peak_fraction: 0.5,
            relabel_min_area: 10,
        }
    }
}

/// Overlap summary of one loose region against the dilated tight map.
#[derive(Clone, Copy, Debug, Default)]
struct Overlap {
    area: usize,
    /// Changes between distinct non-zero tight labels in scan order.
    transitions: usize,
    last_core: u32,
    /// Max intensity over cells outside the dilated cores.
    region_max: f64,
    /// Max intensity over all cells.
    peak_max: f64,
}

impl Overlap {
    fn cutoff(&self, p: &UnionCutParams) -> Option<f64> {
        if self.transitions >= 2 && self.area > p.multi_overlap_min_area {
            Some((p.region_fraction * self.region_max).max(p.multi_peak_fraction * self.peak_max))
        } else if self.transitions == 1 && self.area > p.single_overlap_min_area {
            Some((p.region_fraction * self.region_max).max(p.single_peak_fraction * self.peak_max))
        } else {
            None
        }
    }
}

#[derive(Clone, Debug)]
pub struct UnionCutOutcome {
    pub regions: RegionTable,
    /// Number of loose regions that were cut.
    pub modified: usize,
}

/// Split loose regions that swallow tight cores.
///
/// `loose_labels` and `intensity` (the loose thresholded map) are updated in
/// place; `tight_labels` is only read. All three are extended grids.
/// Only the cut region's own cells are cleared under the dilated cores, not
/// every loose cell inside its bounding box.
pub fn union_cut(
    loose_labels: &mut LabelGrid,
    tight_labels: &LabelGrid,
    intensity: &mut ScalarGrid,
    topology: &GridTopology,
    params: &UnionCutParams,
) -> Result<UnionCutOutcome> {
    loose_labels.ensure_not_empty()?;
    loose_labels.ensure_same_dims(tight_labels)?;
    loose_labels.ensure_same_dims(intensity)?;

    let mut cores = tight_labels.clone();
    for _ in 0..params.dilation_passes {
        if expand_labels(&mut cores)? == 0 {
            break;
        }
    }

    let mut overlaps: BTreeMap<u32, Overlap> = BTreeMap::new();
    for (z, a, id) in loose_labels.cells() {
        if id == 0 {
            continue;
        }
        let v = intensity.get(z, a);
        let core = cores.get(z, a);
        let o = overlaps.entry(id).or_default();
        o.area += 1;
        o.peak_max = o.peak_max.max(v);
        if core == 0 {
            o.region_max = o.region_max.max(v);
        } else if core != o.last_core {
            o.transitions += 1;
            o.last_core = core;
        }
    }

    let mut modified = 0usize;
    for (&id, o) in overlaps.iter() {
        let Some(cutoff) = o.cutoff(params) else {
            continue;
        };
        modified += 1;
        // Cells under the dilated cores go first, then the dim remainder.
        for ((l, v), &c) in loose_labels
            .data
            .iter_mut()
            .zip(intensity.data.iter_mut())
            .zip(cores.data.iter())
        {
            if *l == id && c != 0 {
                *l = 0;
                *v = 0.0;
            }
        }
        let dim = clear_cells(intensity, loose_labels, id, |v| v < cutoff);
        debug!(
            "union_cut region={} area={} transitions={} cutoff={:.3} dim_cleared={}",
            id, o.area, o.transitions, cutoff, dim
        );
    }

    let regions = if modified > 0 {
        let table = relabel(intensity, loose_labels, topology, params.relabel_min_area)?;
        let border = table
            .iter()
            .filter(|(_, r)| r.is_border_majority())
            .map(|(id, _)| id)
            .collect::<Vec<_>>();
        for &id in &border {
            clear_cells(intensity, loose_labels, id, |_| true);
        }
        if border.is_empty() {
            table
        } else {
            relabel(intensity, loose_labels, topology, params.relabel_min_area)?
        }
    } else {
        RegionTable::collect(intensity, loose_labels, topology)?
    };

    debug!(
        "union_cut loose_regions={} modified={} remaining={}",
        overlaps.len(),
        modified,
        regions.len()
    );
    Ok(UnionCutOutcome { regions, modified })
}

/// Label the union of two region maps.
///
/// Each cell scores the number of maps marking it; the scored map is then
/// labelled with `min_area`. Overlapping regions therefore merge and
/// disjoint ones stay apart.
pub fn combine(a: &LabelGrid, b: &LabelGrid, min_area: usize) -> Result<(ScalarGrid, Labeling)> {
    a.ensure_not_empty()?;
    a.ensure_same_dims(b)?;
    let mut union = ScalarGrid::zeros_like(a);
    for ((u, &la), &lb) in union.data.iter_mut().zip(a.data.iter()).zip(b.data.iter()) {
        *u = f64::from(u8::from(la != 0) + u8::from(lb != 0));
    }
    let labeling = label_components(&mut union, min_area)?;
    Ok((union, labeling))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topo() -> GridTopology {
        GridTopology::new(40, 60, 2).expect("topology")
    }

    fn paint(labels: &mut LabelGrid, z: std::ops::Range<usize>, a: std::ops::Range<usize>, id: u32) {
        for zz in z {
            for aa in a.clone() {
                labels.set(zz, aa, id);
            }
        }
    }

    #[test]
    fn combine_keeps_disjoint_blocks_apart() {
        let mut m = LabelGrid::new(10, 10);
        paint(&mut m, 1..4, 1..4, 1);
        paint(&mut m, 6..9, 6..9, 2);
        let (union, lab) = combine(&m, &m, 5).expect("combine");
        assert_eq!(lab.region_count(), 2);
        assert_eq!(union.get(2, 2), 2.0);
    }

    #[test]
    fn combine_merges_overlapping_regions() {
        let mut a = LabelGrid::new(10, 10);
        let mut b = LabelGrid::new(10, 10);
        paint(&mut a, 2..5, 1..5, 1);
        paint(&mut b, 2..5, 4..8, 1);
        let (_, lab) = combine(&a, &b, 5).expect("combine");
        assert_eq!(lab.region_count(), 1);
        assert_eq!(lab.regions.get(1).map(|r| r.area), Some(21));
    }

    #[test]
    fn union_cut_splits_blob_spanning_two_cores() {
        let t = topo();
        let (nz, na) = t.extended_dims();
        // One loose blob 12 x 40 = 480 cells with two bright cores.
        let mut intensity = ScalarGrid::new(nz, na);
        let mut loose = LabelGrid::new(nz, na);
        let mut tight = LabelGrid::new(nz, na);
        for z in 10..22 {
            for a in 10..50 {
                let bright = (14..18).contains(&z) && ((12..16).contains(&a) || (44..48).contains(&a));
                intensity.set(z, a, if bright { 100.0 } else { 10.0 });
                loose.set(z, a, 1);
            }
        }
        paint(&mut tight, 14..18, 12..16, 1);
        paint(&mut tight, 14..18, 44..48, 2);

        let params = UnionCutParams {
            dilation_passes: 2,
            ..UnionCutParams::default()
        };
        let out = union_cut(&mut loose, &tight, &mut intensity, &t, &params).expect("union cut");
        assert_eq!(out.modified, 1);
        // The core footprints are removed and the dim bridge falls below
        // 0.7 x peak, so nothing of the blob survives.
        assert_eq!(loose.get(16, 14), 0);
        assert_eq!(intensity.get(11, 30), 0.0);
        assert_eq!(out.regions.len(), 0);
    }

    #[test]
    fn union_cut_single_core_keeps_bright_shoulder() {
        let t = topo();
        let (nz, na) = t.extended_dims();
        // A 20 x 20 blob around one core. The shoulder rows 10..15 are
        // brighter than half the core peak, the rest is dim.
        let mut intensity = ScalarGrid::new(nz, na);
        let mut loose = LabelGrid::new(nz, na);
        let mut tight = LabelGrid::new(nz, na);
        for z in 10..30 {
            for a in 10..30 {
                let v = if (20..22).contains(&z) && (20..22).contains(&a) {
                    10.0
                } else if z < 15 {
                    6.0
                } else {
                    2.0
                };
                intensity.set(z, a, v);
                loose.set(z, a, 1);
            }
        }
        paint(&mut tight, 20..22, 20..22, 1);

        let params = UnionCutParams {
            dilation_passes: 2,
            ..UnionCutParams::default()
        };
        let out = union_cut(&mut loose, &tight, &mut intensity, &t, &params).expect("union cut");
        // cutoff = max(0.75 * 6, 0.5 * 10) = 5: the shoulder survives, the
        // dim cells and the core footprint do not.
        assert_eq!(out.modified, 1);
        assert_eq!(out.regions.len(), 1);
        assert_eq!(out.regions.iter().next().map(|(_, r)| r.area), Some(100));
        assert_eq!(intensity.get(12, 15), 6.0);
        assert_eq!(intensity.get(25, 25), 0.0);
        assert_eq!(intensity.get(20, 20), 0.0);
        assert_eq!(loose.get(20, 20), 0);
    }

    #[test]
    fn union_cut_leaves_small_regions_alone() {
        let t = topo();
        let (nz, na) = t.extended_dims();
        let mut intensity = ScalarGrid::new(nz, na);
        let mut loose = LabelGrid::new(nz, na);
        let mut tight = LabelGrid::new(nz, na);
        for z in 10..15 {
            for a in 10..15 {
                intensity.set(z, a, 5.0);
                loose.set(z, a, 1);
            }
        }
        paint(&mut tight, 11..13, 11..13, 1);
        let before = intensity.clone();
        let out = union_cut(&mut loose, &tight, &mut intensity, &t, &UnionCutParams::default())
            .expect("union cut");
        assert_eq!(out.modified, 0);
        assert_eq!(out.regions.len(), 1);
        assert_eq!(intensity, before);
    }
}
