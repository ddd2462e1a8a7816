//! Region pruning on an extended grid: the interior-intensity cut trims the
//! dim skirt of large regions, the border-majority cut removes regions that
//! mostly live in the ghost margin (their raw copy is labelled elsewhere).
use super::labeler::label_components;
use super::stats::RegionTable;
use crate::error::Result;
use crate::grid::{GridTopology, LabelGrid, ScalarGrid};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaCutParams {
    /// Regions strictly larger than this are subject to the interior cut.
    pub size_limit: usize,
    /// Relative cutoff inside `[min, max]` of a large region.
    pub fraction: f64,
    /// Minimum region size kept when relabeling after a cut.
    pub relabel_min_area: usize,
    pub cut_interior: bool,
    pub cut_border: bool,
}

impl Default for AreaCutParams {
    fn default() -> Self {
        Self {
            size_limit: 200,
            fraction: 0.3,
            relabel_min_area: 10,
            cut_interior: true,
            cut_border: true,
        }
    }
}

impl AreaCutParams {
    pub fn interior_only(mut self) -> Self {
        self.cut_interior = true;
        self.cut_border = false;
        self
    }

    pub fn border_only(mut self) -> Self {
        self.cut_interior = false;
        self.cut_border = true;
        self
    }
}

#[derive(Clone, Debug)]
pub struct AreaCutOutcome {
    /// Region table of the label map after the cut.
    pub regions: RegionTable,
    /// Whether any cell was removed.
    pub modified: bool,
}

/// Re-run the labeler on `mask` and replace `labels` with the result.
pub(crate) fn relabel(
    mask: &mut ScalarGrid,
    labels: &mut LabelGrid,
    topology: &GridTopology,
    min_area: usize,
) -> Result<RegionTable> {
    let labeling = label_components(mask, min_area)?;
    *labels = labeling.labels;
    RegionTable::collect(mask, labels, topology)
}

/// Zero every cell of `mask` and `labels` carrying `label` and for which
/// `drop(value)` holds. Returns the number of cleared cells.
pub(crate) fn clear_cells(
    mask: &mut ScalarGrid,
    labels: &mut LabelGrid,
    label: u32,
    drop: impl Fn(f64) -> bool,
) -> usize {
    let mut cleared = 0;
    for (v, l) in mask.data.iter_mut().zip(labels.data.iter_mut()) {
        if *l == label && drop(*v) {
            *v = 0.0;
            *l = 0;
            cleared += 1;
        }
    }
    cleared
}

/// One pass of the enabled cuts, interior first.
///
/// `mask` and `labels` must be extended grids of `topology` and agree on
/// which cells are set. Both are rewritten in place and relabelled after
/// every cut that removed cells, so label ids change.
pub fn area_cut(
    mask: &mut ScalarGrid,
    labels: &mut LabelGrid,
    topology: &GridTopology,
    params: &AreaCutParams,
) -> Result<AreaCutOutcome> {
    let mut regions = RegionTable::collect(mask, labels, topology)?;
    let mut modified = false;

    if params.cut_interior {
        let large: Vec<(u32, f64)> = regions
            .iter()
            .filter(|(_, r)| r.area > params.size_limit)
            .map(|(id, r)| {
                let cutoff =
                    params.fraction * (r.intensity_max - r.intensity_min) + r.intensity_min;
                (id, cutoff)
            })
            .collect();
        let mut cleared = 0;
        for &(id, cutoff) in &large {
            cleared += clear_cells(mask, labels, id, |v| v < cutoff);
        }
        debug!(
            "area_cut interior large_regions={} cleared={}",
            large.len(),
            cleared
        );
        // Any large region forces a relabel: the trimmed skirt may split it.
        if !large.is_empty() {
            regions = relabel(mask, labels, topology, params.relabel_min_area)?;
            modified |= cleared > 0;
        }
    }

    if params.cut_border {
        let outside: Vec<u32> = regions
            .iter()
            .filter(|(_, r)| r.is_border_majority())
            .map(|(id, _)| id)
            .collect();
        for &id in &outside {
            clear_cells(mask, labels, id, |_| true);
        }
        debug!("area_cut border discarded={}", outside.len());
        if !outside.is_empty() {
            regions = relabel(mask, labels, topology, params.relabel_min_area)?;
            modified = true;
        }
    }

    Ok(AreaCutOutcome { regions, modified })
}

/// Repeat [`area_cut`] until a pass removes nothing or `max_passes` ran.
pub fn area_cut_until_stable(
    mask: &mut ScalarGrid,
    labels: &mut LabelGrid,
    topology: &GridTopology,
    params: &AreaCutParams,
    max_passes: usize,
) -> Result<AreaCutOutcome> {
    let mut outcome = area_cut(mask, labels, topology, params)?;
    let mut passes = 1;
    let mut any = outcome.modified;
    while outcome.modified && passes < max_passes.max(1) {
        outcome = area_cut(mask, labels, topology, params)?;
        any |= outcome.modified;
        passes += 1;
    }
    debug!("area_cut_until_stable passes={} modified={}", passes, any);
    outcome.modified = any;
    Ok(outcome)
}
