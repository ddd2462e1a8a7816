use super::timing::TimingBreakdown;
use crate::centroid::CandidatePoint;
use crate::grid::{LabelGrid, ScalarGrid};
use crate::regions::RegionTable;
use crate::track::{TimeResiduals, TrackFit};
use serde::Serialize;

/// Region counts after each reconciliation stage.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionCounts {
    pub loose: usize,
    pub tight: usize,
    pub union_cut_modified: usize,
    pub consensus: usize,
}

/// Everything one pipeline invocation produced.
///
/// The grids are kept for callers that want to inspect or plot them; they are
/// left out of the JSON form.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventReport {
    /// Window-sum intensity on the extended grid.
    #[serde(skip)]
    pub intensity: ScalarGrid,
    /// Consensus label map on the extended grid.
    #[serde(skip)]
    pub consensus: LabelGrid,
    pub regions: RegionTable,
    pub region_counts: RegionCounts,
    pub candidates: Vec<CandidatePoint>,
    pub track: TrackFit,
    pub time_residuals: Option<TimeResiduals>,
    pub timings: TimingBreakdown,
}

impl EventReport {
    /// Report of an event that carried no usable signal.
    pub fn empty(extended: (usize, usize), timings: TimingBreakdown) -> Self {
        Self {
            intensity: ScalarGrid::new(extended.0, extended.1),
            consensus: LabelGrid::new(extended.0, extended.1),
            regions: RegionTable::default(),
            region_counts: RegionCounts::default(),
            candidates: Vec::new(),
            track: TrackFit::NoTrack,
            time_residuals: None,
            timings,
        }
    }
}
