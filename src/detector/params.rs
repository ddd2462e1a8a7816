//! Parameter types configuring the reconstruction stages.
//!
//! Defaults reproduce the tuning used for the 17.7 m shell binned into
//! 100 × 200 cells. All structs deserialize with `#[serde(default)]`, so a
//! JSON config only needs to name the knobs it changes.

use crate::centroid::CentroidParams;
use crate::error::{Error, Result};
use crate::event::FillParams;
use crate::regions::{AreaCutParams, UnionCutParams};
use crate::shell::ShellGeometry;
use crate::track::OpticsParams;
use serde::{Deserialize, Serialize};

/// Pipeline-wide parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackParams {
    /// Grid dimensions, ghost margin and shell radius.
    pub geometry: ShellGeometry,
    /// Binning of sensor records into raw grids.
    pub fill: FillParams,
    /// Gap-filling passes (`expand`) applied to the raw charge grid.
    pub smooth_iterations: usize,
    /// Box-filter radius of the first smoothing scale.
    pub smooth_radius: usize,
    /// Block size of the coarse pooling gate.
    pub pool_block: usize,
    /// Radius of the window-sum (second smoothing scale).
    pub window_radius: usize,
    /// Erosion passes on the window-sum map; `0` disables the stage.
    pub erosion_passes: usize,
    /// Minimum set cells in the 3×3 neighbourhood for a cell to survive erosion.
    pub erosion_min_neighbors: usize,
    /// Peak fraction of the loose threshold.
    pub loose_threshold: f64,
    /// Peak fraction of the tight threshold.
    pub tight_threshold: f64,
    /// Minimum area of loose and tight regions after labeling.
    pub min_region_area: usize,
    /// Minimum area of consensus regions.
    pub combine_min_area: usize,
    pub area_cut: AreaCutParams,
    /// Upper bound on repeated area-cut passes.
    pub area_cut_max_passes: usize,
    pub union_cut: UnionCutParams,
    pub centroid: CentroidParams,
    pub optics: OpticsParams,
}

impl Default for TrackParams {
    fn default() -> Self {
        Self {
            geometry: ShellGeometry::default(),
            fill: FillParams::default(),
            smooth_iterations: 4,
            smooth_radius: 2,
            pool_block: 10,
            window_radius: 3,
            erosion_passes: 0,
            erosion_min_neighbors: 4,
            loose_threshold: 0.35,
            tight_threshold: 0.8,
            min_region_area: 20,
            combine_min_area: 5,
            area_cut: AreaCutParams::default(),
            area_cut_max_passes: 3,
            union_cut: UnionCutParams::default(),
            centroid: CentroidParams::default(),
            optics: OpticsParams::default(),
        }
    }
}

impl TrackParams {
    /// Reject combinations the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.geometry.topology.validate()?;
        let margin = self.geometry.topology.margin;
        if self.smooth_radius > margin || self.window_radius > margin {
            return Err(Error::InvalidParameter(format!(
                "smoothing radii ({}, {}) exceed margin {}",
                self.smooth_radius, self.window_radius, margin
            )));
        }
        if self.pool_block == 0 {
            return Err(Error::InvalidParameter("pool block must be positive".into()));
        }
        let fractions = [self.loose_threshold, self.tight_threshold];
        if fractions.iter().any(|f| !(0.0..=1.0).contains(f)) {
            return Err(Error::InvalidParameter(format!(
                "threshold fractions must lie in [0, 1], got loose={} tight={}",
                self.loose_threshold, self.tight_threshold
            )));
        }
        if self.loose_threshold > self.tight_threshold {
            return Err(Error::InvalidParameter(format!(
                "loose threshold {} above tight threshold {}",
                self.loose_threshold, self.tight_threshold
            )));
        }
        Ok(())
    }
}
