//! Detector pipeline turning one event's raw grids into a track estimate.
//!
//! Stages
//! - Gap filling: `expand` passes close single-cell holes in the charge grid.
//! - First scale: extend with the ghost margin, box-filter smooth.
//! - Pool gate: a coarse block sum; an event without positive blocks stops here.
//! - Second scale: window sum back to raw size (optional erosion), re-extend.
//! - Regions: loose and tight peak-relative thresholds, each labelled.
//! - Reconciliation: interior cut on tight, union cut of loose against tight,
//!   relabel loose, border cuts, then `combine` into the consensus.
//! - Candidates and fit: charge centroids per consensus region, combinatorial
//!   track fit, first-hit-time residuals.

use super::params::TrackParams;
use crate::centroid::extract_candidates;
use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::{EventReport, RegionCounts, TimingBreakdown};
use crate::error::{Error, Result};
use crate::event::RawEvent;
use crate::grid::{LabelGrid, ScalarGrid};
use crate::ops::{erode, expand, extend, pool, smooth, window_sum};
use crate::regions::{
    area_cut, area_cut_until_stable, combine, label_components, peak_relative_threshold,
    union_cut, RegionTable,
};
use crate::sensors::SensorTable;
use crate::track::{fit_track, time_residuals};
use log::debug;
use std::time::Instant;

/// Loose or tight region map on the extended grid.
struct RegionMap {
    mask: ScalarGrid,
    labels: LabelGrid,
}

impl RegionMap {
    fn threshold(field: &ScalarGrid, fraction: f64, min_area: usize) -> Result<Self> {
        let mut mask = peak_relative_threshold(field, fraction)?;
        let labels = label_components(&mut mask, min_area)?.labels;
        Ok(Self { mask, labels })
    }
}

/// Per-event track reconstruction.
///
/// Holds only parameters; every call to [`TrackDetector::process`] owns its
/// grids, so one detector can be shared across threads.
#[derive(Clone, Debug, Default)]
pub struct TrackDetector {
    params: TrackParams,
}

impl TrackDetector {
    pub fn new(params: TrackParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &TrackParams {
        &self.params
    }

    /// Bin `sensors` with the configured fill parameters, then [`Self::process`].
    pub fn process_sensors(&self, sensors: SensorTable) -> Result<EventReport> {
        let event = RawEvent::from_sensors(sensors, &self.params.geometry, &self.params.fill)?;
        self.process(&event)
    }

    /// Run the full pipeline on one event.
    pub fn process(&self, event: &RawEvent) -> Result<EventReport> {
        let p = &self.params;
        p.validate()?;
        let topo = &p.geometry.topology;
        event.charge.ensure_not_empty()?;
        if event.charge.dims() != topo.raw_dims() {
            return Err(Error::DimensionMismatch {
                expected: topo.raw_dims(),
                actual: event.charge.dims(),
            });
        }
        event.charge.ensure_same_dims(&event.time_map)?;

        let total = Instant::now();
        let mut clock = Instant::now();
        let mut timings = TimingBreakdown::default();

        let mut raw = event.charge.clone();
        let mut filled = 0usize;
        for _ in 0..p.smooth_iterations {
            let n = expand(&mut raw)?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        debug!("TrackDetector::process expand filled={}", filled);
        timings.lap("expand", &mut clock);

        let mut smoothed = extend(&raw, topo)?;
        smooth(&mut smoothed, p.smooth_radius)?;
        timings.lap("smooth", &mut clock);

        let pooled = pool(&smoothed, p.pool_block)?;
        let pooled_max = pooled.max_value();
        timings.lap("pool", &mut clock);
        if pooled_max <= 0.0 {
            debug!("TrackDetector::process no signal after pooling");
            timings.total_ms = elapsed_ms(total);
            return Ok(EventReport::empty(topo.extended_dims(), timings));
        }

        let mut window = window_sum(&smoothed, topo, p.window_radius)?;
        for _ in 0..p.erosion_passes {
            if erode(&mut window, p.erosion_min_neighbors)? == 0 {
                break;
            }
        }
        let field = extend(&window, topo)?;
        timings.lap("window_sum", &mut clock);

        let mut loose = RegionMap::threshold(&field, p.loose_threshold, p.min_region_area)?;
        let mut tight = RegionMap::threshold(&field, p.tight_threshold, p.min_region_area)?;
        debug!(
            "TrackDetector::process thresholds loose={} tight={} peak={:.3}",
            loose.mask.count_nonzero(),
            tight.mask.count_nonzero(),
            field.max_value()
        );
        timings.lap("threshold", &mut clock);

        area_cut(
            &mut tight.mask,
            &mut tight.labels,
            topo,
            &p.area_cut.interior_only(),
        )?;
        let merged = union_cut(
            &mut loose.labels,
            &tight.labels,
            &mut loose.mask,
            topo,
            &p.union_cut,
        )?;
        loose.labels = label_components(&mut loose.mask, p.min_region_area)?.labels;
        let tight_out = area_cut_until_stable(
            &mut tight.mask,
            &mut tight.labels,
            topo,
            &p.area_cut.border_only(),
            p.area_cut_max_passes,
        )?;
        let loose_out = area_cut_until_stable(
            &mut loose.mask,
            &mut loose.labels,
            topo,
            &p.area_cut,
            p.area_cut_max_passes,
        )?;
        let (_, consensus) = combine(&tight.labels, &loose.labels, p.combine_min_area)?;
        let regions = RegionTable::collect(&field, &consensus.labels, topo)?;
        let region_counts = RegionCounts {
            loose: loose_out.regions.len(),
            tight: tight_out.regions.len(),
            union_cut_modified: merged.modified,
            consensus: consensus.region_count(),
        };
        debug!(
            "TrackDetector::process regions loose={} tight={} union_cut={} consensus={}",
            region_counts.loose,
            region_counts.tight,
            region_counts.union_cut_modified,
            region_counts.consensus
        );
        timings.lap("regions", &mut clock);

        let candidates = extract_candidates(
            &event.sensors,
            &consensus.labels,
            &event.time_map,
            &p.geometry,
            &p.centroid,
        )?;
        timings.lap("candidates", &mut clock);

        let track = fit_track(
            &candidates,
            event.sensors.charge_center(),
            &p.geometry,
            &event.time_map,
        )?;
        let residuals = track
            .estimate()
            .and_then(|e| time_residuals(&event.sensors, e, &p.optics));
        timings.lap("fit", &mut clock);
        timings.total_ms = elapsed_ms(total);

        debug!(
            "TrackDetector::process candidates={} fitted={} total_ms={:.3}",
            candidates.len(),
            track.estimate().is_some(),
            timings.total_ms
        );

        Ok(EventReport {
            intensity: field,
            consensus: consensus.labels,
            regions,
            region_counts,
            candidates,
            track,
            time_residuals: residuals,
            timings,
        })
    }
}
