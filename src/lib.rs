//! Hit-region segmentation and straight track fitting on a spherical
//! detector shell.
//!
//! Sensor charges are binned onto a closed (zenith, azimuth) grid, smoothed on
//! two scales, cut into loose and tight regions, reconciled into a consensus
//! map and reduced to at most four candidate points, through which a straight
//! track is fitted. [`TrackDetector`] runs the whole chain for one event;
//! the modules below expose each stage on its own.

// Public modules (stable-ish surface)
pub mod config;
pub mod detector;
pub mod diagnostics;
pub mod error;
pub mod event;
pub mod sensors;
pub mod shell;

// Stage building blocks, usable on their own.
pub mod angle;
pub mod centroid;
pub mod grid;
pub mod io;
pub mod ops;
pub mod regions;
pub mod track;

// --- High-level re-exports -------------------------------------------------

// Main entry points: detector + results.
pub use crate::detector::{TrackDetector, TrackParams};
pub use crate::diagnostics::EventReport;
pub use crate::error::{Error, Result};
pub use crate::event::{FillParams, RawEvent};
pub use crate::sensors::{SensorRecord, SensorTable};
pub use crate::shell::ShellGeometry;
pub use crate::track::{TrackEstimate, TrackFit};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use shell_track::prelude::*;
/// use nalgebra::Vector3;
///
/// # fn main() -> shell_track::Result<()> {
/// let sensors = SensorTable::new(vec![
///     SensorRecord::new(Vector3::new(0.0, 0.0, 17_500.0), 40.0, 2.0),
///     SensorRecord::new(Vector3::new(0.0, 0.0, -17_500.0), 35.0, 120.0),
/// ]);
/// let detector = TrackDetector::new(TrackParams::default());
/// let report = detector.process_sensors(sensors)?;
/// println!("candidates={} track={:?}", report.candidates.len(), report.track);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::grid::{GridTopology, LabelGrid, ScalarGrid};
    pub use crate::{
        EventReport, RawEvent, SensorRecord, SensorTable, ShellGeometry, TrackDetector,
        TrackFit, TrackParams,
    };
}

// --- Stage-level API (for tools & advanced users) ---------------------------

pub mod stages {
    pub use crate::centroid::{extract_candidates, CandidatePoint, CentroidParams};
    pub use crate::ops::{erode, expand, expand_labels, extend, pool, smooth, window_sum};
    pub use crate::regions::{
        area_cut, area_cut_until_stable, combine, label_components, peak_relative_threshold,
        union_cut, AreaCutParams, Labeling, RegionTable, UnionCutParams,
    };
    pub use crate::track::{fit_track, predict_first_hit_time, time_residuals, OpticsParams};
}
