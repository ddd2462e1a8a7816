//! Straight-line track through the candidate points.
//!
//! The fitter is combinatorial rather than least-squares: with at most four
//! points it tries every chord (three points) or every pairing of chords
//! (four points) and keeps the most vertical or most collinear one. The
//! light model in [`predict`] turns a fitted track into expected first-hit
//! times for a residual check against the measured ones.
mod fit;
pub mod predict;

pub use fit::{fit_track, TrackEstimate, TrackFit, ROTATION_TOLERANCE};
pub use predict::{predict_first_hit_time, time_residuals, OpticsParams, TimeResiduals};
