//! Track detector orchestrating the per-event reconstruction.
//!
//! Overview
//! - Smooths the raw charge grid on two scales with the polar and azimuthal
//!   wrap materialised as a ghost margin.
//! - Extracts a loose and a tight region map by peak-relative thresholds and
//!   reconciles them into one consensus map.
//! - Reduces consensus regions to at most four charge centroids and fits a
//!   straight track through them.
//!
//! Modules
//! - [`params`] – configuration types used by the detector and the batch CLI.
//! - `pipeline` – the [`TrackDetector`] implementation.

pub mod params;
mod pipeline;

pub use params::TrackParams;
pub use pipeline::TrackDetector;
