//! Per-event report returned by the pipeline and serialised by the batch
//! driver. `EventReport` carries the final maps, the candidates, the track
//! fit and a stage timing trace.

pub mod report;
pub mod timing;

pub use report::{EventReport, RegionCounts};
pub use timing::{StageTiming, TimingBreakdown};
