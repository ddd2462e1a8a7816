//! Run configuration of the batch driver.
pub mod run;

pub use run::{load_config, load_events, EventInput, OutputConfig, RunConfig};
