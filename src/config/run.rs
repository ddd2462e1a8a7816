use crate::error::{Error, Result};
use crate::io::read_json_file;
use crate::sensors::SensorTable;
use crate::TrackParams;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Per-event JSON summaries; printed to stdout when absent.
    pub json_out: Option<PathBuf>,
    /// Stop at the first failing event instead of skipping it.
    pub fail_fast: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RunConfig {
    /// JSON array of [`EventInput`].
    pub input_path: PathBuf,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub track_params: TrackParams,
    /// Worker threads; `0` lets rayon pick.
    #[serde(default)]
    pub threads: usize,
}

/// One event of the input file: the per-sensor records after calibration.
#[derive(Clone, Debug, Deserialize)]
pub struct EventInput {
    #[serde(default)]
    pub id: Option<u64>,
    pub sensors: SensorTable,
}

pub fn load_config(path: &Path) -> Result<RunConfig> {
    let config: RunConfig = read_json_file(path).map_err(Error::Config)?;
    config.track_params.validate()?;
    Ok(config)
}

pub fn load_events(path: &Path) -> Result<Vec<EventInput>> {
    read_json_file(path).map_err(Error::Config)
}
