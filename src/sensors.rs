//! Per-sensor calibration records as handed over by the ingestion layer.
use crate::error::{Error, Result};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

fn default_used() -> bool {
    true
}

/// One photomultiplier: where it sits and what it saw in this event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensorRecord {
    /// Sensor centre in detector coordinates (mm).
    pub position: Vector3<f64>,
    /// Collected charge (photo-electrons).
    pub charge: f64,
    /// First hit time (ns).
    pub first_hit_time: f64,
    #[serde(default = "default_used")]
    pub used: bool,
}

impl SensorRecord {
    pub fn new(position: Vector3<f64>, charge: f64, first_hit_time: f64) -> Self {
        Self {
            position,
            charge,
            first_hit_time,
            used: true,
        }
    }
}

/// Sensor table indexed by sensor id. Read-only for the core.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorTable {
    records: Vec<SensorRecord>,
}

impl SensorTable {
    pub fn new(records: Vec<SensorRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: usize) -> Result<&SensorRecord> {
        self.records.get(id).ok_or(Error::SensorOutOfRange {
            id,
            len: self.records.len(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &SensorRecord> {
        self.records.iter()
    }

    /// Sensors flagged as usable for this event.
    pub fn used(&self) -> impl Iterator<Item = &SensorRecord> {
        self.records.iter().filter(|r| r.used)
    }

    /// Charge-weighted mean position of all used sensors.
    ///
    /// `None` when the used sensors carry no charge.
    pub fn charge_center(&self) -> Option<Vector3<f64>> {
        let mut total = 0.0;
        let mut acc = Vector3::zeros();
        for r in self.used() {
            total += r.charge;
            acc += r.position * r.charge;
        }
        (total > 0.0).then(|| acc / total)
    }
}
