//! Raw per-event grids: the binned charge field and the first-hit-time map.
use crate::error::Result;
use crate::grid::ScalarGrid;
use crate::sensors::SensorTable;
use crate::shell::ShellGeometry;
use log::debug;
use serde::{Deserialize, Serialize};

/// Binning options used when the raw grids are built from the sensor table.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillParams {
    /// Hits at or after this time (ns) do not enter the time map.
    pub time_cut: f64,
    /// Divide the charge of each cell by its relative sensor occupancy.
    pub normalize_occupancy: bool,
}

impl Default for FillParams {
    fn default() -> Self {
        Self {
            time_cut: 100.0,
            normalize_occupancy: true,
        }
    }
}

/// Input of one pipeline invocation.
#[derive(Clone, Debug)]
pub struct RawEvent {
    /// Charge per raw cell, raw topology dimensions.
    pub charge: ScalarGrid,
    /// Earliest hit time per raw cell, `0` where no sensor fired in time.
    pub time_map: ScalarGrid,
    pub sensors: SensorTable,
}

impl RawEvent {
    pub fn new(charge: ScalarGrid, time_map: ScalarGrid, sensors: SensorTable) -> Result<Self> {
        charge.ensure_same_dims(&time_map)?;
        Ok(Self {
            charge,
            time_map,
            sensors,
        })
    }

    /// Bin the used sensors of `sensors` onto the raw grid of `geometry`.
    pub fn from_sensors(
        sensors: SensorTable,
        geometry: &ShellGeometry,
        params: &FillParams,
    ) -> Result<Self> {
        geometry.topology.validate()?;
        let (nz, na) = geometry.topology.raw_dims();
        let mut charge = ScalarGrid::new(nz, na);
        let mut occupancy = ScalarGrid::new(nz, na);
        let mut time_map = ScalarGrid::new(nz, na);

        let mut binned = 0usize;
        for rec in sensors.used() {
            let Some((z, a)) = geometry.cell_of(&rec.position) else {
                continue;
            };
            binned += 1;
            charge.set(z, a, charge.get(z, a) + rec.charge);
            occupancy.set(z, a, occupancy.get(z, a) + 1.0);
            if rec.first_hit_time < params.time_cut {
                let t = time_map.get(z, a);
                if t == 0.0 || rec.first_hit_time < t {
                    time_map.set(z, a, rec.first_hit_time);
                }
            }
        }

        if params.normalize_occupancy {
            let max_occ = occupancy.max_value();
            if max_occ > 0.0 {
                for (q, &n) in charge.data.iter_mut().zip(occupancy.data.iter()) {
                    if n > 0.0 {
                        *q *= max_occ / n;
                    }
                }
            }
        }
        debug!(
            "RawEvent::from_sensors binned={} sensors={} grid={}x{}",
            binned,
            sensors.len(),
            nz,
            na
        );

        Ok(Self {
            charge,
            time_map,
            sensors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::SensorRecord;
    use crate::shell::point_at_angles;

    #[test]
    fn binning_keeps_earliest_time_and_normalizes_occupancy() {
        let geo = ShellGeometry::default();
        let (theta, phi) = geo.angles_of_cell(40, 120);
        let inside = |dt: f64, dp: f64| {
            point_at_angles(
                geo.radius,
                theta + dt * geo.zenith_step(),
                phi + dp * geo.azimuth_step(),
            )
        };
        let (theta2, phi2) = geo.angles_of_cell(60, 20);
        let lone = point_at_angles(
            geo.radius,
            theta2 + 0.5 * geo.zenith_step(),
            phi2 + 0.5 * geo.azimuth_step(),
        );
        let table = SensorTable::new(vec![
            SensorRecord::new(inside(0.3, 0.3), 10.0, 42.0),
            SensorRecord::new(inside(0.6, 0.6), 30.0, 17.0),
            SensorRecord::new(lone, 5.0, 250.0),
        ]);
        let ev = RawEvent::from_sensors(table, &geo, &FillParams::default()).expect("fill");
        // Two sensors in the shared cell: max occupancy 2, factor 1.
        assert_eq!(ev.charge.get(40, 120), 40.0);
        // One sensor alone: scaled up to the densest cell.
        assert_eq!(ev.charge.get(60, 20), 10.0);
        assert_eq!(ev.time_map.get(40, 120), 17.0);
        // Late hit is dropped from the time map.
        assert_eq!(ev.time_map.get(60, 20), 0.0);
    }
}
