use nalgebra::Vector3;
use shell_track::shell::point_at_angles;
use shell_track::track::{predict_first_hit_time, OpticsParams};
use shell_track::{SensorRecord, SensorTable, ShellGeometry};

/// Sensors sit on a sphere just inside the shell.
pub const SENSOR_RADIUS_FRACTION: f64 = 0.99;

/// Gaussian charge spot on the sphere.
#[derive(Clone, Copy, Debug)]
pub struct Spot {
    pub theta: f64,
    pub phi: f64,
    pub amplitude: f64,
    /// Angular width (rad).
    pub sigma: f64,
}

impl Spot {
    pub fn new(theta: f64, phi: f64) -> Self {
        Self {
            theta,
            phi,
            amplitude: 60.0,
            sigma: 0.08,
        }
    }

    pub fn direction(&self) -> Vector3<f64> {
        point_at_angles(1.0, self.theta, self.phi)
    }

    fn charge_at(&self, dir: &Vector3<f64>) -> f64 {
        let ang = dir.angle(&self.direction());
        self.amplitude * (-0.5 * (ang / self.sigma).powi(2)).exp()
    }
}

/// One sensor at the centre of every raw cell of `geometry`.
///
/// Charge is the sum of the spots on top of `background`. When `track` is
/// given as `(entry, direction)` first-hit times follow the Cherenkov model
/// with the muon entering at `t = 0`; otherwise every time is 1 ns.
pub fn sphere_event(
    geometry: &ShellGeometry,
    spots: &[Spot],
    background: f64,
    track: Option<(Vector3<f64>, Vector3<f64>)>,
) -> SensorTable {
    let (nz, na) = geometry.topology.raw_dims();
    let optics = OpticsParams::default();
    let mut records = Vec::with_capacity(nz * na);
    for z in 0..nz {
        for a in 0..na {
            let (theta, phi) = geometry.angles_of_cell(z, a);
            let dir = point_at_angles(
                1.0,
                theta + 0.5 * geometry.zenith_step(),
                phi + 0.5 * geometry.azimuth_step(),
            );
            let position = dir * (geometry.radius * SENSOR_RADIUS_FRACTION);
            let charge = background + spots.iter().map(|s| s.charge_at(&dir)).sum::<f64>();
            let time = match track {
                Some((entry, d)) => predict_first_hit_time(&position, &entry, &d, 0.0, &optics),
                None => 1.0,
            };
            records.push(SensorRecord::new(position, charge, time));
        }
    }
    SensorTable::new(records)
}

/// Sensor table of a straight muon crossing the shell between two spots,
/// plus the true entry point and unit direction.
pub fn through_going_muon(
    geometry: &ShellGeometry,
    entry: Spot,
    exit: Spot,
) -> (SensorTable, Vector3<f64>, Vector3<f64>) {
    let p_in = entry.direction() * geometry.radius;
    let p_out = exit.direction() * geometry.radius;
    let dir = (p_out - p_in).normalize();
    let table = sphere_event(geometry, &[entry, exit], 0.5, Some((p_in, dir)));
    (table, p_in, dir)
}
