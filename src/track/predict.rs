//! Expected first-hit times under a Cherenkov light model.
//!
//! A muon travelling along the track emits light at the Cherenkov angle
//! `cos θc = 1 / n`. The earliest photon reaching a sensor leaves the track at
//! the point whose emission cone passes through the sensor.
use super::fit::TrackEstimate;
use crate::sensors::SensorTable;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpticsParams {
    /// Refractive index of the medium the light travels through.
    pub refractive_index: f64,
    /// Speed of light in vacuum (mm/ns).
    pub light_speed: f64,
    /// Muon speed along the track (mm/ns).
    pub muon_speed: f64,
    /// Only hits earlier than this (ns) enter the residual summary.
    pub time_cut: f64,
}

impl Default for OpticsParams {
    fn default() -> Self {
        Self {
            refractive_index: 1.34,
            light_speed: 299.0,
            muon_speed: 299.0,
            time_cut: 100.0,
        }
    }
}

/// Predicted first-hit time of a sensor at `sensor` for a track entering at
/// `incidence` at time `t0` and travelling along the unit vector `direction`.
pub fn predict_first_hit_time(
    sensor: &Vector3<f64>,
    incidence: &Vector3<f64>,
    direction: &Vector3<f64>,
    t0: f64,
    optics: &OpticsParams,
) -> f64 {
    let n = optics.refractive_index;
    let tan_c = (n * n - 1.0).max(f64::EPSILON).sqrt();
    let foot = incidence + direction * (sensor - incidence).dot(direction);
    let source = foot - direction * ((sensor - foot).norm() / tan_c);
    t0 + (source - incidence).dot(direction) / optics.muon_speed
        + (sensor - source).norm() * n / optics.light_speed
}

/// Mean and RMS of `predicted − measured` over the sensors of one event.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TimeResiduals {
    pub count: usize,
    pub mean: f64,
    pub rms: f64,
}

/// Residual summary of a fitted track against the used sensors that fired
/// before `optics.time_cut`. `None` when no sensor qualifies.
pub fn time_residuals(
    sensors: &SensorTable,
    estimate: &TrackEstimate,
    optics: &OpticsParams,
) -> Option<TimeResiduals> {
    let mut count = 0usize;
    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    for rec in sensors.used() {
        if rec.first_hit_time <= 0.0 || rec.first_hit_time >= optics.time_cut {
            continue;
        }
        let predicted = predict_first_hit_time(
            &rec.position,
            &estimate.incidence_point,
            &estimate.direction,
            estimate.candidate_time,
            optics,
        );
        let r = predicted - rec.first_hit_time;
        count += 1;
        sum += r;
        sum_sq += r * r;
    }
    (count > 0).then(|| {
        let c = count as f64;
        TimeResiduals {
            count,
            mean: sum / c,
            rms: (sum_sq / c).sqrt(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::SensorRecord;

    #[test]
    fn sensor_on_the_track_sees_the_muon_itself() {
        let optics = OpticsParams::default();
        let inci = Vector3::new(0.0, 0.0, 17_700.0);
        let dir = Vector3::new(0.0, 0.0, -1.0);
        let sensor = inci + dir * 2990.0;
        let t = predict_first_hit_time(&sensor, &inci, &dir, 5.0, &optics);
        assert!((t - 15.0).abs() < 1e-9, "t = {t}");
    }

    #[test]
    fn off_track_sensor_follows_cherenkov_geometry() {
        let optics = OpticsParams::default();
        let n = optics.refractive_index;
        let tan_c = (n * n - 1.0).sqrt();
        let inci = Vector3::zeros();
        let dir = Vector3::new(1.0, 0.0, 0.0);
        let (along, h) = (5000.0, 1200.0);
        let sensor = Vector3::new(along, h, 0.0);
        let expected = (along - h / tan_c) / optics.muon_speed
            + h * n / tan_c * n / optics.light_speed;
        let t = predict_first_hit_time(&sensor, &inci, &dir, 0.0, &optics);
        assert!((t - expected).abs() < 1e-9, "t = {t}, expected {expected}");
    }

    #[test]
    fn residuals_skip_late_and_unused_sensors() {
        let optics = OpticsParams::default();
        let estimate = TrackEstimate {
            incidence_point: Vector3::new(0.0, 0.0, 1000.0),
            direction: Vector3::new(0.0, 0.0, -1.0),
            transverse_residual: 0.0,
            rotation_residual: 0.0,
            candidate_time: 0.0,
            candidates_used: 2,
        };
        // On-track sensors 299 mm and 598 mm down the line: predictions 1 and 2 ns.
        let mut unused = SensorRecord::new(Vector3::new(0.0, 0.0, 0.0), 1.0, 50.0);
        unused.used = false;
        let table = SensorTable::new(vec![
            SensorRecord::new(Vector3::new(0.0, 0.0, 701.0), 1.0, 2.0),
            SensorRecord::new(Vector3::new(0.0, 0.0, 402.0), 1.0, 1.0),
            SensorRecord::new(Vector3::new(0.0, 0.0, 0.0), 1.0, 500.0),
            unused,
        ]);
        let r = time_residuals(&table, &estimate, &optics).expect("residuals");
        assert_eq!(r.count, 2);
        assert!(r.mean.abs() < 1e-9);
        assert!((r.rms - 1.0).abs() < 1e-9);
    }
}
