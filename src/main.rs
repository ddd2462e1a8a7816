use shell_track::io::{read_json_file, write_json_file};
use shell_track::{EventReport, SensorTable, TrackDetector, TrackFit, TrackParams};
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = env::args().skip(1);
    let sensors_path = args.next().ok_or_else(usage)?;
    let params = match args.next() {
        Some(path) => read_json_file::<TrackParams>(Path::new(&path))?,
        None => TrackParams::default(),
    };
    let json_out = args.next();

    let sensors: SensorTable = read_json_file(Path::new(&sensors_path))?;
    let detector = TrackDetector::new(params);
    let report = detector
        .process_sensors(sensors)
        .map_err(|e| format!("Failed to process {sensors_path}: {e}"))?;

    print_text_summary(&report);
    if let Some(path) = json_out {
        write_json_file(Path::new(&path), &report)?;
        println!("\nJSON report written to {path}");
    }
    Ok(())
}

fn print_text_summary(report: &EventReport) {
    println!("Reconstruction summary");
    println!("  consensus regions: {}", report.region_counts.consensus);
    println!("  candidates: {}", report.candidates.len());
    for c in &report.candidates {
        println!(
            "    label={} bin=({}, {}) r={:.1} hits={} t={:.2}",
            c.label, c.zenith_bin, c.azimuth_bin, c.radius, c.area, c.time
        );
    }
    match &report.track {
        TrackFit::NoTrack => println!("  track: none"),
        TrackFit::Fitted(e) => {
            let (p, d) = (&e.incidence_point, &e.direction);
            println!("  incidence: ({:.1}, {:.1}, {:.1})", p.x, p.y, p.z);
            println!("  direction: ({:.4}, {:.4}, {:.4})", d.x, d.y, d.z);
            println!(
                "  residuals: transverse={:.1} rotation={:.3} t0={:.2}",
                e.transverse_residual, e.rotation_residual, e.candidate_time
            );
        }
    }
    if let Some(r) = &report.time_residuals {
        println!(
            "  time residuals: n={} mean={:.2} rms={:.2}",
            r.count, r.mean, r.rms
        );
    }
    println!("  latency_ms: {:.3}", report.timings.total_ms);
}

fn usage() -> String {
    "Usage: shell_track <sensors.json> [params.json] [report.json]".to_string()
}
