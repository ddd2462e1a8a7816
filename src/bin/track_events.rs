use log::{info, warn};
use serde::Serialize;
use shell_track::config::{self, EventInput};
use shell_track::diagnostics::RegionCounts;
use shell_track::io::write_json_file;
use shell_track::stages::CandidatePoint;
use shell_track::track::TimeResiduals;
use shell_track::{TrackDetector, TrackFit};
use std::env;
use std::path::Path;
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

/// JSON summary of one processed event.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EventSummary {
    index: usize,
    id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    region_counts: Option<RegionCounts>,
    candidates: Vec<CandidatePoint>,
    track: TrackFit,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_residuals: Option<TimeResiduals>,
    latency_ms: f64,
}

impl EventSummary {
    fn failed(index: usize, id: Option<u64>, error: String) -> Self {
        Self {
            index,
            id,
            error: Some(error),
            region_counts: None,
            candidates: Vec::new(),
            track: TrackFit::NoTrack,
            time_residuals: None,
            latency_ms: 0.0,
        }
    }
}

fn process_one(detector: &TrackDetector, index: usize, event: EventInput) -> EventSummary {
    let id = event.id;
    match detector.process_sensors(event.sensors) {
        Ok(report) => EventSummary {
            index,
            id,
            error: None,
            region_counts: Some(report.region_counts),
            candidates: report.candidates,
            track: report.track,
            time_residuals: report.time_residuals,
            latency_ms: report.timings.total_ms,
        },
        Err(e) => {
            warn!("track_events event={} id={:?} skipped: {}", index, id, e);
            EventSummary::failed(index, id, e.to_string())
        }
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = config::load_config(Path::new(&config_path)).map_err(|e| e.to_string())?;
    let events = config::load_events(&config.input_path).map_err(|e| e.to_string())?;
    let detector = TrackDetector::new(config.track_params.clone());

    let start = Instant::now();
    let summaries = process_all(&detector, events, config.threads)?;
    let failed = summaries.iter().filter(|s| s.error.is_some()).count();
    let fitted = summaries
        .iter()
        .filter(|s| matches!(s.track, TrackFit::Fitted(_)))
        .count();
    info!(
        "track_events events={} fitted={} failed={} elapsed_ms={:.1}",
        summaries.len(),
        fitted,
        failed,
        start.elapsed().as_secs_f64() * 1000.0
    );
    if config.output.fail_fast {
        if let Some(s) = summaries.iter().find(|s| s.error.is_some()) {
            return Err(format!(
                "event {} failed: {}",
                s.index,
                s.error.as_deref().unwrap_or_default()
            ));
        }
    }

    match &config.output.json_out {
        Some(path) => {
            write_json_file(path, &summaries)?;
            println!(
                "Processed {} events ({} fitted, {} failed), summaries written to {}",
                summaries.len(),
                fitted,
                failed,
                path.display()
            );
        }
        None => {
            let json = serde_json::to_string_pretty(&summaries)
                .map_err(|e| format!("Failed to serialize JSON: {e}"))?;
            println!("{json}");
        }
    }
    Ok(())
}

#[cfg(feature = "parallel")]
fn process_all(
    detector: &TrackDetector,
    events: Vec<EventInput>,
    threads: usize,
) -> Result<Vec<EventSummary>, String> {
    let work = || {
        events
            .into_par_iter()
            .enumerate()
            .map(|(i, ev)| process_one(detector, i, ev))
            .collect::<Vec<_>>()
    };
    if threads == 0 {
        Ok(work())
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| format!("Failed to build thread pool: {e}"))?;
        Ok(pool.install(work))
    }
}

#[cfg(not(feature = "parallel"))]
fn process_all(
    detector: &TrackDetector,
    events: Vec<EventInput>,
    _threads: usize,
) -> Result<Vec<EventSummary>, String> {
    Ok(events
        .into_iter()
        .enumerate()
        .map(|(i, ev)| process_one(detector, i, ev))
        .collect())
}

fn usage() -> String {
    "Usage: track_events <run_config.json>".to_string()
}
