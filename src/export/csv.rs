use csv::Writer;
use serde::Serialize;
use std::path::Path;

use crate::error::{AletheiaError, RunError};
use crate::formatting::{format_duration, format_pace};
use crate::run::Run;

/// One row of the snapshot table
#[derive(Debug, Serialize)]
struct SnapshotRow {
    snapshot: u32,
    distance: f64,
    duration: String,
    pace: String,
    efficiency: u8,
    braking: u8,
    impact: u8,
    sway: u8,
    variation: u8,
    warmup: u8,
    endurance: u8,
    performance_overall: u8,
    hip_mobility: u8,
    hip_stability: u8,
    injury_symmetry: u8,
    risk_level: String,
    cadence: u16,
    contact_time_ms: f64,
    flight_time_ms: f64,
    gait_symmetry: u8,
}

/// Export every snapshot of a run as CSV (suitable for spreadsheet plotting)
///
/// Pace is per snapshot, computed from the change in distance and duration
/// since the previous one.
pub fn export_snapshots<P: AsRef<Path>>(run: &Run, output_path: P) -> Result<(), AletheiaError> {
    let snapshots = run.snapshots();
    if snapshots.is_empty() {
        return Err(RunError::NoSnapshots {
            run_id: run.id.to_string(),
        }
        .into());
    }

    let mut writer = Writer::from_path(output_path).map_err(super::ExportError::from)?;

    let mut prev_distance = 0.0;
    let mut prev_duration = 0.0;
    for snapshot in snapshots {
        let row = SnapshotRow {
            snapshot: snapshot.number,
            distance: snapshot.distance,
            duration: format_duration(snapshot.duration_seconds),
            pace: format_pace(
                snapshot.distance - prev_distance,
                snapshot.duration_seconds - prev_duration,
            ),
            efficiency: snapshot.metrics.efficiency,
            braking: snapshot.metrics.braking,
            impact: snapshot.metrics.impact,
            sway: snapshot.metrics.sway,
            variation: snapshot.metrics.variation,
            warmup: snapshot.metrics.warmup,
            endurance: snapshot.metrics.endurance,
            performance_overall: snapshot.metrics.overall_score(),
            hip_mobility: snapshot.injury.hip_mobility(),
            hip_stability: snapshot.injury.hip_stability(),
            injury_symmetry: snapshot.injury.symmetry_score(),
            risk_level: snapshot.injury.risk_level().to_string(),
            cadence: snapshot.gait.cadence,
            contact_time_ms: snapshot.gait.contact_time_ms,
            flight_time_ms: snapshot.gait.flight_time_ms,
            gait_symmetry: snapshot.gait.symmetry_score(),
        };
        writer.serialize(row).map_err(super::ExportError::from)?;

        prev_distance = snapshot.distance;
        prev_duration = snapshot.duration_seconds;
    }

    writer.flush().map_err(super::ExportError::from)?;
    Ok(())
}
