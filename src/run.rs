//! Recorded runs and their snapshots
//!
//! A run carries either a single aggregate [`MetricsBundle`] or an ordered
//! list of snapshots, each with its own performance, injury and gait data.
//! Snapshots are numbered from 1 and their distance and duration never go
//! backwards. Runs are read from JSON files and validated on load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{AletheiaError, RunError, ValidationError};
use crate::formatting::{format_duration, format_pace};
use crate::gait::GaitCycleMetrics;
use crate::injury::InjuryMetrics;
use crate::models::{MetricsBundle, RunMode, Terrain, Units};

/// One sub-segment of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    /// 1-based position in the run
    pub number: u32,

    /// Cumulative distance at the end of the snapshot
    pub distance: f64,

    /// Cumulative elapsed seconds at the end of the snapshot
    pub duration_seconds: f64,

    pub metrics: MetricsBundle,
    pub injury: InjuryMetrics,
    pub gait: GaitCycleMetrics,
}

/// Metrics recorded for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunData {
    Aggregate(MetricsBundle),
    Snapshots(Vec<RunSnapshot>),
}

/// A completed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub mode: RunMode,
    pub terrain: Terrain,
    #[serde(default)]
    pub units: Units,
    /// Total distance in `units`
    pub distance: f64,
    pub duration_seconds: f64,
    pub data: RunData,
}

impl Run {
    pub fn new(
        timestamp: DateTime<Utc>,
        mode: RunMode,
        terrain: Terrain,
        units: Units,
        distance: f64,
        duration_seconds: f64,
        data: RunData,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            mode,
            terrain,
            units,
            distance,
            duration_seconds,
            data,
        }
    }

    /// Check measurements, score ranges and snapshot ordering
    pub fn validate(&self) -> Result<(), AletheiaError> {
        check_measurement("distance", self.distance)?;
        check_measurement("duration_seconds", self.duration_seconds)?;

        match &self.data {
            RunData::Aggregate(metrics) => metrics.validate()?,
            RunData::Snapshots(snapshots) => {
                if snapshots.is_empty() {
                    return Err(RunError::NoSnapshots {
                        run_id: self.id.to_string(),
                    }
                    .into());
                }

                let mut previous: Option<&RunSnapshot> = None;
                for (index, snapshot) in snapshots.iter().enumerate() {
                    let expected = index as u32 + 1;
                    if snapshot.number != expected {
                        return Err(RunError::SnapshotOutOfSequence {
                            expected,
                            found: snapshot.number,
                        }
                        .into());
                    }
                    check_measurement("distance", snapshot.distance)?;
                    check_measurement("duration_seconds", snapshot.duration_seconds)?;
                    snapshot.metrics.validate()?;
                    snapshot.injury.validate()?;

                    if let Some(prev) = previous {
                        if snapshot.distance < prev.distance {
                            return Err(RunError::NonMonotonicSnapshot {
                                number: snapshot.number,
                                field: "distance".to_string(),
                            }
                            .into());
                        }
                        if snapshot.duration_seconds < prev.duration_seconds {
                            return Err(RunError::NonMonotonicSnapshot {
                                number: snapshot.number,
                                field: "duration_seconds".to_string(),
                            }
                            .into());
                        }
                    }

                    if !snapshot.gait.is_valid() {
                        warn!(
                            run_id = %self.id,
                            snapshot = snapshot.number,
                            "Gait phases do not add up to 100%"
                        );
                    }
                    previous = Some(snapshot);
                }
            }
        }
        Ok(())
    }

    pub fn snapshots(&self) -> &[RunSnapshot] {
        match &self.data {
            RunData::Snapshots(snapshots) => snapshots,
            RunData::Aggregate(_) => &[],
        }
    }

    pub fn latest_snapshot(&self) -> Option<&RunSnapshot> {
        self.snapshots().last()
    }

    /// Snapshot by its 1-based number
    pub fn snapshot(&self, number: u32) -> Result<&RunSnapshot, RunError> {
        self.snapshots()
            .iter()
            .find(|s| s.number == number)
            .ok_or_else(|| RunError::SnapshotNotFound {
                run_id: self.id.to_string(),
                number,
            })
    }

    /// Aggregate bundle, or the field-wise mean across snapshots
    pub fn performance(&self) -> Option<MetricsBundle> {
        match &self.data {
            RunData::Aggregate(metrics) => Some(*metrics),
            RunData::Snapshots(snapshots) => {
                let bundles: Vec<MetricsBundle> = snapshots.iter().map(|s| s.metrics).collect();
                MetricsBundle::average(&bundles)
            }
        }
    }

    pub fn pace(&self) -> String {
        format_pace(self.distance, self.duration_seconds)
    }

    pub fn formatted_duration(&self) -> String {
        format_duration(self.duration_seconds)
    }
}

fn check_measurement(field: &str, value: f64) -> Result<(), RunError> {
    if !value.is_finite() || value < 0.0 {
        return Err(RunError::InvalidMeasurement {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

/// Post-run survey, stored separately and keyed by run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSurvey {
    pub run_id: Uuid,
    /// 1 (very easy) to 10 (maximal)
    pub perceived_effort: u8,
    #[serde(default)]
    pub pain_areas: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl RunSurvey {
    pub fn new(
        run_id: Uuid,
        perceived_effort: u8,
        pain_areas: Vec<String>,
        notes: Option<String>,
    ) -> Result<Self, ValidationError> {
        if !(1..=10).contains(&perceived_effort) {
            return Err(ValidationError::EffortOutOfRange {
                value: perceived_effort,
            });
        }
        Ok(Self {
            run_id,
            perceived_effort,
            pain_areas,
            notes,
        })
    }

    pub fn reports_pain(&self) -> bool {
        !self.pain_areas.is_empty()
    }
}

/// Read and validate a run from a JSON file
pub fn load_run<P: AsRef<Path>>(path: P) -> Result<Run, AletheiaError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let run: Run = serde_json::from_str(&content).map_err(|e| RunError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    run.validate()?;

    debug!(
        run_id = %run.id,
        snapshots = run.snapshots().len(),
        path = %path.display(),
        "Loaded run"
    );
    Ok(run)
}

/// Write a run as pretty JSON
pub fn save_run<P: AsRef<Path>>(run: &Run, path: P) -> Result<(), AletheiaError> {
    let json = serde_json::to_string_pretty(run).map_err(|e| RunError::Parse {
        path: path.as_ref().to_path_buf(),
        reason: e.to_string(),
    })?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gait::LegCycle;
    use crate::injury::LegMetrics;
    use chrono::TimeZone;

    fn snapshot(number: u32, distance: f64, duration_seconds: f64, impact: u8) -> RunSnapshot {
        RunSnapshot {
            number,
            distance,
            duration_seconds,
            metrics: MetricsBundle::new(80, 75, impact, 70, 85, 65, 72).unwrap(),
            injury: InjuryMetrics::new(
                LegMetrics::new(80, 80).unwrap(),
                LegMetrics::new(60, 60).unwrap(),
            ),
            gait: GaitCycleMetrics {
                left: LegCycle::new(12.0, 25.0, 23.0, 40.0),
                right: LegCycle::new(13.0, 24.0, 23.0, 40.0),
                cadence: 170,
                contact_time_ms: 245.0,
                flight_time_ms: 105.0,
            },
        }
    }

    fn run(snapshots: Vec<RunSnapshot>) -> Run {
        Run::new(
            Utc.with_ymd_and_hms(2024, 5, 4, 7, 30, 0).unwrap(),
            RunMode::Training,
            Terrain::Road,
            Units::Metric,
            5.0,
            1650.0,
            RunData::Snapshots(snapshots),
        )
    }

    #[test]
    fn test_valid_run() {
        let run = run(vec![
            snapshot(1, 1.0, 330.0, 70),
            snapshot(2, 2.0, 660.0, 60),
            snapshot(3, 3.0, 990.0, 50),
        ]);
        assert!(run.validate().is_ok());
        assert_eq!(run.latest_snapshot().unwrap().number, 3);
        assert_eq!(run.snapshot(2).unwrap().metrics.impact, 60);
        assert_eq!(run.performance().unwrap().impact, 60);
        assert_eq!(run.pace(), "5:30");
        assert_eq!(run.formatted_duration(), "27:30");
    }

    #[test]
    fn test_out_of_sequence_snapshot() {
        let run = run(vec![snapshot(1, 1.0, 330.0, 70), snapshot(3, 2.0, 660.0, 60)]);
        assert!(matches!(
            run.validate(),
            Err(AletheiaError::Run(RunError::SnapshotOutOfSequence {
                expected: 2,
                found: 3
            }))
        ));
    }

    #[test]
    fn test_empty_snapshot_list_rejected() {
        let run = run(vec![]);
        assert!(matches!(
            run.validate(),
            Err(AletheiaError::Run(RunError::NoSnapshots { .. }))
        ));
    }

    #[test]
    fn test_distance_going_backwards() {
        let run = run(vec![snapshot(1, 2.0, 330.0, 70), snapshot(2, 1.5, 660.0, 60)]);
        assert!(matches!(
            run.validate(),
            Err(AletheiaError::Run(RunError::NonMonotonicSnapshot { number: 2, .. }))
        ));
    }

    #[test]
    fn test_out_of_range_score_rejected() {
        let mut bad = snapshot(1, 1.0, 330.0, 70);
        bad.metrics.sway = 140;
        assert!(matches!(
            run(vec![bad]).validate(),
            Err(AletheiaError::Validation(_))
        ));
    }

    #[test]
    fn test_aggregate_run_has_no_snapshots() {
        let mut run = run(vec![]);
        run.data = RunData::Aggregate(MetricsBundle::new(70, 70, 70, 70, 70, 70, 70).unwrap());
        assert!(run.validate().is_ok());
        assert!(run.latest_snapshot().is_none());
        assert!(run.snapshot(1).is_err());
        assert_eq!(run.performance().unwrap().overall_score(), 70);
    }

    #[test]
    fn test_load_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        let original = run(vec![snapshot(1, 1.0, 330.0, 70)]);

        save_run(&original, &path).unwrap();
        let loaded = load_run(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_load_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            load_run(&path),
            Err(AletheiaError::Run(RunError::Parse { .. }))
        ));
    }

    #[test]
    fn test_survey_effort_range() {
        let id = Uuid::new_v4();
        assert!(RunSurvey::new(id, 0, vec![], None).is_err());
        assert!(RunSurvey::new(id, 11, vec![], None).is_err());
        let survey = RunSurvey::new(id, 7, vec!["left knee".to_string()], None).unwrap();
        assert!(survey.reports_pain());
    }
}
