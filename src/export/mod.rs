use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::coaching::{CoachingAnalysis, CoachingEngine};
use crate::error::{AletheiaError, RunError};
use crate::formatting::{format_distance, pace_label};
use crate::injury::RiskLevel;
use crate::models::{MetricsBundle, RunMode, Terrain};
use crate::run::Run;
use crate::scoring::{classify, ScoreTier};

pub mod csv;
pub mod json;
pub mod text;

/// Export format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Csv,
    Json,
    Text,
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "text" | "txt" => Ok(ExportFormat::Text),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] ::csv::Error),
}

/// Injury block of a coaching report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjurySummary {
    pub hip_mobility: u8,
    pub hip_stability: u8,
    pub symmetry: u8,
    pub overall: u8,
    pub risk_level: RiskLevel,
}

/// Gait block of a coaching report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaitSummary {
    pub cadence: u16,
    pub contact_time_ms: f64,
    pub flight_time_ms: f64,
    pub symmetry: u8,
    pub phases_valid: bool,
}

/// Everything shown on the post-run coaching screen for one snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachingReport {
    pub run_id: Uuid,
    pub run_timestamp: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
    pub mode: RunMode,
    pub terrain: Terrain,
    pub distance: String,
    pub duration: String,
    pub pace: String,
    pub snapshot_number: u32,
    pub performance: MetricsBundle,
    pub performance_overall: u8,
    pub performance_tier: ScoreTier,
    pub injury: InjurySummary,
    pub gait: GaitSummary,
    pub analysis: CoachingAnalysis,
}

impl CoachingReport {
    /// Report for the latest snapshot, or for `snapshot` when given
    pub fn build(
        run: &Run,
        snapshot: Option<u32>,
        engine: &CoachingEngine,
    ) -> Result<Self, AletheiaError> {
        let snapshot = match snapshot {
            Some(number) => run.snapshot(number)?,
            None => run.latest_snapshot().ok_or_else(|| RunError::NoSnapshots {
                run_id: run.id.to_string(),
            })?,
        };

        let analysis = engine.analyze(&snapshot.metrics, &snapshot.injury);
        let injury = &snapshot.injury;
        let performance_overall = snapshot.metrics.overall_score();

        Ok(CoachingReport {
            run_id: run.id,
            run_timestamp: run.timestamp,
            generated_at: Utc::now(),
            mode: run.mode,
            terrain: run.terrain,
            distance: format_distance(run.distance, run.units),
            duration: run.formatted_duration(),
            pace: format!("{}{}", run.pace(), pace_label(run.units)),
            snapshot_number: snapshot.number,
            performance: snapshot.metrics,
            performance_overall,
            performance_tier: classify(performance_overall),
            injury: InjurySummary {
                hip_mobility: injury.hip_mobility(),
                hip_stability: injury.hip_stability(),
                symmetry: injury.symmetry_score(),
                overall: injury.overall_score(),
                risk_level: injury.risk_level(),
            },
            gait: GaitSummary {
                cadence: snapshot.gait.cadence,
                contact_time_ms: snapshot.gait.contact_time_ms,
                flight_time_ms: snapshot.gait.flight_time_ms,
                symmetry: snapshot.gait.symmetry_score(),
                phases_valid: snapshot.gait.is_valid(),
            },
            analysis,
        })
    }
}

/// Writes run data and coaching reports to disk
#[derive(Debug, Default)]
pub struct ExportManager {
    engine: CoachingEngine,
}

impl ExportManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(engine: CoachingEngine) -> Self {
        Self { engine }
    }

    /// CSV exports the snapshot table; JSON and text export the coaching report
    pub fn export<P: AsRef<Path>>(
        &self,
        run: &Run,
        format: ExportFormat,
        output_path: P,
    ) -> Result<(), AletheiaError> {
        match format {
            ExportFormat::Csv => csv::export_snapshots(run, output_path.as_ref())?,
            ExportFormat::Json => {
                let report = CoachingReport::build(run, None, &self.engine)?;
                json::export_report(&report, output_path.as_ref())?
            }
            ExportFormat::Text => {
                let report = CoachingReport::build(run, None, &self.engine)?;
                text::export_report(&report, output_path.as_ref())?
            }
        }

        info!(
            run_id = %run.id,
            format = ?format,
            path = %output_path.as_ref().display(),
            "Export completed"
        );
        Ok(())
    }
}
