// Library interface for Aletheia modules
// This allows integration tests and benches to access the core functionality

pub mod catalog;
pub mod coaching;
pub mod config;
pub mod error;
pub mod export;
pub mod formatting;
pub mod gait;
pub mod injury;
pub mod logging;
pub mod models;
pub mod run;
pub mod scoring;

// Re-export commonly used types for convenience
pub use models::*;
pub use catalog::{CoachingTarget, Difficulty, Exercise, ExerciseCatalog};
pub use coaching::{analyze, CoachingAnalysis, CoachingEngine, FocusArea, OverallStatus, Severity};
pub use config::AppConfig;
pub use error::{AletheiaError, Result};
pub use export::{CoachingReport, ExportFormat, ExportManager};
pub use formatting::{format_duration, format_pace};
pub use gait::{symmetry, GaitCycleMetrics, LegCycle};
pub use injury::{InjuryMetrics, LegMetrics, RiskLevel, RiskThresholds};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use run::{load_run, Run, RunData, RunSnapshot, RunSurvey};
pub use scoring::{classify, ColorTag, MetricInfo, MetricRating, ScoreTier};
