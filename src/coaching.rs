//! Rule-based coaching analysis
//!
//! A single pass over one snapshot's metrics produces:
//! - up to three focus areas, worst score first, each with matching drills
//! - a list of strengths for metrics well above target
//! - an overall status from the mean of performance and injury scores
//!
//! Only impact, sway and hip mobility have focus rules. Efficiency can only
//! show up as a strength.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::catalog::{CoachingTarget, Exercise, ExerciseCatalog};
use crate::error::{AletheiaError, RunError};
use crate::injury::InjuryMetrics;
use crate::models::MetricsBundle;
use crate::run::Run;

/// Impact below this becomes a focus area
pub const IMPACT_FOCUS_THRESHOLD: u8 = 60;

/// Sway below this becomes a focus area
pub const SWAY_FOCUS_THRESHOLD: u8 = 60;

/// Hip mobility below this becomes a focus area
pub const HIP_MOBILITY_FOCUS_THRESHOLD: u8 = 70;

/// Impact, sway or efficiency at or above this is a strength
pub const STRENGTH_THRESHOLD: u8 = 85;

/// Focus areas returned per analysis
pub const MAX_FOCUS_AREAS: usize = 3;

/// Drills attached to each focus area
pub const EXERCISES_PER_FOCUS_AREA: usize = 2;

/// How urgently a focus area needs work
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s < 50 => Severity::High,
            s if s < 70 => Severity::Medium,
            _ => Severity::Low,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "Low"),
            Severity::Medium => write!(f, "Medium"),
            Severity::High => write!(f, "High"),
        }
    }
}

/// One under-performing metric with guidance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusArea {
    pub target: CoachingTarget,
    pub title: String,
    pub score: u8,
    pub severity: Severity,
    pub explanation: String,
    pub quick_tip: String,
    pub exercises: Vec<Exercise>,
}

impl FocusArea {
    fn build(
        target: CoachingTarget,
        title: &str,
        score: u8,
        explanation: &str,
        quick_tip: &str,
        catalog: &ExerciseCatalog,
    ) -> Self {
        Self {
            target,
            title: title.to_string(),
            score,
            severity: Severity::from_score(score),
            explanation: explanation.to_string(),
            quick_tip: quick_tip.to_string(),
            exercises: catalog.recommend(target, score, EXERCISES_PER_FOCUS_AREA),
        }
    }

    pub fn high_impact(score: u8, catalog: &ExerciseCatalog) -> Self {
        Self::build(
            CoachingTarget::Impact,
            "High Impact Forces",
            score,
            "You're landing hard, sending extra shock through your shins, knees and hips. \
             Over time this raises the risk of stress injuries.",
            "Take shorter, quicker steps and aim to land quietly.",
            catalog,
        )
    }

    pub fn lateral_sway(score: u8, catalog: &ExerciseCatalog) -> Self {
        Self::build(
            CoachingTarget::Sway,
            "Lateral Sway",
            score,
            "Your hips and trunk are moving side to side, wasting energy and loading \
             the knees and IT band unevenly.",
            "Keep your hips level and run as if on two parallel lines.",
            catalog,
        )
    }

    pub fn hip_mobility(score: u8, catalog: &ExerciseCatalog) -> Self {
        Self::build(
            CoachingTarget::HipMobility,
            "Limited Hip Mobility",
            score,
            "Restricted hip range shortens your push-off and forces the lower back and \
             knees to compensate.",
            "Spend five minutes on dynamic hip drills before every run.",
            catalog,
        )
    }
}

/// Overall verdict for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallStatus {
    Good,
    Attention,
    Concern,
}

impl OverallStatus {
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= 80 => OverallStatus::Good,
            s if s >= 60 => OverallStatus::Attention,
            _ => OverallStatus::Concern,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            OverallStatus::Good => "Great Run!",
            OverallStatus::Attention => "Room to Improve",
            OverallStatus::Concern => "Needs Attention",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            OverallStatus::Good => "✓",
            OverallStatus::Attention => "!",
            OverallStatus::Concern => "✗",
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            OverallStatus::Good => {
                "Your form looked strong today. Keep doing what you're doing and use the drills below to stay sharp."
            }
            OverallStatus::Attention => {
                "Solid run with a few areas that need work. Focus on the items below to stay injury-free."
            }
            OverallStatus::Concern => {
                "Several metrics point to increased injury risk. Ease off intensity and prioritise the exercises below."
            }
        }
    }
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Result of coaching analysis for one snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoachingAnalysis {
    pub overall_status: OverallStatus,
    pub summary_message: String,
    /// Mean of performance and injury overall scores
    pub average_score: u8,
    /// At most [`MAX_FOCUS_AREAS`], worst first
    pub focus_areas: Vec<FocusArea>,
    pub strengths: Vec<String>,
}

impl CoachingAnalysis {
    /// Drills across all focus areas
    pub fn total_exercises(&self) -> usize {
        self.focus_areas.iter().map(|f| f.exercises.len()).sum()
    }

    /// Percent of drills completed, 0.0 when there are none
    pub fn progress_percent(&self, completed: usize) -> f64 {
        let total = self.total_exercises();
        if total == 0 {
            return 0.0;
        }
        completed.min(total) as f64 / total as f64 * 100.0
    }

    pub fn has_focus_areas(&self) -> bool {
        !self.focus_areas.is_empty()
    }
}

/// Coaching rules bound to an exercise catalog
#[derive(Debug, Clone, Default)]
pub struct CoachingEngine {
    catalog: ExerciseCatalog,
}

impl CoachingEngine {
    /// Engine using the built-in catalog
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(catalog: ExerciseCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ExerciseCatalog {
        &self.catalog
    }

    pub fn analyze(&self, metrics: &MetricsBundle, injury: &InjuryMetrics) -> CoachingAnalysis {
        let mut focus_areas = Vec::new();
        let mut strengths = Vec::new();

        if metrics.impact < IMPACT_FOCUS_THRESHOLD {
            focus_areas.push(FocusArea::high_impact(metrics.impact, &self.catalog));
        } else if metrics.impact >= STRENGTH_THRESHOLD {
            strengths.push("Soft, controlled landings".to_string());
        }

        if metrics.sway < SWAY_FOCUS_THRESHOLD {
            focus_areas.push(FocusArea::lateral_sway(metrics.sway, &self.catalog));
        } else if metrics.sway >= STRENGTH_THRESHOLD {
            strengths.push("Stable side-to-side control".to_string());
        }

        let hip_mobility = injury.hip_mobility();
        if hip_mobility < HIP_MOBILITY_FOCUS_THRESHOLD {
            focus_areas.push(FocusArea::hip_mobility(hip_mobility, &self.catalog));
        }

        if metrics.efficiency >= STRENGTH_THRESHOLD {
            strengths.push("Efficient running form".to_string());
        }

        // stable, so ties keep rule order
        focus_areas.sort_by_key(|f| f.score);
        focus_areas.truncate(MAX_FOCUS_AREAS);

        let performance_overall = u16::from(metrics.overall_score());
        let injury_overall = u16::from(injury.overall_score());
        let average_score = ((performance_overall + injury_overall) / 2) as u8;
        let overall_status = OverallStatus::from_score(average_score);

        debug!(
            average_score,
            status = ?overall_status,
            focus_areas = focus_areas.len(),
            strengths = strengths.len(),
            "Coaching analysis complete"
        );

        CoachingAnalysis {
            overall_status,
            summary_message: overall_status.summary().to_string(),
            average_score,
            focus_areas,
            strengths,
        }
    }

    /// Analyse the most recent snapshot of a run
    pub fn analyze_run(&self, run: &Run) -> Result<CoachingAnalysis, AletheiaError> {
        let snapshot = run.latest_snapshot().ok_or_else(|| RunError::MissingData {
            analysis: "coaching".to_string(),
            reason: format!("run {} has no snapshot with injury metrics", run.id),
        })?;
        Ok(self.analyze(&snapshot.metrics, &snapshot.injury))
    }
}

/// Analyse one snapshot with the built-in catalog
pub fn analyze(metrics: &MetricsBundle, injury: &InjuryMetrics) -> CoachingAnalysis {
    CoachingEngine::new().analyze(metrics, injury)
}
