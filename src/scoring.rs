//! Score classification
//!
//! Every 0-100 score shown to a runner is bucketed into one of three tiers:
//! - Good: 80 and above
//! - Fair: 60-79
//! - Poor: below 60
//!
//! [`MetricInfo`] carries per-metric reference text and an optimal range used
//! for the finer "excellent" rating on detail screens. That rating is a
//! presentation nuance and never replaces [`classify`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::PerformanceMetric;

/// Lower bound of the Good tier
pub const GOOD_THRESHOLD: u8 = 80;

/// Lower bound of the Fair tier
pub const FAIR_THRESHOLD: u8 = 60;

/// Qualitative bucket for a score, ordered Poor < Fair < Good
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScoreTier {
    Poor,
    Fair,
    Good,
}

/// Display color attached to a tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorTag {
    Green,
    Yellow,
    Red,
}

/// Bucket a score into a tier
pub fn classify(score: u8) -> ScoreTier {
    match score {
        s if s >= GOOD_THRESHOLD => ScoreTier::Good,
        s if s >= FAIR_THRESHOLD => ScoreTier::Fair,
        _ => ScoreTier::Poor,
    }
}

impl ScoreTier {
    pub fn color(&self) -> ColorTag {
        match self {
            ScoreTier::Good => ColorTag::Green,
            ScoreTier::Fair => ColorTag::Yellow,
            ScoreTier::Poor => ColorTag::Red,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreTier::Good => "Good",
            ScoreTier::Fair => "Fair",
            ScoreTier::Poor => "Poor",
        }
    }
}

impl fmt::Display for ScoreTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Finer rating against a metric's optimal range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricRating {
    Excellent,
    Good,
    NeedsWork,
}

impl fmt::Display for MetricRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricRating::Excellent => write!(f, "Excellent"),
            MetricRating::Good => write!(f, "Good"),
            MetricRating::NeedsWork => write!(f, "Needs Work"),
        }
    }
}

/// Reference text and optimal range for a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricInfo {
    pub title: &'static str,
    pub description: &'static str,
    /// Inclusive (lower, upper) optimal score range
    pub optimal_range: (u8, u8),
}

impl MetricInfo {
    /// Excellent within 5 points of the top of the range, Good from its bottom
    pub fn rating(&self, score: u8) -> MetricRating {
        let (lower, upper) = self.optimal_range;
        if score >= upper.saturating_sub(5) {
            MetricRating::Excellent
        } else if score >= lower {
            MetricRating::Good
        } else {
            MetricRating::NeedsWork
        }
    }

    pub fn performance(metric: PerformanceMetric) -> MetricInfo {
        match metric {
            PerformanceMetric::Efficiency => MetricInfo {
                title: "Efficiency",
                description: "How much of your energy goes into moving forward rather than up, down or sideways.",
                optimal_range: (75, 100),
            },
            PerformanceMetric::Braking => MetricInfo {
                title: "Braking",
                description: "How little you decelerate at foot strike. Landing under your hips keeps this high.",
                optimal_range: (70, 100),
            },
            PerformanceMetric::Impact => MetricInfo {
                title: "Impact",
                description: "How softly you absorb landing forces. Higher scores mean less shock through the legs.",
                optimal_range: (70, 100),
            },
            PerformanceMetric::Sway => MetricInfo {
                title: "Sway",
                description: "How well you control side-to-side movement of the pelvis and trunk.",
                optimal_range: (70, 100),
            },
            PerformanceMetric::Variation => MetricInfo {
                title: "Variation",
                description: "How consistent each stride is with the last.",
                optimal_range: (65, 100),
            },
            PerformanceMetric::Warmup => MetricInfo {
                title: "Warmup",
                description: "How quickly your form settles in during the first minutes of the run.",
                optimal_range: (60, 100),
            },
            PerformanceMetric::Endurance => MetricInfo {
                title: "Endurance",
                description: "How well your form holds up as fatigue builds.",
                optimal_range: (70, 100),
            },
        }
    }

    pub const HIP_MOBILITY: MetricInfo = MetricInfo {
        title: "Hip Mobility",
        description: "Range of motion through the hips across both legs.",
        optimal_range: (70, 100),
    };

    pub const HIP_STABILITY: MetricInfo = MetricInfo {
        title: "Hip Stability",
        description: "Control of the hips and pelvis during single-leg stance.",
        optimal_range: (70, 100),
    };

    pub const SYMMETRY: MetricInfo = MetricInfo {
        title: "Symmetry",
        description: "Balance between left and right legs. 100 is perfectly even.",
        optimal_range: (80, 100),
    };
}
