use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// Upper bound for every 0-100 score
pub const MAX_SCORE: u8 = 100;

/// Check that a score lies in 0..=100
pub(crate) fn check_score(field: &str, value: u8) -> Result<(), ValidationError> {
    if value > MAX_SCORE {
        return Err(ValidationError::ScoreOutOfRange {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

/// Truncating mean of a set of scores
pub(crate) fn mean_score(scores: &[u8]) -> u8 {
    if scores.is_empty() {
        return 0;
    }
    let sum: u32 = scores.iter().map(|&s| u32::from(s)).sum();
    (sum / scores.len() as u32) as u8
}

/// Distance units used for pace and distance display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl std::str::FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "km" => Ok(Units::Metric),
            "imperial" | "mi" | "miles" => Ok(Units::Imperial),
            _ => Err(format!("Invalid units: {}", s)),
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Units::Metric => write!(f, "metric"),
            Units::Imperial => write!(f, "imperial"),
        }
    }
}

/// Kind of session recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunMode {
    Training,
    Race,
    Recovery,
    Intervals,
}

/// Surface the run took place on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terrain {
    Road,
    Trail,
    Track,
    Treadmill,
}

/// The seven performance metrics carried by a [`MetricsBundle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceMetric {
    Efficiency,
    Braking,
    Impact,
    Sway,
    Variation,
    Warmup,
    Endurance,
}

impl PerformanceMetric {
    pub const ALL: [PerformanceMetric; 7] = [
        PerformanceMetric::Efficiency,
        PerformanceMetric::Braking,
        PerformanceMetric::Impact,
        PerformanceMetric::Sway,
        PerformanceMetric::Variation,
        PerformanceMetric::Warmup,
        PerformanceMetric::Endurance,
    ];

    /// Field name as it appears in run files
    pub fn key(&self) -> &'static str {
        match self {
            PerformanceMetric::Efficiency => "efficiency",
            PerformanceMetric::Braking => "braking",
            PerformanceMetric::Impact => "impact",
            PerformanceMetric::Sway => "sway",
            PerformanceMetric::Variation => "variation",
            PerformanceMetric::Warmup => "warmup",
            PerformanceMetric::Endurance => "endurance",
        }
    }
}

impl fmt::Display for PerformanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PerformanceMetric::Efficiency => "Efficiency",
            PerformanceMetric::Braking => "Braking",
            PerformanceMetric::Impact => "Impact",
            PerformanceMetric::Sway => "Sway",
            PerformanceMetric::Variation => "Variation",
            PerformanceMetric::Warmup => "Warmup",
            PerformanceMetric::Endurance => "Endurance",
        };
        write!(f, "{}", name)
    }
}

/// Performance scores for a run or snapshot, each in 0..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsBundle {
    /// Running economy
    pub efficiency: u8,

    /// Deceleration at foot strike (higher is less braking)
    pub braking: u8,

    /// Landing impact forces (higher is softer)
    pub impact: u8,

    /// Lateral movement (higher is more stable)
    pub sway: u8,

    /// Stride-to-stride consistency
    pub variation: u8,

    /// Warm-up quality
    pub warmup: u8,

    /// Form retention under fatigue
    pub endurance: u8,
}

impl MetricsBundle {
    /// Build a bundle, rejecting any score above 100
    pub fn new(
        efficiency: u8,
        braking: u8,
        impact: u8,
        sway: u8,
        variation: u8,
        warmup: u8,
        endurance: u8,
    ) -> Result<Self, ValidationError> {
        let bundle = Self {
            efficiency,
            braking,
            impact,
            sway,
            variation,
            warmup,
            endurance,
        };
        bundle.validate()?;
        Ok(bundle)
    }

    /// Check every field is in range
    pub fn validate(&self) -> Result<(), ValidationError> {
        for metric in PerformanceMetric::ALL {
            check_score(metric.key(), self.get(metric))?;
        }
        Ok(())
    }

    /// Score for one named metric
    pub fn get(&self, metric: PerformanceMetric) -> u8 {
        match metric {
            PerformanceMetric::Efficiency => self.efficiency,
            PerformanceMetric::Braking => self.braking,
            PerformanceMetric::Impact => self.impact,
            PerformanceMetric::Sway => self.sway,
            PerformanceMetric::Variation => self.variation,
            PerformanceMetric::Warmup => self.warmup,
            PerformanceMetric::Endurance => self.endurance,
        }
    }

    /// Arithmetic mean of the seven scores, truncated
    pub fn overall_score(&self) -> u8 {
        let scores: Vec<u8> = PerformanceMetric::ALL.iter().map(|m| self.get(*m)).collect();
        mean_score(&scores)
    }

    /// Field-wise truncated mean over several bundles
    pub fn average(bundles: &[MetricsBundle]) -> Option<MetricsBundle> {
        if bundles.is_empty() {
            return None;
        }
        let field = |metric: PerformanceMetric| {
            let scores: Vec<u8> = bundles.iter().map(|b| b.get(metric)).collect();
            mean_score(&scores)
        };
        Some(MetricsBundle {
            efficiency: field(PerformanceMetric::Efficiency),
            braking: field(PerformanceMetric::Braking),
            impact: field(PerformanceMetric::Impact),
            sway: field(PerformanceMetric::Sway),
            variation: field(PerformanceMetric::Variation),
            warmup: field(PerformanceMetric::Warmup),
            endurance: field(PerformanceMetric::Endurance),
        })
    }
}
