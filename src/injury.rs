//! Injury-risk metrics derived from per-leg hip mobility and stability

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::models::{check_score, mean_score};

/// Mobility and stability scores for one leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegMetrics {
    pub mobility: u8,
    pub stability: u8,
}

impl LegMetrics {
    pub fn new(mobility: u8, stability: u8) -> Result<Self, ValidationError> {
        check_score("mobility", mobility)?;
        check_score("stability", stability)?;
        Ok(Self {
            mobility,
            stability,
        })
    }
}

/// Injury risk bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Moderate => write!(f, "Moderate"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

/// Cut points for [`RiskLevel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// Overall score at or above which risk is Low
    pub low: u8,
    /// Overall score at or above which risk is Moderate
    pub moderate: u8,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            low: 75,
            moderate: 50,
        }
    }
}

impl RiskThresholds {
    pub fn level(&self, score: u8) -> RiskLevel {
        if score >= self.low {
            RiskLevel::Low
        } else if score >= self.moderate {
            RiskLevel::Moderate
        } else {
            RiskLevel::High
        }
    }
}

/// Per-leg hip mobility and stability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjuryMetrics {
    pub left_leg: LegMetrics,
    pub right_leg: LegMetrics,
}

impl InjuryMetrics {
    pub fn new(left_leg: LegMetrics, right_leg: LegMetrics) -> Self {
        Self {
            left_leg,
            right_leg,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_score("left_leg.mobility", self.left_leg.mobility)?;
        check_score("left_leg.stability", self.left_leg.stability)?;
        check_score("right_leg.mobility", self.right_leg.mobility)?;
        check_score("right_leg.stability", self.right_leg.stability)?;
        Ok(())
    }

    /// Mean mobility of both legs
    pub fn hip_mobility(&self) -> u8 {
        mean_score(&[self.left_leg.mobility, self.right_leg.mobility])
    }

    /// Mean stability of both legs
    pub fn hip_stability(&self) -> u8 {
        mean_score(&[self.left_leg.stability, self.right_leg.stability])
    }

    /// `100 - 2 * mean(|left - right|)`, floored at 0
    ///
    /// The mean is truncated before doubling, so an odd total difference of 1
    /// still scores 100.
    pub fn symmetry_score(&self) -> u8 {
        let mobility_diff = self.left_leg.mobility.abs_diff(self.right_leg.mobility);
        let stability_diff = self.left_leg.stability.abs_diff(self.right_leg.stability);
        let avg_diff = mean_score(&[mobility_diff, stability_diff]);
        100u8.saturating_sub(avg_diff.saturating_mul(2))
    }

    /// Mean of hip mobility, hip stability and symmetry
    pub fn overall_score(&self) -> u8 {
        mean_score(&[
            self.hip_mobility(),
            self.hip_stability(),
            self.symmetry_score(),
        ])
    }

    /// Risk bucket using the canonical 75/50 table
    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level_with(&RiskThresholds::default())
    }

    pub fn risk_level_with(&self, thresholds: &RiskThresholds) -> RiskLevel {
        thresholds.level(self.overall_score())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn injury(left: (u8, u8), right: (u8, u8)) -> InjuryMetrics {
        InjuryMetrics::new(
            LegMetrics::new(left.0, left.1).unwrap(),
            LegMetrics::new(right.0, right.1).unwrap(),
        )
    }

    #[test]
    fn test_uneven_legs() {
        let metrics = injury((80, 80), (60, 60));
        assert_eq!(metrics.hip_mobility(), 70);
        assert_eq!(metrics.hip_stability(), 70);
        assert_eq!(metrics.symmetry_score(), 60);
        // (70 + 70 + 60) / 3 = 66
        assert_eq!(metrics.overall_score(), 66);
        assert_eq!(metrics.risk_level(), RiskLevel::Moderate);
    }

    #[test]
    fn test_symmetric_legs() {
        let metrics = injury((85, 90), (85, 90));
        assert_eq!(metrics.symmetry_score(), 100);
        assert_eq!(metrics.risk_level(), RiskLevel::Low);
    }

    #[test]
    fn test_symmetry_truncates_mean_difference() {
        // diffs 1 and 0 average to 0 before doubling
        assert_eq!(injury((80, 80), (79, 80)).symmetry_score(), 100);
        // diffs 1 and 1
        assert_eq!(injury((80, 80), (79, 79)).symmetry_score(), 98);
        // diffs 3 and 0 average to 1
        assert_eq!(injury((80, 80), (77, 80)).symmetry_score(), 98);
    }

    #[test]
    fn test_symmetry_floors_at_zero() {
        let metrics = injury((100, 100), (0, 0));
        assert_eq!(metrics.symmetry_score(), 0);
        assert_eq!(metrics.risk_level(), RiskLevel::High);
    }

    #[test]
    fn test_risk_thresholds() {
        let t = RiskThresholds::default();
        assert_eq!(t.level(75), RiskLevel::Low);
        assert_eq!(t.level(74), RiskLevel::Moderate);
        assert_eq!(t.level(50), RiskLevel::Moderate);
        assert_eq!(t.level(49), RiskLevel::High);
    }

    #[test]
    fn test_leg_validation() {
        assert!(LegMetrics::new(101, 50).is_err());
        let bad = InjuryMetrics {
            left_leg: LegMetrics {
                mobility: 50,
                stability: 50,
            },
            right_leg: LegMetrics {
                mobility: 50,
                stability: 200,
            },
        };
        assert!(bad.validate().is_err());
    }
}
