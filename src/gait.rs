//! Gait cycle phases and left/right symmetry
//!
//! Each leg's stride is split into four phases expressed as a percentage of
//! the cycle. The phases should add up to roughly 100; [`LegCycle::is_valid`]
//! reports whether they do but nothing rejects a cycle that doesn't.

use serde::{Deserialize, Serialize};

/// Allowed drift of a leg's phase total from 100
pub const PHASE_SUM_TOLERANCE: f64 = 2.0;

/// Phase percentages for one leg
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegCycle {
    pub landing: f64,
    pub stabilizing: f64,
    pub launching: f64,
    pub flying: f64,
}

impl LegCycle {
    pub fn new(landing: f64, stabilizing: f64, launching: f64, flying: f64) -> Self {
        Self {
            landing,
            stabilizing,
            launching,
            flying,
        }
    }

    pub fn phases(&self) -> [f64; 4] {
        [self.landing, self.stabilizing, self.launching, self.flying]
    }

    pub fn total(&self) -> f64 {
        self.phases().iter().sum()
    }

    /// True when the phases add up to 100 within tolerance
    pub fn is_valid(&self) -> bool {
        (self.total() - 100.0).abs() <= PHASE_SUM_TOLERANCE
    }

    /// Share of the cycle spent on the ground
    pub fn ground_contact(&self) -> f64 {
        self.landing + self.stabilizing + self.launching
    }
}

/// Left/right symmetry of two leg cycles, 0-100
///
/// `100 - 2 * sum(|left - right|)` over the four phases, floored at 0.
pub fn symmetry(left: &LegCycle, right: &LegCycle) -> u8 {
    let total_diff: f64 = left
        .phases()
        .iter()
        .zip(right.phases().iter())
        .map(|(l, r)| (l - r).abs())
        .sum();

    let score = 100.0 - total_diff * 2.0;
    if !score.is_finite() || score <= 0.0 {
        0
    } else {
        score.min(100.0) as u8
    }
}

/// Gait cycle summary for a run or snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaitCycleMetrics {
    pub left: LegCycle,
    pub right: LegCycle,

    /// Steps per minute
    pub cadence: u16,

    /// Average ground contact time in milliseconds
    pub contact_time_ms: f64,

    /// Average flight time in milliseconds
    pub flight_time_ms: f64,
}

impl GaitCycleMetrics {
    pub fn symmetry_score(&self) -> u8 {
        symmetry(&self.left, &self.right)
    }

    /// Both legs' phases add up to 100 within tolerance
    pub fn is_valid(&self) -> bool {
        self.left.is_valid() && self.right.is_valid()
    }

    /// Ratio of contact to total step time, 0.0 when no timings were recorded
    pub fn duty_factor(&self) -> f64 {
        let step = self.contact_time_ms + self.flight_time_ms;
        if step <= 0.0 {
            return 0.0;
        }
        self.contact_time_ms / step
    }
}
