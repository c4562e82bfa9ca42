use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pipeline::extractors::RiskLevel;

/// Counter bucket a pattern contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityTier {
    Critical,
    High,
    Medium,
    Low,
}

/// Raw counters behind a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeverityScore {
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

impl SeverityScore {
    pub fn add(&mut self, tier: SeverityTier, amount: u32) {
        let slot = match tier {
            SeverityTier::Critical => &mut self.critical,
            SeverityTier::High => &mut self.high,
            SeverityTier::Medium => &mut self.medium,
            SeverityTier::Low => &mut self.low,
        };
        *slot = slot.saturating_add(amount);
    }

    pub fn is_zero(&self) -> bool {
        self.critical == 0 && self.high == 0 && self.medium == 0 && self.low == 0
    }

    /// Tier with the highest count; ties resolve Critical > High > Medium >
    /// Low. All zero is `NotApplicable`.
    pub fn verdict(&self) -> Verdict {
        if self.is_zero() {
            return Verdict::NotApplicable;
        }
        let max = self.critical.max(self.high).max(self.medium).max(self.low);
        if self.critical == max {
            Verdict::Critical
        } else if self.high == max {
            Verdict::High
        } else if self.medium == max {
            Verdict::Medium
        } else {
            Verdict::Low
        }
    }
}

/// Overall severity of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Critical,
    High,
    Medium,
    Low,
    /// Not enough signal to classify.
    NotApplicable,
}

impl Verdict {
    pub fn as_risk_level(&self) -> Option<RiskLevel> {
        match self {
            Self::Critical => Some(RiskLevel::Critical),
            Self::High => Some(RiskLevel::High),
            Self::Medium => Some(RiskLevel::Medium),
            Self::Low => Some(RiskLevel::Low),
            Self::NotApplicable => None,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Critical => write!(f, "Critical"),
            Self::High => write!(f, "High"),
            Self::Medium => write!(f, "Medium"),
            Self::Low => write!(f, "Low"),
            Self::NotApplicable => write!(f, "N/A"),
        }
    }
}
