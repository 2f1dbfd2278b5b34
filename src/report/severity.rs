use serde::Deserialize;

use crate::error::TrackerError;

/// Ordinal spike severity. Ordering follows the declaration order, so
/// `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

/// Relative-increase thresholds for each severity level, e.g. 0.10 = +10%.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SpikeLevels {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl Default for SpikeLevels {
    fn default() -> Self {
        Self {
            low: 0.10,
            medium: 0.20,
            high: 0.30,
        }
    }
}

impl SpikeLevels {
    /// The classifier assumes `0 < low < medium < high`; anything else
    /// would classify inconsistently, so it is rejected up front.
    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.low > 0.0 && self.low < self.medium && self.medium < self.high {
            Ok(())
        } else {
            Err(TrackerError::MisconfiguredThresholds {
                low: self.low,
                medium: self.medium,
                high: self.high,
            })
        }
    }

    /// Classify a signed relative change. Only increases are classified;
    /// a change <= 0 is `None`. Thresholds are checked from highest to
    /// lowest, inclusive.
    pub fn classify(&self, relative_change: f64) -> Option<Severity> {
        if relative_change <= 0.0 {
            return None;
        }
        if relative_change >= self.high {
            Some(Severity::High)
        } else if relative_change >= self.medium {
            Some(Severity::Medium)
        } else if relative_change >= self.low {
            Some(Severity::Low)
        } else {
            None
        }
    }
}
