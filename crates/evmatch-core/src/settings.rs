use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::keywords::ActionKeywords;

/// Display bands for match confidence. They classify results, never filter
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    good: f64,
    perfect: f64,
}

impl Thresholds {
    pub const DEFAULT_GOOD: f64 = 0.70;
    pub const DEFAULT_PERFECT: f64 = 0.90;

    /// Requires `0 <= good <= perfect <= 1`.
    pub fn new(good: f64, perfect: f64) -> Result<Self, Error> {
        let in_range = |v: f64| (0.0..=1.0).contains(&v);
        if !in_range(good) || !in_range(perfect) || good > perfect {
            return Err(Error::InvalidThresholds { good, perfect });
        }
        Ok(Self { good, perfect })
    }

    pub fn good(&self) -> f64 {
        self.good
    }

    pub fn perfect(&self) -> f64 {
        self.perfect
    }

    pub fn classify(&self, confidence: f64) -> ConfidenceClass {
        if confidence >= self.perfect {
            ConfidenceClass::Perfect
        } else if confidence >= self.good {
            ConfidenceClass::Good
        } else {
            ConfidenceClass::Low
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            good: Self::DEFAULT_GOOD,
            perfect: Self::DEFAULT_PERFECT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceClass {
    Perfect,
    Good,
    Low,
}

/// What tier 3 does when a candidate's action keyword is shared by several
/// unconsumed targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AmbiguityPolicy {
    /// Assign to the lexically first target.
    #[default]
    FirstLexical,
    /// Assign to every tied target. The file then appears in several groups.
    AssignAll,
    /// Leave the file unassigned and report the tied targets.
    Orphan,
}

#[derive(Debug, Clone, Default)]
pub struct MatchSettings {
    pub thresholds: Thresholds,
    pub keywords: ActionKeywords,
    pub ambiguity: AmbiguityPolicy,
}
