use serde::{Deserialize, Serialize};
use std::fmt;

/// Output classes, in network output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Stroke,
    Parkinson,
    Alzheimer,
    Epilepsia,
    Normal,
}

impl Condition {
    pub const ALL: [Condition; 5] = [
        Condition::Stroke,
        Condition::Parkinson,
        Condition::Alzheimer,
        Condition::Epilepsia,
        Condition::Normal,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Condition::Stroke => "stroke",
            Condition::Parkinson => "parkinson",
            Condition::Alzheimer => "alzheimer",
            Condition::Epilepsia => "epilepsia",
            Condition::Normal => "normal",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse band for a raw probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// `high` above 0.7, `medium` above 0.4, `low` otherwise.
    pub fn from_probability(probability: f64) -> Self {
        if probability > 0.7 {
            Confidence::High
        } else if probability > 0.4 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        })
    }
}
