use serde::{Deserialize, Serialize};
use std::fmt;

use crate::observation::SymptomObservation;

/// Input slots, in network input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Age,
    MotorSymptoms,
    CognitiveSymptoms,
    SpeechProblems,
    MemoryIssues,
    Tremor,
    Rigidity,
    BalanceProblems,
    Seizures,
    ConsciousnessLoss,
}

impl Feature {
    pub const ALL: [Feature; 10] = [
        Feature::Age,
        Feature::MotorSymptoms,
        Feature::CognitiveSymptoms,
        Feature::SpeechProblems,
        Feature::MemoryIssues,
        Feature::Tremor,
        Feature::Rigidity,
        Feature::BalanceProblems,
        Feature::Seizures,
        Feature::ConsciousnessLoss,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Feature::Age => "age",
            Feature::MotorSymptoms => "motor_symptoms",
            Feature::CognitiveSymptoms => "cognitive_symptoms",
            Feature::SpeechProblems => "speech_problems",
            Feature::MemoryIssues => "memory_issues",
            Feature::Tremor => "tremor",
            Feature::Rigidity => "rigidity",
            Feature::BalanceProblems => "balance_problems",
            Feature::Seizures => "seizures",
            Feature::ConsciousnessLoss => "consciousness_loss",
        }
    }

    /// Looks up a feature by its snake_case [`name`](Feature::name).
    pub fn from_name(name: &str) -> Option<Feature> {
        Feature::ALL.into_iter().find(|feature| feature.name() == name)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Encodes an observation into the 10-slot input vector.
///
/// Age is divided by 100 and clamped into `[0, 1]`; a missing, negative or
/// non-finite age encodes as `0`. Each symptom flag becomes `1.0` or `0.0`.
pub fn symptoms_to_features(observation: &SymptomObservation) -> Vec<f64> {
    Feature::ALL
        .iter()
        .map(|&feature| match feature {
            Feature::Age => observation
                .age
                .filter(|age| age.is_finite())
                .map_or(0.0, |age| (age / 100.0).clamp(0.0, 1.0)),
            flag => {
                if observation.flag(flag).unwrap_or(false) {
                    1.0
                } else {
                    0.0
                }
            }
        })
        .collect()
}
