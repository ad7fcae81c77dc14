use serde::{Deserialize, Serialize};

use crate::feature::Feature;

/// A structured symptom report: age in years plus nine yes/no findings.
///
/// Every field is optional when deserialising. Field names are snake_case;
/// the camelCase spellings (`motorSymptoms`, ...) are accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymptomObservation {
    pub age: Option<f64>,
    #[serde(alias = "motorSymptoms")]
    pub motor_symptoms: bool,
    #[serde(alias = "cognitiveSymptoms")]
    pub cognitive_symptoms: bool,
    #[serde(alias = "speechProblems")]
    pub speech_problems: bool,
    #[serde(alias = "memoryIssues")]
    pub memory_issues: bool,
    pub tremor: bool,
    pub rigidity: bool,
    #[serde(alias = "balanceProblems")]
    pub balance_problems: bool,
    pub seizures: bool,
    #[serde(alias = "consciousnessLoss")]
    pub consciousness_loss: bool,
}

impl SymptomObservation {
    pub fn with_age(mut self, age: f64) -> Self {
        self.age = Some(age);
        self
    }

    /// Marks `feature` as present. [`Feature::Age`] is not a flag and is
    /// ignored.
    pub fn with_symptom(mut self, feature: Feature) -> Self {
        if let Some(flag) = self.flag_mut(feature) {
            *flag = true;
        }
        self
    }

    /// The value of a symptom flag, or `None` for [`Feature::Age`].
    pub fn flag(&self, feature: Feature) -> Option<bool> {
        let value = match feature {
            Feature::Age => return None,
            Feature::MotorSymptoms => self.motor_symptoms,
            Feature::CognitiveSymptoms => self.cognitive_symptoms,
            Feature::SpeechProblems => self.speech_problems,
            Feature::MemoryIssues => self.memory_issues,
            Feature::Tremor => self.tremor,
            Feature::Rigidity => self.rigidity,
            Feature::BalanceProblems => self.balance_problems,
            Feature::Seizures => self.seizures,
            Feature::ConsciousnessLoss => self.consciousness_loss,
        };
        Some(value)
    }

    fn flag_mut(&mut self, feature: Feature) -> Option<&mut bool> {
        match feature {
            Feature::Age => None,
            Feature::MotorSymptoms => Some(&mut self.motor_symptoms),
            Feature::CognitiveSymptoms => Some(&mut self.cognitive_symptoms),
            Feature::SpeechProblems => Some(&mut self.speech_problems),
            Feature::MemoryIssues => Some(&mut self.memory_issues),
            Feature::Tremor => Some(&mut self.tremor),
            Feature::Rigidity => Some(&mut self.rigidity),
            Feature::BalanceProblems => Some(&mut self.balance_problems),
            Feature::Seizures => Some(&mut self.seizures),
            Feature::ConsciousnessLoss => Some(&mut self.consciousness_loss),
        }
    }
}
