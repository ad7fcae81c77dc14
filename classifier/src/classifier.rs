use neural_network::{
    EpochRecord, ModelDocument, Network, NetworkConfig, NetworkError, NetworkStats,
    TrainingStatus, now_timestamp, split_dataset,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::AtomicBool;
use tracing::info;

use crate::condition::{Condition, Confidence};
use crate::dataset::neurological_dataset;
use crate::error::ClassifierError;
use crate::feature::{Feature, symptoms_to_features};
use crate::observation::SymptomObservation;

pub const INPUT_NODES: usize = 10;
pub const HIDDEN_NODES: usize = 15;
pub const OUTPUT_NODES: usize = 5;

/// Hyperparameters used by [`NeurologicalClassifier::train`]; both are higher
/// than the engine defaults.
pub const LEARNING_RATE: f64 = 0.1;
pub const EPOCHS: usize = 2000;
/// Share of the dataset, taken from the front, used for training.
pub const TRAIN_FRACTION: f64 = 0.8;

/// Features whose encoded value exceeds this count as key factors.
const KEY_FACTOR_THRESHOLD: f64 = 0.5;

/// A single condition with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub condition: Condition,
    pub probability: f64,
    pub confidence: Confidence,
}

/// Ranked output of [`NeurologicalClassifier::classify`].
///
/// Each probability comes from an independent sigmoid unit, so the values
/// do not sum to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub top_prediction: Prediction,
    /// Every condition, highest probability first.
    pub all_predictions: Vec<Prediction>,
    pub timestamp: String,
}

/// Human-readable account of a classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanation {
    pub condition: Condition,
    pub probability: f64,
    pub key_factors: Vec<Feature>,
    pub reasoning: String,
}

/// The `10 -> 15 -> 5` network plus the encoding that maps symptom reports
/// onto it and its outputs back onto conditions.
///
/// Not safe for concurrent training and classification; wrap it in a lock
/// if several threads share one instance.
#[derive(Debug, Clone)]
pub struct NeurologicalClassifier {
    network: Network,
    is_trained: bool,
}

impl NeurologicalClassifier {
    /// Creates an untrained classifier seeded from the operating system.
    pub fn new() -> Result<Self, ClassifierError> {
        Self::with_config(&NetworkConfig::default())
    }

    /// Creates an untrained classifier whose initial weights and training
    /// shuffles are fully determined by `seed`.
    pub fn with_seed(seed: u64) -> Result<Self, ClassifierError> {
        let config = NetworkConfig {
            seed: Some(seed),
            ..NetworkConfig::default()
        };
        Self::with_config(&config)
    }

    pub fn with_config(config: &NetworkConfig) -> Result<Self, ClassifierError> {
        let network = Network::with_config(INPUT_NODES, HIDDEN_NODES, OUTPUT_NODES, config)?;
        Ok(Self {
            network,
            is_trained: false,
        })
    }

    pub fn is_trained(&self) -> bool {
        self.is_trained
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn stats(&self) -> NetworkStats {
        self.network.stats()
    }

    fn prepare_training(&mut self) -> Result<(), ClassifierError> {
        self.is_trained = false;
        self.network.set_learning_rate(LEARNING_RATE)?;
        self.network.set_epochs(EPOCHS)?;
        Ok(())
    }

    /// Trains on the built-in dataset, split 80/20 in dataset order, and
    /// returns the network's training history.
    pub fn train(&mut self) -> Result<&[EpochRecord], ClassifierError> {
        info!("Training neurological classifier");
        self.prepare_training()?;

        let data = neurological_dataset();
        let (training, validation) = split_dataset(&data, TRAIN_FRACTION);
        let history = self.network.train(training, Some(validation))?;

        self.is_trained = true;
        info!(epochs = history.len(), "Neurological classifier trained");
        Ok(history)
    }

    /// Same as [`train`](Self::train), but runs `epochs_per_chunk` epochs at a
    /// time, checks `cancel` between chunks and reports the latest record to
    /// `on_chunk`. A cancelled run leaves the classifier untrained.
    pub fn train_cancellable<F>(
        &mut self,
        epochs_per_chunk: usize,
        cancel: &AtomicBool,
        on_chunk: F,
    ) -> Result<TrainingStatus, ClassifierError>
    where
        F: FnMut(&EpochRecord),
    {
        self.prepare_training()?;

        let data = neurological_dataset();
        let (training, validation) = split_dataset(&data, TRAIN_FRACTION);
        let status = self
            .network
            .begin_training(training, Some(validation))?
            .run_cancellable(epochs_per_chunk, cancel, on_chunk)?;

        self.is_trained = matches!(status, TrainingStatus::Converged | TrainingStatus::Exhausted);
        Ok(status)
    }

    /// Trains only if no successful training has happened yet.
    pub fn ensure_trained(&mut self) -> Result<(), ClassifierError> {
        if !self.is_trained {
            self.train()?;
        }
        Ok(())
    }

    /// Encodes `observation` and ranks every condition.
    ///
    /// # Errors
    ///
    /// [`ClassifierError::NotTrained`] until training has completed.
    pub fn classify(&self, observation: &SymptomObservation) -> Result<Classification, ClassifierError> {
        self.classify_features(&symptoms_to_features(observation))
    }

    /// Ranks every condition for an already encoded 10-slot vector.
    pub fn classify_features(&self, features: &[f64]) -> Result<Classification, ClassifierError> {
        if !self.is_trained {
            return Err(ClassifierError::NotTrained);
        }

        let outputs = self.network.predict(features)?;
        let mut all_predictions: Vec<Prediction> = Condition::ALL
            .iter()
            .zip(outputs)
            .map(|(&condition, probability)| Prediction {
                condition,
                probability,
                confidence: Confidence::from_probability(probability),
            })
            .collect();
        all_predictions.sort_by(|a, b| b.probability.total_cmp(&a.probability));

        let top_prediction = all_predictions.first().cloned().ok_or(
            NetworkError::DimensionMismatch {
                context: "classifier outputs",
                expected: OUTPUT_NODES,
                actual: 0,
            },
        )?;

        Ok(Classification {
            top_prediction,
            all_predictions,
            timestamp: now_timestamp(),
        })
    }

    /// Names the encoded features above 0.5 and summarises the top
    /// prediction. Does not run the network again.
    pub fn explain(&self, observation: &SymptomObservation, classification: &Classification) -> Explanation {
        self.explain_features(&symptoms_to_features(observation), classification)
    }

    pub fn explain_features(&self, features: &[f64], classification: &Classification) -> Explanation {
        let key_factors: Vec<Feature> = Feature::ALL
            .iter()
            .zip(features)
            .filter(|&(_, &value)| value > KEY_FACTOR_THRESHOLD)
            .map(|(&feature, _)| feature)
            .collect();

        let top = &classification.top_prediction;
        let names: Vec<&str> = key_factors.iter().map(|f| f.name()).collect();
        let reasoning = format!(
            "Based on {} key factors: {}. Probability: {:.1}%",
            key_factors.len(),
            names.join(", "),
            top.probability * 100.0
        );

        Explanation {
            condition: top.condition,
            probability: top.probability,
            key_factors,
            reasoning,
        }
    }

    pub fn save_model(&self) -> ModelDocument {
        self.network.save_model()
    }

    /// Restores a previously trained `10-15-5` model and marks the
    /// classifier as trained.
    pub fn load_model(&mut self, document: ModelDocument) -> Result<(), ClassifierError> {
        self.network.load_model(document)?;
        self.is_trained = true;
        Ok(())
    }
}
