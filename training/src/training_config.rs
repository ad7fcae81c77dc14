use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::TrainingError;

/// Settings for a [`Trainer`](crate::Trainer) run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Epochs run between progress updates and cancellation checks
    pub epochs_per_chunk: usize,
    /// Seed for weight initialisation and shuffling
    pub seed: Option<u64>,
    /// Stop after the first chunk that ends past this budget, in seconds
    #[serde(with = "seconds")]
    pub time_limit: Option<Duration>,
    /// Draw an indicatif progress bar on stderr
    pub show_progress: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs_per_chunk: 50,
            seed: None,
            time_limit: None,
            show_progress: true,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<(), TrainingError> {
        if self.epochs_per_chunk == 0 {
            return Err(TrainingError::Configuration(
                "epochs_per_chunk must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Loads a configuration from a JSON file. Missing fields take their
    /// default values.
    pub fn load(path: &Path) -> Result<Self, TrainingError> {
        let config_str = fs::read_to_string(path)?;
        let config: TrainingConfig = serde_json::from_str(&config_str)?;
        config.validate()?;
        Ok(config)
    }
}

/// `Option<Duration>` as fractional seconds.
mod seconds {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(duration) => serializer.serialize_some(&duration.as_secs_f64()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        let secs = Option::<f64>::deserialize(deserializer)?;
        secs.map(|secs| Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom))
            .transpose()
    }
}
