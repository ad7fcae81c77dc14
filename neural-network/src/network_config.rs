use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::NetworkError;

/// Seed used by [`NetworkConfig::default`] inside this crate's unit tests.
#[cfg(test)]
pub(crate) const TEST_SEED: u64 = 42;

/// Hyperparameters for a [`Network`](crate::Network).
///
/// # Example
///
/// ```
/// use neural_network::NetworkConfigBuilder;
///
/// let config = NetworkConfigBuilder::default()
///     .learning_rate(0.1)
///     .epochs(2000_usize)
///     .seed(7)
///     .build()
///     .unwrap();
/// assert_eq!(config.error_threshold, 0.001);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(default, build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct NetworkConfig {
    /// Step size applied uniformly to every weight and bias update.
    pub learning_rate: f64,

    /// Upper bound on the number of epochs of a single training run.
    pub epochs: usize,

    /// Training stops early once the mean training error of an epoch drops
    /// below this value.
    pub error_threshold: f64,

    /// Seed for weight initialisation and shuffling. `None` draws one from
    /// the operating system, which makes runs non-reproducible.
    #[builder(setter(strip_option))]
    pub seed: Option<u64>,

    /// Emit a progress log line every `log_interval` epochs. Zero disables it.
    pub log_interval: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            epochs: 1000,
            error_threshold: 0.001,
            #[cfg(test)]
            seed: Some(TEST_SEED),
            #[cfg(not(test))]
            seed: None,
            log_interval: 100,
        }
    }
}

impl NetworkConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(rate) = self.learning_rate {
            check_learning_rate(rate)?;
        }
        if self.epochs == Some(0) {
            return Err("epochs must be at least 1".to_string());
        }
        if let Some(threshold) = self.error_threshold {
            check_threshold(threshold)?;
        }
        Ok(())
    }
}

impl NetworkConfig {
    /// Checks a config that was not produced by the builder, e.g. one read
    /// from disk.
    pub fn validate(&self) -> Result<(), NetworkError> {
        check_learning_rate(self.learning_rate).map_err(NetworkError::Configuration)?;
        check_threshold(self.error_threshold).map_err(NetworkError::Configuration)?;
        if self.epochs == 0 {
            return Err(NetworkError::Configuration(
                "epochs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Loads and validates a configuration from a JSON file. Missing fields
    /// take their default values.
    ///
    /// ```no_run
    /// use neural_network::NetworkConfig;
    /// use std::path::Path;
    ///
    /// let config = NetworkConfig::load(Path::new("network.json")).unwrap();
    /// ```
    pub fn load(path: &Path) -> Result<Self, NetworkError> {
        let config_str = fs::read_to_string(path)?;
        let config: NetworkConfig = serde_json::from_str(&config_str)?;
        config.validate()?;
        Ok(config)
    }
}

pub(crate) fn check_learning_rate(rate: f64) -> Result<(), String> {
    if rate.is_finite() && rate > 0.0 {
        Ok(())
    } else {
        Err(format!("learning rate must be positive and finite, got {rate}"))
    }
}

fn check_threshold(threshold: f64) -> Result<(), String> {
    if threshold.is_finite() && threshold >= 0.0 {
        Ok(())
    } else {
        Err(format!(
            "error threshold must be non-negative and finite, got {threshold}"
        ))
    }
}
