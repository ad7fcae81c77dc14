use matrix::MatrixError;
use thiserror::Error;

use crate::network_config::NetworkConfigBuilderError;

/// Errors raised by the network engine.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Invalid sizes or hyperparameters.
    #[error("Invalid configuration: {0}")]
    Configuration(String),
    /// A vector or matrix did not have the length the network expects.
    #[error("Dimension mismatch for {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },
    /// An input, target or activation vector held NaN or an infinity.
    #[error("Non-finite value in {context} at index {index}")]
    NonFiniteValue { context: &'static str, index: usize },
    /// Training or validation was asked to run over zero samples.
    #[error("Dataset is empty")]
    EmptyDataset,
    /// The training error stopped being a finite number.
    #[error("Training diverged at epoch {epoch}: error is not finite")]
    NonFinite { epoch: usize },
    /// A model document could not be turned back into a network.
    #[error("Invalid model document: {0}")]
    InvalidModel(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<NetworkConfigBuilderError> for NetworkError {
    fn from(error: NetworkConfigBuilderError) -> Self {
        NetworkError::Configuration(error.to_string())
    }
}

impl From<MatrixError> for NetworkError {
    fn from(error: MatrixError) -> Self {
        NetworkError::InvalidModel(error.to_string())
    }
}

/// Fails with [`NetworkError::DimensionMismatch`] unless `actual == expected`.
pub(crate) fn check_len(context: &'static str, expected: usize, actual: usize) -> Result<(), NetworkError> {
    if expected == actual {
        Ok(())
    } else {
        Err(NetworkError::DimensionMismatch {
            context,
            expected,
            actual,
        })
    }
}

/// Fails with [`NetworkError::NonFiniteValue`] at the first NaN or infinity.
pub(crate) fn check_finite(context: &'static str, values: &[f64]) -> Result<(), NetworkError> {
    match values.iter().position(|value| !value.is_finite()) {
        Some(index) => Err(NetworkError::NonFiniteValue { context, index }),
        None => Ok(()),
    }
}
