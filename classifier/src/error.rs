use neural_network::NetworkError;
use thiserror::Error;

/// Errors that can occur while training or querying the classifier
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// `classify` was called before training finished successfully
    #[error("Classifier has not been trained")]
    NotTrained,
    /// Wrapper for errors from the underlying network
    #[error(transparent)]
    Network(#[from] NetworkError),
}
