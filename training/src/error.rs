use classifier::ClassifierError;
use neural_network::NetworkError;
use thiserror::Error;

/// Errors raised while driving a training run or persisting its result
#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("Invalid training configuration: {0}")]
    Configuration(String),
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error("Failed to set up progress bar: {0}")]
    Progress(#[from] indicatif::style::TemplateError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
