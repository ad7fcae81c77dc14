//! Single-hidden-layer feed-forward network trained with per-sample SGD.
//!
//! The engine owns its weights, biases and random source. It is purely
//! synchronous and not designed for shared mutation: callers that need to
//! train and predict from several threads must serialise access themselves,
//! for example behind a `Mutex`, and treat an instance as unavailable for
//! inference while a [`TrainingSession`] borrows it.

// Modules
mod activations;
mod dataset;
mod error;
mod model;
mod network;
mod network_config;
mod session;
mod training_history;

pub use activations::{Activation, SIGMOID};
pub use dataset::{Sample, split_dataset};
pub use error::NetworkError;
pub use matrix::Matrix;
pub use model::ModelDocument;
pub use network::{ForwardPass, Network, NetworkStats};
pub use network_config::{NetworkConfig, NetworkConfigBuilder, NetworkConfigBuilderError};
pub use session::{TrainingSession, TrainingStatus};
pub use training_history::{EpochRecord, now_timestamp};

pub type Result<T, E = NetworkError> = std::result::Result<T, E>;
