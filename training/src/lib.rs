mod error;
mod training;
mod training_config;
mod training_history;

pub use error::TrainingError;
pub use training::Trainer;
pub use training_config::TrainingConfig;
pub use training_history::TrainingSummary;

pub mod prelude {
    pub use crate::Trainer;
    pub use crate::TrainingConfig;
    pub use crate::TrainingError;
    pub use crate::TrainingSummary;
}
