//! Host-side driver for training the neurological classifier.
//!
//! Runs the classifier's chunked training with an indicatif progress bar,
//! a shared cancellation flag and an optional wall-clock budget, then
//! summarises the run and persists the model document.

use classifier::{NeurologicalClassifier, classifier::EPOCHS};
use indicatif::{ProgressBar, ProgressStyle};
use neural_network::{ModelDocument, TrainingStatus};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{info, warn};

use crate::error::TrainingError;
use crate::training_config::TrainingConfig;
use crate::training_history::TrainingSummary;

/// Owns a classifier and trains it according to a [`TrainingConfig`].
pub struct Trainer {
    classifier: NeurologicalClassifier,
    config: TrainingConfig,
    cancel: Arc<AtomicBool>,
}

impl Trainer {
    /// Creates a trainer around a fresh, untrained classifier.
    pub fn new(config: TrainingConfig) -> Result<Self, TrainingError> {
        config.validate()?;
        let classifier = match config.seed {
            Some(seed) => NeurologicalClassifier::with_seed(seed)?,
            None => NeurologicalClassifier::new()?,
        };
        Ok(Self::from_classifier(classifier, config))
    }

    pub fn from_classifier(classifier: NeurologicalClassifier, config: TrainingConfig) -> Self {
        Self {
            classifier,
            config,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn classifier(&self) -> &NeurologicalClassifier {
        &self.classifier
    }

    pub fn into_classifier(self) -> NeurologicalClassifier {
        self.classifier
    }

    /// Flag that stops the next run at its next chunk boundary when set,
    /// e.g. from a Ctrl-C handler on another thread. It stays set until the
    /// caller clears it.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Trains the classifier on its built-in dataset.
    ///
    /// A cancelled or timed-out run is not an error: the summary reports
    /// [`TrainingStatus::Cancelled`] and the classifier stays untrained.
    pub fn train(&mut self) -> Result<TrainingSummary, TrainingError> {
        self.config.validate()?;

        let progress = self.create_progress_bar()?;
        let cancel = Arc::clone(&self.cancel);
        let time_limit = self.config.time_limit;
        let started = Instant::now();
        let first_record = self.classifier.network().training_history().len();
        let mut timed_out = false;

        info!(
            epochs_per_chunk = self.config.epochs_per_chunk,
            seed = ?self.config.seed,
            "Starting classifier training"
        );

        let status = self.classifier.train_cancellable(
            self.config.epochs_per_chunk,
            &cancel,
            |record| {
                progress.set_position(record.epoch as u64 + 1);
                progress.set_message(format!(
                    "- Error: {:.6}, Validation: {:.6}",
                    record.training_error, record.validation_error
                ));
                if time_limit.is_some_and(|limit| started.elapsed() >= limit) {
                    timed_out |= raise_cancel(&cancel);
                }
            },
        );

        if timed_out {
            // Only the flag raised here is lowered; an outside cancel stays set.
            cancel.store(false, Ordering::Relaxed);
            warn!("Training stopped by time limit");
        }

        let status = match status {
            Ok(status) => status,
            Err(error) => {
                progress.abandon_with_message("Training failed");
                return Err(error.into());
            }
        };

        match status {
            TrainingStatus::Cancelled => progress.abandon_with_message("Training cancelled"),
            _ => progress.finish_with_message("Training completed!"),
        }

        let records = &self.classifier.network().training_history()[first_record..];
        Ok(TrainingSummary::new(records, status, started.elapsed()))
    }

    fn create_progress_bar(&self) -> Result<ProgressBar, TrainingError> {
        if !self.config.show_progress {
            return Ok(ProgressBar::hidden());
        }
        let progress = ProgressBar::new(EPOCHS as u64);
        progress.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} Epoch {msg}",
            )?
            .progress_chars("##-"),
        );
        Ok(progress)
    }

    /// Writes the classifier's model document to `path` as JSON.
    pub fn save_model<P: AsRef<Path>>(&self, path: P) -> Result<(), TrainingError> {
        let json = self.classifier.save_model().to_json()?;
        fs::write(path.as_ref(), json)?;
        info!(path = %path.as_ref().display(), "Model saved");
        Ok(())
    }

    /// Restores a trained classifier from a model document on disk.
    pub fn load_model<P: AsRef<Path>>(path: P, config: TrainingConfig) -> Result<Self, TrainingError> {
        let json = fs::read_to_string(path)?;
        let document = ModelDocument::from_json(&json)?;
        let mut trainer = Self::new(config)?;
        trainer.classifier.load_model(document)?;
        Ok(trainer)
    }
}

/// Sets `cancel` and reports whether this call was the one that raised it.
fn raise_cancel(cancel: &AtomicBool) -> bool {
    !cancel.swap(true, Ordering::Relaxed)
}
