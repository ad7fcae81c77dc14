//! Epoch-at-a-time training.
//!
//! A [`TrainingSession`] performs exactly the computation of
//! [`Network::train`], but returns to the caller between epochs so a host can
//! report progress, yield to a scheduler or stop early.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::dataset::Sample;
use crate::error::NetworkError;
use crate::network::Network;
use crate::training_history::EpochRecord;
use crate::Result;

/// Where a training session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingStatus {
    /// More epochs remain.
    InProgress,
    /// The mean training error fell below the error threshold.
    Converged,
    /// The epoch budget was used up.
    Exhausted,
    /// A cancellation flag was observed between chunks.
    Cancelled,
}

impl TrainingStatus {
    pub fn is_finished(self) -> bool {
        self != TrainingStatus::InProgress
    }
}

/// An in-progress training run that mutably borrows its [`Network`].
///
/// Dropping a session part way through leaves the network with the weights
/// and history of the epochs that did complete.
#[derive(Debug)]
pub struct TrainingSession<'a> {
    network: &'a mut Network,
    training_data: &'a [Sample],
    validation_data: Option<&'a [Sample]>,
    epoch: usize,
    status: TrainingStatus,
    aborted: bool,
    started: Instant,
}

impl Network {
    /// Validates the datasets and opens a session. No weights change until
    /// the first epoch is run.
    ///
    /// # Errors
    ///
    /// [`NetworkError::EmptyDataset`] if `training_data` is empty or an empty
    /// validation set is supplied, [`NetworkError::DimensionMismatch`] if any
    /// sample has the wrong shape.
    pub fn begin_training<'a>(
        &'a mut self,
        training_data: &'a [Sample],
        validation_data: Option<&'a [Sample]>,
    ) -> Result<TrainingSession<'a>> {
        if training_data.is_empty() {
            return Err(NetworkError::EmptyDataset);
        }
        self.check_samples(training_data)?;
        if let Some(validation) = validation_data {
            if validation.is_empty() {
                return Err(NetworkError::EmptyDataset);
            }
            self.check_samples(validation)?;
        }

        info!(
            samples = training_data.len(),
            validation_samples = validation_data.map_or(0, <[Sample]>::len),
            max_epochs = self.epochs,
            learning_rate = self.learning_rate,
            "Starting training"
        );

        Ok(TrainingSession {
            network: self,
            training_data,
            validation_data,
            epoch: 0,
            status: TrainingStatus::InProgress,
            aborted: false,
            started: Instant::now(),
        })
    }
}

impl TrainingSession<'_> {
    pub fn status(&self) -> TrainingStatus {
        self.status
    }

    pub fn epochs_completed(&self) -> usize {
        self.epoch
    }

    /// Read access to the network being trained, e.g. for a progress report.
    pub fn network(&self) -> &Network {
        &*self.network
    }

    /// Runs one epoch and returns its history record, or `None` once the
    /// session has finished.
    ///
    /// An error aborts the session; later calls return `Ok(None)`.
    pub fn next_epoch(&mut self) -> Result<Option<EpochRecord>> {
        if self.aborted || self.status.is_finished() {
            return Ok(None);
        }

        match self.run_epoch() {
            Ok(record) => Ok(Some(record)),
            Err(error) => {
                self.aborted = true;
                warn!(epoch = self.epoch, %error, "Training aborted");
                Err(error)
            }
        }
    }

    fn run_epoch(&mut self) -> Result<EpochRecord> {
        let epoch = self.epoch;

        let training_error = self.network.run_epoch(self.training_data)?;
        let validation_error = match self.validation_data {
            Some(validation) => self.network.validate(validation)?,
            None => 0.0,
        };
        if !training_error.is_finite() || !validation_error.is_finite() {
            return Err(NetworkError::NonFinite { epoch });
        }

        let record = EpochRecord::new(epoch, training_error, validation_error);
        self.network.training_history.push(record.clone());
        self.epoch += 1;

        let interval = self.network.log_interval;
        if interval > 0 && epoch % interval == 0 {
            debug!(
                "Epoch {}: training error = {:.6}, validation error = {:.6}",
                epoch, training_error, validation_error
            );
        }

        if training_error < self.network.error_threshold {
            self.status = TrainingStatus::Converged;
            info!("Converged at epoch {}", epoch);
        } else if self.epoch >= self.network.epochs {
            self.status = TrainingStatus::Exhausted;
        }

        if self.status.is_finished() {
            info!(
                epochs = self.epoch,
                elapsed_ms = self.started.elapsed().as_millis() as u64,
                "Training completed"
            );
        }

        Ok(record)
    }

    /// Runs at most `max_epochs` epochs.
    pub fn run_chunk(&mut self, max_epochs: usize) -> Result<TrainingStatus> {
        if max_epochs == 0 {
            return Err(NetworkError::Configuration(
                "chunk size must be at least 1 epoch".to_string(),
            ));
        }

        for _ in 0..max_epochs {
            if self.next_epoch()?.is_none() {
                break;
            }
        }
        Ok(self.status)
    }

    /// Runs chunks of `epochs_per_chunk` epochs until the session finishes,
    /// checking `cancel` before each chunk and handing the latest record to
    /// `on_chunk` after each one.
    pub fn run_cancellable<F>(
        &mut self,
        epochs_per_chunk: usize,
        cancel: &AtomicBool,
        mut on_chunk: F,
    ) -> Result<TrainingStatus>
    where
        F: FnMut(&EpochRecord),
    {
        loop {
            if self.aborted || self.status.is_finished() {
                return Ok(self.status);
            }
            if cancel.load(Ordering::Relaxed) {
                warn!(epochs = self.epoch, "Training cancelled");
                self.status = TrainingStatus::Cancelled;
                return Ok(self.status);
            }

            self.run_chunk(epochs_per_chunk)?;
            if let Some(record) = self.network.training_history.last() {
                on_chunk(record);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network_config::NetworkConfigBuilder;

    fn or_data() -> Vec<Sample> {
        vec![
            Sample::new(vec![0.0, 0.0], vec![0.0]),
            Sample::new(vec![0.0, 1.0], vec![1.0]),
            Sample::new(vec![1.0, 0.0], vec![1.0]),
            Sample::new(vec![1.0, 1.0], vec![1.0]),
        ]
    }

    fn seeded_network(epochs: usize) -> Network {
        let config = NetworkConfigBuilder::default()
            .learning_rate(0.5)
            .epochs(epochs)
            .seed(17)
            .build()
            .unwrap();
        Network::with_config(2, 3, 1, &config).unwrap()
    }

    #[test]
    fn test_chunked_matches_blocking_training() {
        let data = or_data();

        let mut blocking = seeded_network(120);
        blocking.train(&data, None).unwrap();

        let mut chunked = seeded_network(120);
        {
            let mut session = chunked.begin_training(&data, None).unwrap();
            while !session.run_chunk(7).unwrap().is_finished() {}
        }

        assert_eq!(chunked.weights_input_hidden, blocking.weights_input_hidden);
        assert_eq!(chunked.weights_hidden_output, blocking.weights_hidden_output);
        assert_eq!(chunked.bias_hidden, blocking.bias_hidden);
        assert_eq!(chunked.bias_output, blocking.bias_output);
        assert_eq!(chunked.training_history.len(), blocking.training_history.len());
    }

    #[test]
    fn test_next_epoch_yields_one_record_at_a_time() {
        let data = or_data();
        let mut network = seeded_network(3);
        let mut session = network.begin_training(&data, None).unwrap();

        let first = session.next_epoch().unwrap().unwrap();
        assert_eq!(first.epoch, 0);
        assert_eq!(session.epochs_completed(), 1);
        assert_eq!(session.status(), TrainingStatus::InProgress);

        session.next_epoch().unwrap();
        session.next_epoch().unwrap();
        assert_eq!(session.status(), TrainingStatus::Exhausted);
        assert!(session.next_epoch().unwrap().is_none());
    }

    #[test]
    fn test_cancel_before_first_chunk() {
        let data = or_data();
        let mut network = seeded_network(100);
        let cancel = AtomicBool::new(true);

        let mut session = network.begin_training(&data, None).unwrap();
        let status = session.run_cancellable(10, &cancel, |_| {}).unwrap();

        assert_eq!(status, TrainingStatus::Cancelled);
        assert_eq!(session.epochs_completed(), 0);
        assert!(session.next_epoch().unwrap().is_none());
    }

    #[test]
    fn test_cancel_between_chunks() {
        let data = or_data();
        let mut network = seeded_network(1000);
        let cancel = AtomicBool::new(false);
        let mut chunks = 0;

        let status = {
            let mut session = network.begin_training(&data, None).unwrap();
            session
                .run_cancellable(5, &cancel, |record| {
                    chunks += 1;
                    assert_eq!(record.epoch + 1, chunks * 5);
                    if chunks == 2 {
                        cancel.store(true, Ordering::Relaxed);
                    }
                })
                .unwrap()
        };

        assert_eq!(status, TrainingStatus::Cancelled);
        assert_eq!(chunks, 2);
        assert_eq!(network.training_history().len(), 10);
    }

    #[test]
    fn test_zero_chunk_is_configuration_error() {
        let data = or_data();
        let mut network = seeded_network(10);
        let mut session = network.begin_training(&data, None).unwrap();

        assert!(matches!(
            session.run_chunk(0),
            Err(NetworkError::Configuration(_))
        ));
    }

    #[test]
    fn test_empty_validation_set_rejected() {
        let data = or_data();
        let mut network = seeded_network(10);

        let result = network.begin_training(&data, Some(&[]));
        assert!(matches!(result, Err(NetworkError::EmptyDataset)));
    }

    #[test]
    fn test_early_stopping_on_threshold() {
        let data = vec![Sample::new(vec![1.0, 0.0], vec![0.5])];
        let config = NetworkConfigBuilder::default()
            .learning_rate(0.5)
            .epochs(10_000_usize)
            .error_threshold(0.01)
            .seed(3)
            .build()
            .unwrap();
        let mut network = Network::with_config(2, 2, 1, &config).unwrap();

        let history = network.train(&data, None).unwrap();

        let last = history.last().unwrap();
        assert!(last.training_error < 0.01);
        assert!(history.len() < 10_000);
        assert!(history[..history.len() - 1].iter().all(|r| r.training_error >= 0.01));
    }
}
