use neural_network::{EpochRecord, TrainingStatus};
use std::fmt;
use std::time::Duration;

/// What a single [`Trainer::train`](crate::Trainer::train) call achieved.
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub status: TrainingStatus,
    /// Epochs run by this call
    pub epochs: usize,
    /// Record with the lowest training error
    pub best: Option<EpochRecord>,
    pub last: Option<EpochRecord>,
    /// First, last and two evenly spaced records in between
    pub progression: Vec<EpochRecord>,
    pub elapsed: Duration,
}

impl TrainingSummary {
    /// Summarises `records`, the history entries appended by one run.
    pub fn new(records: &[EpochRecord], status: TrainingStatus, elapsed: Duration) -> Self {
        let best = records
            .iter()
            .min_by(|a, b| a.training_error.total_cmp(&b.training_error))
            .cloned();

        let len = records.len();
        let progression = if len >= 4 {
            (0..=3).map(|i| records[i * (len - 1) / 3].clone()).collect()
        } else {
            records.to_vec()
        };

        Self {
            status,
            epochs: len,
            best,
            last: records.last().cloned(),
            progression,
            elapsed,
        }
    }

    pub fn completed(&self) -> bool {
        matches!(
            self.status,
            TrainingStatus::Converged | TrainingStatus::Exhausted
        )
    }
}

impl fmt::Display for TrainingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Training History Summary:")?;
        writeln!(f, "------------------------")?;
        writeln!(
            f,
            "Status: {:?} after {} epochs ({:.2?})",
            self.status, self.epochs, self.elapsed
        )?;

        let (Some(best), Some(last)) = (&self.best, &self.last) else {
            return Ok(());
        };
        writeln!(
            f,
            "Best training error: {:.6} (epoch {})",
            best.training_error, best.epoch
        )?;
        writeln!(f, "Final training error: {:.6}", last.training_error)?;
        writeln!(f, "Final validation error: {:.6}", last.validation_error)?;

        if self.progression.len() == 4 {
            writeln!(f, "\nError progression:")?;
            for record in &self.progression {
                writeln!(
                    f,
                    "Epoch {}: {:.6} (validation: {:.6})",
                    record.epoch, record.training_error, record.validation_error
                )?;
            }
        }
        Ok(())
    }
}
