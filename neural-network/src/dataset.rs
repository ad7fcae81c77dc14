use serde::{Deserialize, Serialize};

/// A labelled example: an input vector and the output the network should
/// produce for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub inputs: Vec<f64>,
    pub targets: Vec<f64>,
}

impl Sample {
    pub fn new(inputs: Vec<f64>, targets: Vec<f64>) -> Self {
        Self { inputs, targets }
    }
}

/// Splits `data` in dataset order: the first `floor(len * train_fraction)`
/// samples train, the rest validate. No shuffling happens here.
pub fn split_dataset(data: &[Sample], train_fraction: f64) -> (&[Sample], &[Sample]) {
    let fraction = train_fraction.clamp(0.0, 1.0);
    let split_index = ((data.len() as f64) * fraction).floor() as usize;
    data.split_at(split_index.min(data.len()))
}
