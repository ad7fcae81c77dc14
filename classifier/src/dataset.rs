//! Hand-authored training examples, three per condition.
//!
//! Rows are grouped by condition in output order. The values are kept
//! exactly as authored: changing them changes what the classifier learns.

use neural_network::Sample;

const STROKE: [f64; 5] = [1.0, 0.0, 0.0, 0.0, 0.0];
const PARKINSON: [f64; 5] = [0.0, 1.0, 0.0, 0.0, 0.0];
const ALZHEIMER: [f64; 5] = [0.0, 0.0, 1.0, 0.0, 0.0];
const EPILEPSIA: [f64; 5] = [0.0, 0.0, 0.0, 1.0, 0.0];
const NORMAL: [f64; 5] = [0.0, 0.0, 0.0, 0.0, 1.0];

#[rustfmt::skip]
const ROWS: [([f64; 10], [f64; 5]); 15] = [
    ([0.8, 1.0, 0.7, 1.0, 0.3, 0.0, 0.2, 0.8, 0.0, 0.0], STROKE),
    ([0.7, 0.9, 0.8, 0.9, 0.4, 0.1, 0.3, 0.7, 0.0, 0.0], STROKE),
    ([0.9, 1.0, 0.6, 1.0, 0.2, 0.0, 0.1, 0.9, 0.0, 0.0], STROKE),

    ([0.7, 0.8, 0.3, 0.4, 0.2, 1.0, 0.9, 0.6, 0.0, 0.0], PARKINSON),
    ([0.8, 0.9, 0.2, 0.3, 0.1, 0.9, 1.0, 0.7, 0.0, 0.0], PARKINSON),
    ([0.6, 0.7, 0.4, 0.5, 0.3, 0.8, 0.8, 0.5, 0.0, 0.0], PARKINSON),

    ([0.9, 0.3, 1.0, 0.6, 1.0, 0.1, 0.2, 0.4, 0.0, 0.0], ALZHEIMER),
    ([0.8, 0.2, 0.9, 0.5, 0.9, 0.0, 0.1, 0.3, 0.0, 0.0], ALZHEIMER),
    ([1.0, 0.4, 1.0, 0.7, 1.0, 0.2, 0.3, 0.5, 0.0, 0.0], ALZHEIMER),

    ([0.3, 0.6, 0.4, 0.2, 0.1, 0.3, 0.1, 0.2, 1.0, 1.0], EPILEPSIA),
    ([0.4, 0.7, 0.3, 0.1, 0.2, 0.2, 0.0, 0.3, 0.9, 0.9], EPILEPSIA),
    ([0.2, 0.5, 0.5, 0.3, 0.0, 0.1, 0.2, 0.1, 1.0, 1.0], EPILEPSIA),

    ([0.3, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], NORMAL),
    ([0.4, 0.1, 0.1, 0.0, 0.1, 0.0, 0.0, 0.1, 0.0, 0.0], NORMAL),
    ([0.2, 0.0, 0.0, 0.1, 0.0, 0.1, 0.0, 0.0, 0.0, 0.0], NORMAL),
];

/// The synthetic dataset, 15 samples in authored order.
pub fn neurological_dataset() -> Vec<Sample> {
    ROWS.iter()
        .map(|(inputs, targets)| Sample::new(inputs.to_vec(), targets.to_vec()))
        .collect()
}
