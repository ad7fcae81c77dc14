use matrix::Matrix;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::activations::SIGMOID;
use crate::dataset::Sample;
use crate::error::{NetworkError, check_finite, check_len};
use crate::network_config::{NetworkConfig, check_learning_rate};
use crate::training_history::EpochRecord;
use crate::Result;

/// Activations produced by one forward pass.
///
/// Backpropagation needs the hidden activations of the very same pass, so
/// they are returned rather than recomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardPass {
    pub hidden_outputs: Vec<f64>,
    pub outputs: Vec<f64>,
}

/// Summary of a network's shape and training state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStats {
    /// `input-hidden-output`, e.g. `10-15-5`.
    pub architecture: String,
    pub total_parameters: usize,
    pub training_epochs: usize,
    pub last_training_error: Option<f64>,
    pub last_validation_error: Option<f64>,
    pub learning_rate: f64,
}

/// A fully connected `input -> hidden -> output` perceptron with sigmoid
/// activations on both layers, trained by per-sample gradient descent.
///
/// Layer sizes are fixed at construction. Weights change only inside
/// [`backward`](Network::backward) (and therefore training) or when a model
/// document is loaded.
///
/// # Examples
///
/// ```
/// use neural_network::{Network, NetworkConfigBuilder, Sample};
///
/// let config = NetworkConfigBuilder::default()
///     .learning_rate(0.5)
///     .epochs(5000_usize)
///     .seed(1)
///     .build()
///     .unwrap();
/// let mut network = Network::with_config(2, 2, 1, &config).unwrap();
///
/// let data = vec![
///     Sample::new(vec![0.0, 0.0], vec![0.0]),
///     Sample::new(vec![1.0, 1.0], vec![1.0]),
/// ];
/// network.train(&data, None).unwrap();
/// let output = network.predict(&[1.0, 1.0]).unwrap();
/// assert_eq!(output.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Network {
    pub(crate) input_size: usize,
    pub(crate) hidden_size: usize,
    pub(crate) output_size: usize,
    /// `input_size x hidden_size`
    pub(crate) weights_input_hidden: Matrix,
    /// `hidden_size x output_size`
    pub(crate) weights_hidden_output: Matrix,
    pub(crate) bias_hidden: Vec<f64>,
    pub(crate) bias_output: Vec<f64>,
    pub(crate) learning_rate: f64,
    pub(crate) epochs: usize,
    pub(crate) error_threshold: f64,
    pub(crate) log_interval: usize,
    pub(crate) training_history: Vec<EpochRecord>,
    pub(crate) rng: StdRng,
}

impl Network {
    /// Creates a network with the default [`NetworkConfig`].
    pub fn new(input_size: usize, hidden_size: usize, output_size: usize) -> Result<Self> {
        Self::with_config(input_size, hidden_size, output_size, &NetworkConfig::default())
    }

    /// Creates a network whose random source is seeded from `config.seed`,
    /// or from the operating system when no seed is given.
    pub fn with_config(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        config: &NetworkConfig,
    ) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::from_rng(input_size, hidden_size, output_size, config, rng)
    }

    /// Creates a network driven by an explicit random source. The same
    /// source is later used to shuffle samples during training.
    pub fn from_rng(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        config: &NetworkConfig,
        mut rng: StdRng,
    ) -> Result<Self> {
        for (name, size) in [
            ("input", input_size),
            ("hidden", hidden_size),
            ("output", output_size),
        ] {
            if size == 0 {
                return Err(NetworkError::Configuration(format!(
                    "{name} size must be a positive integer, got 0"
                )));
            }
        }
        config.validate()?;

        let weights_input_hidden = Matrix::xavier(input_size, hidden_size, &mut rng);
        let weights_hidden_output = Matrix::xavier(hidden_size, output_size, &mut rng);
        let bias_hidden = random_biases(hidden_size, &mut rng);
        let bias_output = random_biases(output_size, &mut rng);

        info!(
            "Network created: {} -> {} -> {}",
            input_size, hidden_size, output_size
        );

        Ok(Network {
            input_size,
            hidden_size,
            output_size,
            weights_input_hidden,
            weights_hidden_output,
            bias_hidden,
            bias_output,
            learning_rate: config.learning_rate,
            epochs: config.epochs,
            error_threshold: config.error_threshold,
            log_interval: config.log_interval,
            training_history: Vec::new(),
            rng,
        })
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn set_learning_rate(&mut self, learning_rate: f64) -> Result<()> {
        check_learning_rate(learning_rate).map_err(NetworkError::Configuration)?;
        self.learning_rate = learning_rate;
        Ok(())
    }

    pub fn epochs(&self) -> usize {
        self.epochs
    }

    pub fn set_epochs(&mut self, epochs: usize) -> Result<()> {
        if epochs == 0 {
            return Err(NetworkError::Configuration(
                "epochs must be at least 1".to_string(),
            ));
        }
        self.epochs = epochs;
        Ok(())
    }

    pub fn error_threshold(&self) -> f64 {
        self.error_threshold
    }

    pub fn training_history(&self) -> &[EpochRecord] {
        &self.training_history
    }

    pub fn weights_input_hidden(&self) -> &Matrix {
        &self.weights_input_hidden
    }

    pub fn weights_hidden_output(&self) -> &Matrix {
        &self.weights_hidden_output
    }

    pub fn bias_hidden(&self) -> &[f64] {
        &self.bias_hidden
    }

    pub fn bias_output(&self) -> &[f64] {
        &self.bias_output
    }

    /// Runs the inputs through both layers without touching any state.
    ///
    /// Activations lie in the open interval `(0, 1)` for inputs in `[0, 1]`.
    /// Inputs of very large magnitude saturate the sigmoid, which then
    /// rounds to exactly `0.0` or `1.0`.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::DimensionMismatch`] if `inputs.len()` differs
    /// from the input size, [`NetworkError::NonFiniteValue`] if an input is
    /// NaN or infinite.
    pub fn forward(&self, inputs: &[f64]) -> Result<ForwardPass> {
        check_len("forward inputs", self.input_size, inputs.len())?;
        check_finite("forward inputs", inputs)?;

        let hidden_outputs = Matrix::row_vector(inputs)
            .dot_multiply(&self.weights_input_hidden)
            .add(&Matrix::row_vector(&self.bias_hidden))
            .map(SIGMOID.function)
            .into_data();

        let outputs = Matrix::row_vector(&hidden_outputs)
            .dot_multiply(&self.weights_hidden_output)
            .add(&Matrix::row_vector(&self.bias_output))
            .map(SIGMOID.function)
            .into_data();

        Ok(ForwardPass {
            hidden_outputs,
            outputs,
        })
    }

    /// Backpropagates one sample and immediately applies the update.
    ///
    /// The error is `target - output`, so weights move by `+learning_rate *
    /// activation * delta`. Returns the raw per-output errors.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::DimensionMismatch`] if any vector does not
    /// match the layer it belongs to and [`NetworkError::NonFiniteValue`] if
    /// any holds NaN or an infinity. Nothing is modified in either case.
    pub fn backward(
        &mut self,
        inputs: &[f64],
        targets: &[f64],
        pass: &ForwardPass,
    ) -> Result<Vec<f64>> {
        check_len("backward inputs", self.input_size, inputs.len())?;
        check_len("backward targets", self.output_size, targets.len())?;
        check_len(
            "backward hidden outputs",
            self.hidden_size,
            pass.hidden_outputs.len(),
        )?;
        check_len("backward outputs", self.output_size, pass.outputs.len())?;
        check_finite("backward inputs", inputs)?;
        check_finite("backward targets", targets)?;
        check_finite("backward hidden outputs", &pass.hidden_outputs)?;
        check_finite("backward outputs", &pass.outputs)?;

        let outputs = Matrix::from(pass.outputs.clone());
        let hidden = Matrix::from(pass.hidden_outputs.clone());

        let errors = Matrix::from(targets.to_vec()).subtract(&outputs);
        let output_deltas = errors.elementwise_multiply(&outputs.map(SIGMOID.derivative));

        // (hidden x output) . (output x 1), using the weights before this update
        let hidden_errors = self.weights_hidden_output.dot_multiply(&output_deltas);
        let hidden_deltas = hidden_errors.elementwise_multiply(&hidden.map(SIGMOID.derivative));

        self.update_weights(
            inputs,
            &pass.hidden_outputs,
            hidden_deltas.data(),
            output_deltas.data(),
        );

        Ok(errors.into_data())
    }

    fn update_weights(
        &mut self,
        inputs: &[f64],
        hidden_outputs: &[f64],
        hidden_deltas: &[f64],
        output_deltas: &[f64],
    ) {
        let rate = self.learning_rate;

        self.weights_input_hidden
            .add_scaled_outer(rate, inputs, hidden_deltas);
        self.weights_hidden_output
            .add_scaled_outer(rate, hidden_outputs, output_deltas);

        for (bias, delta) in self.bias_hidden.iter_mut().zip(hidden_deltas) {
            *bias += rate * delta;
        }
        for (bias, delta) in self.bias_output.iter_mut().zip(output_deltas) {
            *bias += rate * delta;
        }
    }

    /// Mean over `data` of the per-sample sum of squared errors. Read-only.
    pub fn validate(&self, data: &[Sample]) -> Result<f64> {
        if data.is_empty() {
            return Err(NetworkError::EmptyDataset);
        }

        let mut total_error = 0.0;
        for sample in data {
            check_len("validation targets", self.output_size, sample.targets.len())?;
            let pass = self.forward(&sample.inputs)?;
            total_error += squared_error(&sample.targets, &pass.outputs);
        }

        Ok(total_error / data.len() as f64)
    }

    /// The output layer of [`forward`](Network::forward).
    pub fn predict(&self, inputs: &[f64]) -> Result<Vec<f64>> {
        Ok(self.forward(inputs)?.outputs)
    }

    /// Trains until the error threshold or the epoch budget is reached and
    /// returns the full training history, including earlier runs.
    ///
    /// This is the blocking form of [`begin_training`](Network::begin_training);
    /// for the same seed both produce identical weights.
    ///
    /// # Errors
    ///
    /// [`NetworkError::EmptyDataset`] for an empty training set (or an empty
    /// validation set that was explicitly supplied), and
    /// [`NetworkError::DimensionMismatch`] for a malformed sample. Both are
    /// detected before any weight changes.
    pub fn train(
        &mut self,
        training_data: &[Sample],
        validation_data: Option<&[Sample]>,
    ) -> Result<&[EpochRecord]> {
        {
            let mut session = self.begin_training(training_data, validation_data)?;
            while session.next_epoch()?.is_some() {}
        }
        Ok(&self.training_history)
    }

    /// Shuffles a fresh copy of the sample order and runs forward/backward
    /// over every sample. Returns the mean summed squared error.
    pub(crate) fn run_epoch(&mut self, training_data: &[Sample]) -> Result<f64> {
        let mut order: Vec<usize> = (0..training_data.len()).collect();
        order.shuffle(&mut self.rng);

        let mut total_error = 0.0;
        for sample in order.iter().filter_map(|&index| training_data.get(index)) {
            let pass = self.forward(&sample.inputs)?;
            let errors = self.backward(&sample.inputs, &sample.targets, &pass)?;
            total_error += errors.iter().map(|error| error * error).sum::<f64>();
        }

        Ok(total_error / training_data.len() as f64)
    }

    /// Checks every sample against the layer sizes and for NaN or infinite
    /// values.
    pub(crate) fn check_samples(&self, data: &[Sample]) -> Result<()> {
        for sample in data {
            check_len("sample inputs", self.input_size, sample.inputs.len())?;
            check_len("sample targets", self.output_size, sample.targets.len())?;
            check_finite("sample inputs", &sample.inputs)?;
            check_finite("sample targets", &sample.targets)?;
        }
        Ok(())
    }

    pub fn total_parameters(&self) -> usize {
        self.input_size * self.hidden_size
            + self.hidden_size * self.output_size
            + self.hidden_size
            + self.output_size
    }

    pub fn stats(&self) -> NetworkStats {
        let last = self.training_history.last();
        NetworkStats {
            architecture: format!(
                "{}-{}-{}",
                self.input_size, self.hidden_size, self.output_size
            ),
            total_parameters: self.total_parameters(),
            training_epochs: self.training_history.len(),
            last_training_error: last.map(|record| record.training_error),
            last_validation_error: last.map(|record| record.validation_error),
            learning_rate: self.learning_rate,
        }
    }
}

fn random_biases<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Vec<f64> {
    (0..size).map(|_| rng.random_range(0.0..0.1)).collect()
}

fn squared_error(targets: &[f64], outputs: &[f64]) -> f64 {
    targets
        .iter()
        .zip(outputs)
        .map(|(target, output)| (target - output).powi(2))
        .sum()
}
