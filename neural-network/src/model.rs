use matrix::Matrix;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{NetworkError, check_len};
use crate::network::Network;
use crate::network_config::{NetworkConfig, check_learning_rate};
use crate::training_history::{EpochRecord, now_timestamp};
use crate::Result;

/// The persisted form of a [`Network`].
///
/// Field names follow the external document format (`inputSize`,
/// `weightsInputHidden`, ...). Weight matrices are stored as nested rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDocument {
    pub input_size: usize,
    pub hidden_size: usize,
    pub output_size: usize,
    pub weights_input_hidden: Vec<Vec<f64>>,
    pub weights_hidden_output: Vec<Vec<f64>>,
    pub bias_hidden: Vec<f64>,
    pub bias_output: Vec<f64>,
    pub learning_rate: f64,
    #[serde(default)]
    pub training_history: Vec<EpochRecord>,
    #[serde(default)]
    pub timestamp: String,
}

impl ModelDocument {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Parameters decoded from a document, checked against its declared sizes.
struct DecodedModel {
    weights_input_hidden: Matrix,
    weights_hidden_output: Matrix,
    bias_hidden: Vec<f64>,
    bias_output: Vec<f64>,
    learning_rate: f64,
    training_history: Vec<EpochRecord>,
}

impl ModelDocument {
    fn decode(self) -> Result<DecodedModel> {
        if self.input_size == 0 || self.hidden_size == 0 || self.output_size == 0 {
            return Err(NetworkError::InvalidModel(format!(
                "layer sizes must be positive, got {}-{}-{}",
                self.input_size, self.hidden_size, self.output_size
            )));
        }
        check_learning_rate(self.learning_rate).map_err(NetworkError::InvalidModel)?;

        let weights_input_hidden = Matrix::from_rows(self.weights_input_hidden)?;
        check_len("weightsInputHidden rows", self.input_size, weights_input_hidden.rows())?;
        check_len("weightsInputHidden columns", self.hidden_size, weights_input_hidden.cols())?;

        let weights_hidden_output = Matrix::from_rows(self.weights_hidden_output)?;
        check_len("weightsHiddenOutput rows", self.hidden_size, weights_hidden_output.rows())?;
        check_len("weightsHiddenOutput columns", self.output_size, weights_hidden_output.cols())?;

        check_len("biasHidden", self.hidden_size, self.bias_hidden.len())?;
        check_len("biasOutput", self.output_size, self.bias_output.len())?;

        let biases_finite = self
            .bias_hidden
            .iter()
            .chain(&self.bias_output)
            .all(|b| b.is_finite());
        if !(weights_input_hidden.is_finite() && weights_hidden_output.is_finite() && biases_finite)
        {
            return Err(NetworkError::InvalidModel(
                "weights and biases must be finite".to_string(),
            ));
        }

        Ok(DecodedModel {
            weights_input_hidden,
            weights_hidden_output,
            bias_hidden: self.bias_hidden,
            bias_output: self.bias_output,
            learning_rate: self.learning_rate,
            training_history: self.training_history,
        })
    }
}

impl Network {
    /// Snapshots sizes, parameters, learning rate and history.
    pub fn save_model(&self) -> ModelDocument {
        ModelDocument {
            input_size: self.input_size,
            hidden_size: self.hidden_size,
            output_size: self.output_size,
            weights_input_hidden: self.weights_input_hidden.to_rows(),
            weights_hidden_output: self.weights_hidden_output.to_rows(),
            bias_hidden: self.bias_hidden.clone(),
            bias_output: self.bias_output.clone(),
            learning_rate: self.learning_rate,
            training_history: self.training_history.clone(),
            timestamp: now_timestamp(),
        }
    }

    /// Replaces parameters, learning rate and history with those of
    /// `document`. Either everything is replaced or, on error, nothing is.
    ///
    /// # Errors
    ///
    /// [`NetworkError::DimensionMismatch`] if the document's sizes differ
    /// from this network's, [`NetworkError::InvalidModel`] if it is
    /// malformed.
    pub fn load_model(&mut self, document: ModelDocument) -> Result<()> {
        check_len("model input size", self.input_size, document.input_size)?;
        check_len("model hidden size", self.hidden_size, document.hidden_size)?;
        check_len("model output size", self.output_size, document.output_size)?;

        let decoded = document.decode()?;

        self.weights_input_hidden = decoded.weights_input_hidden;
        self.weights_hidden_output = decoded.weights_hidden_output;
        self.bias_hidden = decoded.bias_hidden;
        self.bias_output = decoded.bias_output;
        self.learning_rate = decoded.learning_rate;
        self.training_history = decoded.training_history;

        info!(
            "Model loaded: {}-{}-{}, {} history entries",
            self.input_size,
            self.hidden_size,
            self.output_size,
            self.training_history.len()
        );
        Ok(())
    }

    /// Builds a new network of whatever shape `document` describes.
    pub fn from_model(document: ModelDocument, config: &NetworkConfig) -> Result<Self> {
        let mut network = Network::with_config(
            document.input_size,
            document.hidden_size,
            document.output_size,
            config,
        )?;
        network.load_model(document)?;
        Ok(network)
    }

    /// Writes the model document to `path` as pretty-printed JSON.
    ///
    /// ```no_run
    /// use neural_network::Network;
    ///
    /// let network = Network::new(2, 3, 1).unwrap();
    /// network.save("model.json").unwrap();
    /// ```
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = self.save_model().to_json()?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Reads a network previously written by [`save`](Network::save).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let document = ModelDocument::from_json(&json)?;
        Self::from_model(document, &NetworkConfig::default())
    }
}
