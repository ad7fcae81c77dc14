//! Neurological pattern classifier built on a `10 -> 15 -> 5` network.
//!
//! Callers hand in a [`SymptomObservation`] (or an already encoded feature
//! vector) and get back every [`Condition`] ranked by its independent
//! sigmoid score, plus a short [`Explanation`].

pub mod classifier;
pub mod condition;
pub mod dataset;
pub mod error;
pub mod feature;
pub mod observation;

pub use crate::classifier::{Classification, Explanation, NeurologicalClassifier, Prediction};
pub use crate::condition::{Condition, Confidence};
pub use crate::dataset::neurological_dataset;
pub use crate::error::ClassifierError;
pub use crate::feature::{Feature, symptoms_to_features};
pub use crate::observation::SymptomObservation;
