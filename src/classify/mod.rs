//! Feed-forward concept classifiers over entity embeddings
//!
//! - [`BinaryClassifier`]: three ReLU hidden layers of width
//!   [`HIDDEN_WIDTH`] and a 2-way log-softmax output, for concept
//!   membership.
//! - [`MultiClassClassifier`]: reuses the hidden stack of a trained binary
//!   classifier as a frozen backbone, adds one trainable hidden layer and a
//!   raw-score output layer.
//!
//! Both implement [`candle_nn::Module`]. [`training`] drives them with an
//! optimizer over their [`candle_nn::VarMap`]; [`metrics`] scores their
//! predictions.

mod binary;
mod dataset;
pub mod metrics;
mod multiclass;
pub mod training;

pub use binary::BinaryClassifier;
pub use dataset::{read_example_file, ExampleSet};
pub use metrics::Evaluation;
pub use multiclass::MultiClassClassifier;
pub use training::{Objective, OptimizerKind, Trainer, TrainingConfig};

use crate::rdf::RdfError;
use thiserror::Error;

/// Width of every hidden layer
pub const HIDDEN_WIDTH: usize = 10;

/// Classification errors
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// Tensor error
    #[error("Tensor error: {0}")]
    Tensor(#[from] candle_core::Error),

    /// Invalid model or training configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Example term has no embedding
    #[error("No embedding for {0}")]
    MissingEmbedding(String),

    /// Embedding width differs from the model input size
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// No examples to train or evaluate on
    #[error("Example set is empty")]
    EmptyExampleSet,

    /// Class index out of range
    #[error("Class {label} out of range for {num_classes} classes")]
    InvalidLabel { label: u32, num_classes: usize },

    /// Malformed example file
    #[error("Invalid example at line {line}: {source}")]
    InvalidExample {
        line: usize,
        #[source]
        source: RdfError,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ClassifyResult<T> = Result<T, ClassifyError>;
