//! Mini-batch training loop
//!
//! The optimizer only sees the variables of the `VarMap` passed to
//! [`Trainer::fit`]; anything outside it (such as the frozen backbone of a
//! [`MultiClassClassifier`](super::MultiClassClassifier)) keeps its values.

use super::{ClassifyError, ClassifyResult};
use candle_core::Tensor;
use candle_nn::{AdamW, Module, Optimizer, ParamsAdamW, VarMap, SGD};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Optimizer choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OptimizerKind {
    /// Plain stochastic gradient descent
    Sgd,
    /// Adam with decoupled weight decay
    #[default]
    AdamW,
}

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Passes over the training set
    pub epochs: usize,
    /// Optimizer step size
    pub learning_rate: f64,
    /// Examples per optimizer step
    pub batch_size: usize,
    /// Optimizer
    pub optimizer: OptimizerKind,
    /// Share of examples held out for evaluation
    pub test_fraction: f64,
    /// Seed for splitting and batch shuffling
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 100,
            learning_rate: 0.01,
            batch_size: 32,
            optimizer: OptimizerKind::AdamW,
            test_fraction: 0.2,
            seed: 42,
        }
    }
}

impl TrainingConfig {
    /// Reject settings the loop cannot run with
    pub fn validate(&self) -> ClassifyResult<()> {
        if self.epochs == 0 {
            return Err(ClassifyError::InvalidConfig("epochs must be positive".to_string()));
        }
        if self.batch_size == 0 {
            return Err(ClassifyError::InvalidConfig("batch_size must be positive".to_string()));
        }
        if self.learning_rate.is_nan() || self.learning_rate <= 0.0 {
            return Err(ClassifyError::InvalidConfig(
                "learning_rate must be positive".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.test_fraction) {
            return Err(ClassifyError::InvalidConfig(
                "test_fraction must be in [0, 1)".to_string(),
            ));
        }
        Ok(())
    }
}

/// Loss applied to the model output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Objective {
    /// Negative log-likelihood of log-probabilities (binary classifier)
    NllLoss,
    /// Cross-entropy of raw scores (multi-class classifier)
    CrossEntropy,
}

impl Objective {
    /// Mean loss over a batch
    pub fn loss(&self, output: &Tensor, targets: &Tensor) -> candle_core::Result<Tensor> {
        match self {
            Objective::NllLoss => candle_nn::loss::nll(output, targets),
            Objective::CrossEntropy => candle_nn::loss::cross_entropy(output, targets),
        }
    }
}

/// Runs the training loop for one model
pub struct Trainer {
    config: TrainingConfig,
}

impl Trainer {
    /// Create a trainer, validating the configuration
    pub fn new(config: TrainingConfig) -> ClassifyResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The trainer's configuration
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train `model` on `(features, targets)`, updating the variables in
    /// `varmap`. Returns the mean loss of every epoch.
    pub fn fit<M: Module>(
        &self,
        model: &M,
        varmap: &VarMap,
        objective: Objective,
        features: &Tensor,
        targets: &Tensor,
    ) -> ClassifyResult<Vec<f32>> {
        let vars = varmap.all_vars();
        let lr = self.config.learning_rate;

        match self.config.optimizer {
            OptimizerKind::Sgd => {
                let opt = SGD::new(vars, lr)?;
                self.run(opt, model, objective, features, targets)
            }
            OptimizerKind::AdamW => {
                let params = ParamsAdamW {
                    lr,
                    ..Default::default()
                };
                let opt = AdamW::new(vars, params)?;
                self.run(opt, model, objective, features, targets)
            }
        }
    }

    fn run<O: Optimizer, M: Module>(
        &self,
        mut opt: O,
        model: &M,
        objective: Objective,
        features: &Tensor,
        targets: &Tensor,
    ) -> ClassifyResult<Vec<f32>> {
        let n = features.dim(0)?;
        if n == 0 {
            return Err(ClassifyError::EmptyExampleSet);
        }

        let device = features.device();
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut order: Vec<u32> = (0..n as u32).collect();
        let mut epoch_losses = Vec::with_capacity(self.config.epochs);

        for epoch in 0..self.config.epochs {
            order.shuffle(&mut rng);
            let mut total = 0f32;
            let mut batches = 0usize;

            for chunk in order.chunks(self.config.batch_size) {
                let idx = Tensor::from_slice(chunk, chunk.len(), device)?;
                let xs = features.index_select(&idx, 0)?;
                let ys = targets.index_select(&idx, 0)?;

                let loss = objective.loss(&model.forward(&xs)?, &ys)?;
                opt.backward_step(&loss)?;

                total += loss.to_scalar::<f32>()?;
                batches += 1;
            }

            let mean = total / batches as f32;
            debug!("epoch {}/{}: loss {:.5}", epoch + 1, self.config.epochs, mean);
            epoch_losses.push(mean);
        }

        info!(
            "Trained {} epochs on {} examples, final loss {:.5}",
            self.config.epochs,
            n,
            epoch_losses.last().copied().unwrap_or_default()
        );
        Ok(epoch_losses)
    }
}
