//! Classification metrics

use super::{ClassifyError, ClassifyResult};
use candle_core::{Tensor, D};
use candle_nn::Module;
use ndarray::Array2;
use serde::Serialize;

/// Predicted class per row: the arg-max of the model output
pub fn predict<M: Module>(model: &M, features: &Tensor) -> ClassifyResult<Vec<u32>> {
    Ok(model.forward(features)?.argmax(D::Minus1)?.to_vec1::<u32>()?)
}

/// Accuracy and confusion matrix of one evaluation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// Share of correct predictions
    pub accuracy: f64,
    /// `confusion[[truth, predicted]]` counts
    pub confusion: Array2<usize>,
}

impl Evaluation {
    /// Score predictions against ground truth
    pub fn from_predictions(
        truth: &[u32],
        predicted: &[u32],
        num_classes: usize,
    ) -> ClassifyResult<Self> {
        if truth.len() != predicted.len() {
            return Err(ClassifyError::DimensionMismatch {
                expected: truth.len(),
                got: predicted.len(),
            });
        }
        if truth.is_empty() {
            return Err(ClassifyError::EmptyExampleSet);
        }

        let mut confusion = Array2::<usize>::zeros((num_classes, num_classes));
        for (&t, &p) in truth.iter().zip(predicted) {
            for label in [t, p] {
                if label as usize >= num_classes {
                    return Err(ClassifyError::InvalidLabel { label, num_classes });
                }
            }
            confusion[[t as usize, p as usize]] += 1;
        }

        let correct: usize = confusion.diag().sum();
        Ok(Self {
            accuracy: correct as f64 / truth.len() as f64,
            confusion,
        })
    }

    /// Run `model` on `features` and score against `targets`
    pub fn evaluate<M: Module>(
        model: &M,
        features: &Tensor,
        targets: &Tensor,
        num_classes: usize,
    ) -> ClassifyResult<Self> {
        let predicted = predict(model, features)?;
        let truth = targets.to_vec1::<u32>()?;
        Self::from_predictions(&truth, &predicted, num_classes)
    }

    /// Number of classes
    pub fn num_classes(&self) -> usize {
        self.confusion.nrows()
    }

    /// Number of evaluated examples
    pub fn total(&self) -> usize {
        self.confusion.sum()
    }

    /// Examples whose true class is `class`
    pub fn support(&self, class: usize) -> usize {
        self.confusion.row(class).sum()
    }

    /// Precision of `class`; 0 when it was never predicted
    pub fn precision(&self, class: usize) -> f64 {
        let predicted = self.confusion.column(class).sum();
        ratio(self.confusion[[class, class]], predicted)
    }

    /// Recall of `class`; 0 when it never occurs
    pub fn recall(&self, class: usize) -> f64 {
        ratio(self.confusion[[class, class]], self.support(class))
    }

    /// Harmonic mean of precision and recall
    pub fn f1(&self, class: usize) -> f64 {
        let (p, r) = (self.precision(class), self.recall(class));
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }

    /// Unweighted mean F1 over all classes
    pub fn macro_f1(&self) -> f64 {
        let n = self.num_classes();
        if n == 0 {
            return 0.0;
        }
        (0..n).map(|c| self.f1(c)).sum::<f64>() / n as f64
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
