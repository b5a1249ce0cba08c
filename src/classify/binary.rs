//! Binary concept-membership classifier

use super::{ClassifyError, ClassifyResult, HIDDEN_WIDTH};
use candle_core::{Result, Tensor, D};
use candle_nn::{linear, Linear, Module, VarBuilder};

/// Four linear layers with ReLU between them and log-softmax on the output.
///
/// ```text
/// x (N, input_size)
///   -> Linear(input_size, 10) -> ReLU
///   -> Linear(10, 10)         -> ReLU
///   -> Linear(10, 10)         -> ReLU
///   -> Linear(10, 2)          -> log_softmax
/// ```
///
/// Class 1 means "member of the concept".
#[derive(Debug, Clone)]
pub struct BinaryClassifier {
    hidden_1: Linear,
    hidden_2: Linear,
    hidden_3: Linear,
    output: Linear,
    input_size: usize,
}

impl BinaryClassifier {
    /// Number of output classes
    pub const NUM_CLASSES: usize = 2;

    /// Create a classifier whose parameters live in `vb`.
    ///
    /// # Arguments
    /// - `input_size`: Embedding dimension
    /// - `vb`: Variable builder for parameter initialization
    pub fn new(input_size: usize, vb: VarBuilder) -> ClassifyResult<Self> {
        if input_size == 0 {
            return Err(ClassifyError::InvalidConfig(
                "input size must be positive".to_string(),
            ));
        }

        Ok(Self {
            hidden_1: linear(input_size, HIDDEN_WIDTH, vb.pp("hidden_1"))?,
            hidden_2: linear(HIDDEN_WIDTH, HIDDEN_WIDTH, vb.pp("hidden_2"))?,
            hidden_3: linear(HIDDEN_WIDTH, HIDDEN_WIDTH, vb.pp("hidden_3"))?,
            output: linear(HIDDEN_WIDTH, Self::NUM_CLASSES, vb.pp("output"))?,
            input_size,
        })
    }

    /// Expected embedding dimension
    pub fn input_size(&self) -> usize {
        self.input_size
    }

    /// The three hidden layers, in order, for reuse as a frozen backbone
    pub fn hidden_layers(&self) -> [&Linear; 3] {
        [&self.hidden_1, &self.hidden_2, &self.hidden_3]
    }
}

impl Module for BinaryClassifier {
    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let z = self.hidden_1.forward(xs)?.relu()?;
        let z = self.hidden_2.forward(&z)?.relu()?;
        let z = self.hidden_3.forward(&z)?.relu()?;
        candle_nn::ops::log_softmax(&self.output.forward(&z)?, D::Minus1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device};
    use candle_nn::VarMap;

    #[test]
    fn test_forward_shape_and_log_probs() {
        let device = Device::Cpu;
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);

        let model = BinaryClassifier::new(16, vb).unwrap();
        let x = Tensor::randn(0f32, 1f32, (8, 16), &device).unwrap();
        let out = model.forward(&x).unwrap();
        assert_eq!(out.dims(), &[8, 2]);

        let sums = out.exp().unwrap().sum(1).unwrap().to_vec1::<f32>().unwrap();
        for s in sums {
            assert!((s - 1.0).abs() < 1e-5, "row sums to {}", s);
        }
    }

    #[test]
    fn test_registers_all_parameters() {
        let device = Device::Cpu;
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let _model = BinaryClassifier::new(4, vb).unwrap();

        // 4 layers x (weight + bias)
        assert_eq!(varmap.all_vars().len(), 8);
    }

    #[test]
    fn test_zero_input_size() {
        let device = Device::Cpu;
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        assert!(matches!(
            BinaryClassifier::new(0, vb),
            Err(ClassifyError::InvalidConfig(_))
        ));
    }
}
