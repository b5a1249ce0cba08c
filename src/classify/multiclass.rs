//! Multi-class classifier on a frozen binary backbone

use super::{BinaryClassifier, ClassifyError, ClassifyResult, HIDDEN_WIDTH};
use candle_core::{Result, Tensor};
use candle_nn::{linear, Linear, Module, VarBuilder};

/// Three frozen hidden layers, one trainable hidden layer, and a trainable
/// output layer producing raw class scores.
///
/// The frozen layers are detached copies of the layers handed in. They are
/// not registered in the `VarBuilder`, so an optimizer built from its
/// `VarMap` never touches them, and training the source classifier further
/// does not change them either.
#[derive(Debug, Clone)]
pub struct MultiClassClassifier {
    hidden_1: Linear,
    hidden_2: Linear,
    hidden_3: Linear,
    hidden_4: Linear,
    output: Linear,
    num_classes: usize,
}

impl MultiClassClassifier {
    /// Create a classifier from three pretrained hidden layers.
    ///
    /// # Arguments
    /// - `hidden_1`, `hidden_2`, `hidden_3`: Pretrained layers, frozen
    /// - `num_classes`: Width of the output layer
    /// - `vb`: Variable builder for the trainable layers
    pub fn new(
        hidden_1: &Linear,
        hidden_2: &Linear,
        hidden_3: &Linear,
        num_classes: usize,
        vb: VarBuilder,
    ) -> ClassifyResult<Self> {
        if num_classes < 2 {
            return Err(ClassifyError::InvalidConfig(format!(
                "need at least 2 classes, got {}",
                num_classes
            )));
        }

        let hidden_3 = freeze(hidden_3)?;
        let backbone_width = hidden_3.weight().dim(0)?;

        Ok(Self {
            hidden_1: freeze(hidden_1)?,
            hidden_2: freeze(hidden_2)?,
            hidden_3,
            hidden_4: linear(backbone_width, HIDDEN_WIDTH, vb.pp("hidden_4"))?,
            output: linear(HIDDEN_WIDTH, num_classes, vb.pp("output"))?,
            num_classes,
        })
    }

    /// Create a classifier on the hidden stack of a binary classifier
    pub fn from_binary(
        backbone: &BinaryClassifier,
        num_classes: usize,
        vb: VarBuilder,
    ) -> ClassifyResult<Self> {
        let [h1, h2, h3] = backbone.hidden_layers();
        Self::new(h1, h2, h3, num_classes, vb)
    }

    /// Number of output classes
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// The frozen layers, in order
    pub fn frozen_layers(&self) -> [&Linear; 3] {
        [&self.hidden_1, &self.hidden_2, &self.hidden_3]
    }
}

impl Module for MultiClassClassifier {
    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let z = self.hidden_1.forward(xs)?.relu()?;
        let z = self.hidden_2.forward(&z)?.relu()?;
        let z = self.hidden_3.forward(&z)?.relu()?;
        let z = self.hidden_4.forward(&z)?.relu()?;
        self.output.forward(&z)
    }
}

fn freeze(layer: &Linear) -> ClassifyResult<Linear> {
    let weight = layer.weight().copy()?.detach();
    let bias = match layer.bias() {
        Some(b) => Some(b.copy()?.detach()),
        None => None,
    };
    Ok(Linear::new(weight, bias))
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device};
    use candle_nn::VarMap;

    fn backbone(device: &Device) -> (VarMap, BinaryClassifier) {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);
        let model = BinaryClassifier::new(6, vb).unwrap();
        (varmap, model)
    }

    #[test]
    fn test_forward_shape() {
        let device = Device::Cpu;
        let (_, binary) = backbone(&device);

        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let model = MultiClassClassifier::from_binary(&binary, 5, vb).unwrap();
        assert_eq!(model.num_classes(), 5);

        let x = Tensor::randn(0f32, 1f32, (3, 6), &device).unwrap();
        assert_eq!(model.forward(&x).unwrap().dims(), &[3, 5]);
    }

    #[test]
    fn test_only_new_layers_are_trainable() {
        let device = Device::Cpu;
        let (_, binary) = backbone(&device);

        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let _model = MultiClassClassifier::from_binary(&binary, 3, vb).unwrap();

        // hidden_4 + output, weight and bias each
        assert_eq!(varmap.all_vars().len(), 4);
    }

    #[test]
    fn test_frozen_copy_matches_source() {
        let device = Device::Cpu;
        let (_, binary) = backbone(&device);

        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let model = MultiClassClassifier::from_binary(&binary, 3, vb).unwrap();

        let source = binary.hidden_layers()[0].weight().to_vec2::<f32>().unwrap();
        let frozen = model.frozen_layers()[0].weight().to_vec2::<f32>().unwrap();
        assert_eq!(source, frozen);
    }

    #[test]
    fn test_rejects_single_class() {
        let device = Device::Cpu;
        let (_, binary) = backbone(&device);
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        assert!(MultiClassClassifier::from_binary(&binary, 1, vb).is_err());
    }
}
