use candle_core::{DType, Device, Tensor};
use candle_nn::{Module, VarBuilder, VarMap};
use inductive_concepts::classify::{
    BinaryClassifier, Evaluation, MultiClassClassifier, Objective, OptimizerKind, Trainer,
    TrainingConfig,
};

fn snapshot(vars: &VarMap) -> Vec<Vec<f32>> {
    vars.all_vars()
        .iter()
        .map(|v| v.flatten_all().unwrap().to_vec1::<f32>().unwrap())
        .collect()
}

fn weights(model: &MultiClassClassifier) -> Vec<Vec<Vec<f32>>> {
    model
        .frozen_layers()
        .iter()
        .map(|l| l.weight().to_vec2::<f32>().unwrap())
        .collect()
}

/// Two separable clusters: class 1 around (+1, +1, ...), class 0 around -1
fn clusters(n: usize, dim: usize, device: &Device) -> (Tensor, Tensor) {
    let mut features = Vec::with_capacity(n * dim);
    let mut targets = Vec::with_capacity(n);
    for i in 0..n {
        let class = (i % 2) as u32;
        let sign = if class == 1 { 1.0 } else { -1.0 };
        for j in 0..dim {
            features.push(sign + 0.01 * ((i + j) % 5) as f32);
        }
        targets.push(class);
    }
    (
        Tensor::from_vec(features, (n, dim), device).unwrap(),
        Tensor::from_vec(targets, n, device).unwrap(),
    )
}

#[test]
fn test_binary_output_is_log_probabilities() {
    let device = Device::Cpu;
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
    let model = BinaryClassifier::new(4, vb).unwrap();

    let x = Tensor::randn(0f32, 1f32, (5, 4), &device).unwrap();
    let out = model.forward(&x).unwrap();
    assert_eq!(out.dims(), &[5, 2]);

    for row in out.exp().unwrap().to_vec2::<f32>().unwrap() {
        let sum: f32 = row.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }
}

#[test]
fn test_binary_training_learns_separable_data() {
    let device = Device::Cpu;
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
    let model = BinaryClassifier::new(4, vb).unwrap();
    let (x, y) = clusters(40, 4, &device);

    let trainer = Trainer::new(TrainingConfig {
        epochs: 60,
        batch_size: 8,
        learning_rate: 0.05,
        ..Default::default()
    })
    .unwrap();
    let losses = trainer.fit(&model, &varmap, Objective::NllLoss, &x, &y).unwrap();

    assert_eq!(losses.len(), 60);
    assert!(losses.last().unwrap() < losses.first().unwrap());

    let eval = Evaluation::evaluate(&model, &x, &y, 2).unwrap();
    assert!(eval.accuracy > 0.9, "accuracy {}", eval.accuracy);
}

#[test]
fn test_frozen_layers_survive_training() {
    let device = Device::Cpu;
    let backbone_vars = VarMap::new();
    let backbone = BinaryClassifier::new(
        4,
        VarBuilder::from_varmap(&backbone_vars, DType::F32, &device),
    )
    .unwrap();
    let backbone_before = snapshot(&backbone_vars);

    let head_vars = VarMap::new();
    let model = MultiClassClassifier::from_binary(
        &backbone,
        3,
        VarBuilder::from_varmap(&head_vars, DType::F32, &device),
    )
    .unwrap();
    let frozen_before = weights(&model);
    let head_before = snapshot(&head_vars);

    let x = Tensor::randn(0f32, 1f32, (12, 4), &device).unwrap();
    let y = Tensor::new(&[0u32, 1, 2, 0, 1, 2, 0, 1, 2, 0, 1, 2], &device).unwrap();

    for optimizer in [OptimizerKind::Sgd, OptimizerKind::AdamW] {
        let trainer = Trainer::new(TrainingConfig {
            epochs: 5,
            batch_size: 4,
            learning_rate: 0.1,
            optimizer,
            ..Default::default()
        })
        .unwrap();
        trainer
            .fit(&model, &head_vars, Objective::CrossEntropy, &x, &y)
            .unwrap();
    }

    assert_eq!(weights(&model), frozen_before);
    assert_eq!(snapshot(&backbone_vars), backbone_before);
    assert_ne!(snapshot(&head_vars), head_before);
}

#[test]
fn test_multiclass_output_is_raw_scores() {
    let device = Device::Cpu;
    let backbone_vars = VarMap::new();
    let backbone = BinaryClassifier::new(
        3,
        VarBuilder::from_varmap(&backbone_vars, DType::F32, &device),
    )
    .unwrap();
    let head_vars = VarMap::new();
    let model = MultiClassClassifier::from_binary(
        &backbone,
        4,
        VarBuilder::from_varmap(&head_vars, DType::F32, &device),
    )
    .unwrap();

    let x = Tensor::randn(0f32, 1f32, (6, 3), &device).unwrap();
    let out = model.forward(&x).unwrap();
    assert_eq!(out.dims(), &[6, 4]);

    let predictions = inductive_concepts::classify::metrics::predict(&model, &x).unwrap();
    assert_eq!(predictions.len(), 6);
    assert!(predictions.iter().all(|&c| c < 4));
}
