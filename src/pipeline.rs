//! End-to-end concept learning
//!
//! Decodes the KGE trainer's output back to RDF terms, then trains and
//! evaluates one [`BinaryClassifier`] per configured concept. When a
//! multi-class task is configured, a [`MultiClassClassifier`] is trained on
//! the frozen hidden stack of the first concept's classifier.

use crate::classify::{
    read_example_file, BinaryClassifier, ClassifyError, Evaluation, ExampleSet,
    MultiClassClassifier, Objective, Trainer,
};
use crate::codec::{NamespaceTable, TripletCodec};
use crate::config::PipelineConfig;
use crate::embedding::{EmbeddingMap, EmbeddingTable, EntityLabelIndex};
use crate::error::{Error, Result};
use crate::rdf::RdfTerm;
use candle_core::{DType, Device};
use candle_nn::{Module, VarBuilder, VarMap};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// Result of training and evaluating one model
#[derive(Debug, Clone, Serialize)]
pub struct TrainingOutcome {
    pub train_examples: usize,
    pub test_examples: usize,
    /// Mean loss of the last epoch
    pub final_loss: f32,
    /// Set when the test split was empty and the model was scored on its
    /// own training data
    pub evaluated_on_training_set: bool,
    pub evaluation: Evaluation,
}

/// Report for one binary concept
#[derive(Debug, Clone, Serialize)]
pub struct ConceptReport {
    pub name: String,
    #[serde(flatten)]
    pub outcome: TrainingOutcome,
}

/// Report for the multi-class task
#[derive(Debug, Clone, Serialize)]
pub struct MulticlassReport {
    /// Class names, in class-index order
    pub classes: Vec<String>,
    /// Concept whose classifier provided the frozen layers
    pub backbone: String,
    #[serde(flatten)]
    pub outcome: TrainingOutcome,
}

/// Everything a pipeline run produced
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub num_embeddings: usize,
    pub embedding_dim: usize,
    pub concepts: Vec<ConceptReport>,
    pub multiclass: Option<MulticlassReport>,
}

/// Decode the configured embedding table into RDF-term embeddings
pub fn load_embeddings(config: &PipelineConfig) -> Result<EmbeddingMap> {
    let namespaces = NamespaceTable::load(&config.namespaces)
        .map_err(|e| Error::from(e).in_file(&config.namespaces))?;
    let table = EmbeddingTable::load(&config.embeddings)
        .map_err(|e| Error::from(e).in_file(&config.embeddings))?;
    let labels = EntityLabelIndex::load(&config.entity_labels)
        .map_err(|e| Error::from(e).in_file(&config.entity_labels))?;

    let codec = TripletCodec::with_namespaces(namespaces);
    Ok(codec.decode_embeddings(&table, &labels)?)
}

/// Load embeddings and run every configured task
pub fn run(config: &PipelineConfig) -> Result<PipelineReport> {
    let embeddings = load_embeddings(config)?;
    run_with_embeddings(config, &embeddings)
}

/// Run every configured task on already decoded embeddings
pub fn run_with_embeddings(
    config: &PipelineConfig,
    embeddings: &EmbeddingMap,
) -> Result<PipelineReport> {
    config.validate()?;

    let dim = embeddings
        .values()
        .next()
        .map(|e| e.len())
        .ok_or_else(|| ClassifyError::InvalidConfig("no embeddings to learn from".to_string()))?;

    let device = Device::Cpu;
    let trainer = Trainer::new(config.training.clone())?;
    let mut concepts = Vec::with_capacity(config.concepts.len());
    let mut backbone: Option<(String, BinaryClassifier)> = None;

    for concept in &config.concepts {
        info!("Learning concept {}", concept.name);
        let examples = ExampleSet::binary(
            read_examples(&concept.positives)?,
            read_examples(&concept.negatives)?,
        );

        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let model = BinaryClassifier::new(dim, vb)?;
        let outcome = fit_and_evaluate(
            &trainer,
            &model,
            &varmap,
            Objective::NllLoss,
            &examples,
            embeddings,
            &device,
        )?;
        info!(
            "{}: accuracy {:.3} on {} examples",
            concept.name,
            outcome.evaluation.accuracy,
            outcome.evaluation.total()
        );

        concepts.push(ConceptReport {
            name: concept.name.clone(),
            outcome,
        });
        if backbone.is_none() {
            backbone = Some((concept.name.clone(), model));
        }
    }

    let multiclass = match (&config.multiclass, &backbone) {
        (Some(task), Some((backbone_name, backbone))) => {
            info!(
                "Learning {} classes on the {} backbone",
                task.classes.len(),
                backbone_name
            );
            let members = task
                .classes
                .iter()
                .map(|class| read_examples(&class.members))
                .collect::<Result<Vec<_>>>()?;
            let examples = ExampleSet::multiclass(members);

            let varmap = VarMap::new();
            let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
            let model = MultiClassClassifier::from_binary(backbone, task.classes.len(), vb)?;
            let outcome = fit_and_evaluate(
                &trainer,
                &model,
                &varmap,
                Objective::CrossEntropy,
                &examples,
                embeddings,
                &device,
            )?;

            Some(MulticlassReport {
                classes: task.classes.iter().map(|c| c.name.clone()).collect(),
                backbone: backbone_name.clone(),
                outcome,
            })
        }
        _ => None,
    };

    Ok(PipelineReport {
        num_embeddings: embeddings.len(),
        embedding_dim: dim,
        concepts,
        multiclass,
    })
}

fn read_examples(path: &Path) -> Result<Vec<RdfTerm>> {
    read_example_file(path).map_err(|e| Error::from(e).in_file(path))
}

fn fit_and_evaluate<M: Module>(
    trainer: &Trainer,
    model: &M,
    varmap: &VarMap,
    objective: Objective,
    examples: &ExampleSet,
    embeddings: &EmbeddingMap,
    device: &Device,
) -> Result<TrainingOutcome> {
    let config = trainer.config();
    let (train, test) = examples.split(config.test_fraction, config.seed);

    let (features, targets) = train.to_tensors(embeddings, device)?;
    let losses = trainer.fit(model, varmap, objective, &features, &targets)?;

    let evaluated_on_training_set = test.is_empty();
    let scored = if evaluated_on_training_set {
        warn!("Test split is empty, evaluating on the training set");
        &train
    } else {
        &test
    };
    let (features, targets) = scored.to_tensors(embeddings, device)?;
    let evaluation = Evaluation::evaluate(model, &features, &targets, examples.num_classes())?;

    Ok(TrainingOutcome {
        train_examples: train.len(),
        test_examples: test.len(),
        final_loss: losses.last().copied().unwrap_or_default(),
        evaluated_on_training_set,
        evaluation,
    })
}
