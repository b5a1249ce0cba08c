//! Pipeline configuration
//!
//! ```yaml
//! embeddings: out/entity_embeddings.tsv
//! entity_labels: out/entity_to_id.tsv.gz
//! namespaces: out/namespaces.json
//! concepts:
//!   - name: Person
//!     positives: examples/person_pos.txt
//!     negatives: examples/person_neg.txt
//! multiclass:
//!   classes:
//!     - name: Person
//!       members: examples/person_pos.txt
//!     - name: Place
//!       members: examples/place.txt
//! training:
//!   epochs: 50
//!   optimizer: sgd
//! ```
//!
//! Relative paths are resolved against the directory of the config file.

use crate::classify::TrainingConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Semantically invalid configuration
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Example files of one concept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptConfig {
    /// Concept name, used in reports
    pub name: String,
    /// IRIs of concept members
    pub positives: PathBuf,
    /// IRIs of non-members
    pub negatives: PathBuf,
}

/// One class of the multi-class task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassConfig {
    pub name: String,
    pub members: PathBuf,
}

/// Multi-class task, trained on the backbone of the first concept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MulticlassConfig {
    pub classes: Vec<ClassConfig>,
}

/// Full pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Embedding table produced by the KGE trainer
    pub embeddings: PathBuf,
    /// Entity id → label index produced by the KGE trainer
    pub entity_labels: PathBuf,
    /// Namespace table written when encoding
    pub namespaces: PathBuf,
    /// Binary concepts to learn
    #[serde(default)]
    pub concepts: Vec<ConceptConfig>,
    /// Optional multi-class task
    #[serde(default)]
    pub multiclass: Option<MulticlassConfig>,
    #[serde(default)]
    pub training: TrainingConfig,
}

impl PipelineConfig {
    /// Parse a YAML document. Paths are kept as written.
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file, resolving relative paths against its
    /// directory
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let yaml = fs::read_to_string(path)?;
        let mut config = Self::from_yaml_str(&yaml)?;
        if let Some(dir) = path.parent() {
            config.resolve_paths(dir);
        }
        info!("Loaded pipeline config from {:?}", path);
        Ok(config)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Prefix every relative path with `base`
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };

        resolve(&mut self.embeddings);
        resolve(&mut self.entity_labels);
        resolve(&mut self.namespaces);
        for concept in &mut self.concepts {
            resolve(&mut concept.positives);
            resolve(&mut concept.negatives);
        }
        if let Some(multiclass) = &mut self.multiclass {
            for class in &mut multiclass.classes {
                resolve(&mut class.members);
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        self.training
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if let Some(multiclass) = &self.multiclass {
            if multiclass.classes.len() < 2 {
                return Err(ConfigError::Invalid(format!(
                    "multiclass needs at least 2 classes, got {}",
                    multiclass.classes.len()
                )));
            }
            if self.concepts.is_empty() {
                return Err(ConfigError::Invalid(
                    "multiclass needs a concept to provide the backbone".to_string(),
                ));
            }
        }

        Ok(())
    }
}
