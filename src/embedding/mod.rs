//! Externally trained entity embeddings
//!
//! The KGE trainer reads the triplet corpus and hands back two artifacts:
//! an [`EmbeddingTable`] (one row per entity) and an [`EntityLabelIndex`]
//! (entity id → the term label used in the corpus). The codec joins the two
//! into an [`EmbeddingMap`] keyed by RDF terms.

mod labels;
mod table;

pub use labels::EntityLabelIndex;
pub use table::EmbeddingTable;

use crate::rdf::RdfTerm;
use indexmap::IndexMap;
use ndarray::Array1;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Embedding errors
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed line in an input file
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Rows of different widths
    #[error("Dimension mismatch at row {row}: expected {expected}, got {got}")]
    DimensionMismatch { row: usize, expected: usize, got: usize },

    /// Matrix could not be shaped
    #[error("Shape error: {0}")]
    Shape(String),

    /// Two labels for the same entity id
    #[error("Duplicate entity id: {0}")]
    DuplicateEntityId(usize),
}

pub type EmbeddingResult<T> = Result<T, EmbeddingError>;

/// RDF term → embedding, ordered by entity id
pub type EmbeddingMap = IndexMap<RdfTerm, Array1<f32>>;

/// Write an embedding map as a JSON object keyed by the N-Triples form of
/// each term
pub fn save_embedding_map(map: &EmbeddingMap, path: &Path) -> EmbeddingResult<()> {
    let rendered: IndexMap<String, Vec<f32>> = map
        .iter()
        .map(|(term, embedding)| (term.to_string(), embedding.to_vec()))
        .collect();

    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &rendered)?;
    info!("Saved {} embeddings to {:?}", map.len(), path);
    Ok(())
}
