//! Inductive concept learning over RDF knowledge-graph embeddings
//!
//! The pipeline has three stages:
//!
//! 1. **Encode**: parse an RDF document ([`rdf`]) and write it as a
//!    tab-separated triplet corpus with compressed namespaces ([`codec`]).
//! 2. **Embed**: an external knowledge-graph-embedding trainer reads the
//!    corpus and writes one vector per entity. Its output is read back by
//!    [`embedding`] and decoded to RDF terms by the same codec.
//! 3. **Learn**: feed-forward classifiers ([`classify`]) learn concept
//!    membership from positive and negative example entities, and a
//!    multi-class head reuses a trained binary backbone.
//!
//! [`pipeline`] runs stage 3 end to end from a YAML [`config`].
//!
//! ## Example Usage
//!
//! ```rust
//! use inductive_concepts::codec::TripletCodec;
//! use inductive_concepts::rdf::{RdfFormat, RdfParser};
//!
//! let graph = RdfParser::parse(
//!     "@prefix ex: <http://ex.org/> . ex:alice ex:knows ex:bob .",
//!     RdfFormat::Turtle,
//!     None,
//! )
//! .unwrap();
//!
//! let mut codec = TripletCodec::new();
//! let corpus = codec.encode(&graph).unwrap();
//! assert_eq!(corpus, "ns1_alice\tns1_knows\tns1_bob\n");
//! assert_eq!(codec.namespaces().get_namespace("ns1").unwrap(), "http://ex.org/");
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod classify;
pub mod codec;
pub mod config;
pub mod embedding;
pub mod error;
pub mod pipeline;
pub mod rdf;

// Re-export main types for convenience
pub use rdf::{
    BlankNode, Literal, NamedNode, ParseError, RdfError, RdfFormat, RdfGraph, RdfObject,
    RdfParser, RdfPredicate, RdfSubject, RdfTerm, Triple,
};

pub use codec::{CodecError, CodecResult, Namespace, NamespaceTable, TermLabel, TripletCodec};

pub use embedding::{EmbeddingError, EmbeddingMap, EmbeddingTable, EntityLabelIndex};

pub use classify::{
    BinaryClassifier, ClassifyError, Evaluation, ExampleSet, MultiClassClassifier, Trainer,
    TrainingConfig,
};

pub use config::{ConfigError, PipelineConfig};
pub use error::{Error, Result};
pub use pipeline::PipelineReport;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), "0.3.0");
    }
}
