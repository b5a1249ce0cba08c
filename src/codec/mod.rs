//! RDF graph ↔ KGE triplet corpus codec
//!
//! Encodes every triple of an [`RdfGraph`] as one tab-separated line of
//! [`TermLabel`]s, compressing IRI namespaces through a [`NamespaceTable`].
//! After an external trainer has produced one embedding per label, the same
//! table turns the trainer's entity label index back into RDF terms.
//!
//! # Example
//!
//! ```rust
//! use inductive_concepts::codec::TripletCodec;
//! use inductive_concepts::embedding::{EmbeddingTable, EntityLabelIndex};
//! use inductive_concepts::rdf::{Literal, NamedNode, RdfGraph, RdfPredicate, RdfTerm, Triple};
//!
//! let mut graph = RdfGraph::new();
//! graph.insert(Triple::new(
//!     NamedNode::new("http://ex.org/s").unwrap().into(),
//!     RdfPredicate::new("http://ex.org/p").unwrap(),
//!     Literal::new_simple_literal("hello").into(),
//! ));
//!
//! let mut codec = TripletCodec::new();
//! assert_eq!(codec.encode(&graph).unwrap(), "ns1_s\tns1_p\tlit_hello\n");
//!
//! let table = EmbeddingTable::from_rows(vec![vec![0.1, 0.2], vec![0.3, 0.4]]).unwrap();
//! let labels = EntityLabelIndex::from_iter([(0, "ns1_s"), (1, "lit_hello")]);
//! let map = codec.decode_embeddings(&table, &labels).unwrap();
//! assert!(map.contains_key(&RdfTerm::iri("http://ex.org/s").unwrap()));
//! ```
//!
//! # Known limitations
//!
//! - Literal datatypes and language tags are dropped: `"5"^^xsd:int` and
//!   `"5"@en` both encode to `lit_5` and decode to the simple literal `"5"`.
//! - Tabs and newlines are not escaped. Encoding logs a warning for each
//!   label that contains one.

mod label;
mod namespace;

pub use label::TermLabel;
pub use namespace::{split_iri, Namespace, NamespaceTable};

use crate::embedding::{EmbeddingMap, EmbeddingTable, EntityLabelIndex};
use crate::rdf::{
    BlankNode, Literal, NamedNode, RdfError, RdfGraph, RdfObject, RdfSubject, RdfTerm, Triple,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Codec errors
#[derive(Error, Debug)]
pub enum CodecError {
    /// IRI contains neither `#` nor `/`
    #[error("IRI has no '#' or '/' to split a namespace from: {0}")]
    UnsplittableIri(String),

    /// Namespace id not present in the namespace table
    #[error("Unknown namespace id: {0} (was the table built by encoding this corpus?)")]
    UnknownNamespace(String),

    /// Entity id has no label in the index
    #[error("No label for entity id {0}")]
    MissingLabel(usize),

    /// Label does not match any label form
    #[error("Malformed term label: {0}")]
    MalformedLabel(String),

    /// Persisted namespace table is inconsistent
    #[error("Invalid namespace table: {0}")]
    InvalidNamespaceTable(String),

    /// Decoded value is not a valid RDF term
    #[error("RDF error: {0}")]
    Rdf(#[from] RdfError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CodecResult<T> = Result<T, CodecError>;

/// Encoder/decoder session around one namespace table
#[derive(Debug, Clone, Default)]
pub struct TripletCodec {
    namespaces: NamespaceTable,
}

impl TripletCodec {
    /// Create a codec with an empty namespace table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a codec around an existing (e.g. persisted) namespace table
    pub fn with_namespaces(namespaces: NamespaceTable) -> Self {
        Self { namespaces }
    }

    /// The namespace table built so far
    pub fn namespaces(&self) -> &NamespaceTable {
        &self.namespaces
    }

    /// Consume the codec, keeping its namespace table
    pub fn into_namespaces(self) -> NamespaceTable {
        self.namespaces
    }

    /// Encode a graph into triplet lines.
    ///
    /// Fails on the first IRI that cannot be split; no output is returned in
    /// that case.
    pub fn encode(&mut self, graph: &RdfGraph) -> CodecResult<String> {
        self.encode_triples(graph.iter())
    }

    /// Encode any sequence of triples into triplet lines, in iteration order
    pub fn encode_triples<'a, I>(&mut self, triples: I) -> CodecResult<String>
    where
        I: IntoIterator<Item = &'a Triple>,
    {
        let mut out = String::new();
        let mut count = 0usize;
        for triple in triples {
            let [s, p, o] = self.encode_triple(triple)?;
            out.push_str(&format!("{}\t{}\t{}\n", s, p, o));
            count += 1;
        }
        debug!("Encoded {} triples using {} namespaces", count, self.namespaces.len());
        Ok(out)
    }

    /// Encode a single triple into its three labels
    pub fn encode_triple(&mut self, triple: &Triple) -> CodecResult<[TermLabel; 3]> {
        let s = match &triple.subject {
            RdfSubject::NamedNode(n) => self.iri_label(n)?,
            RdfSubject::BlankNode(b) => blank_node_label(b),
        };
        let p = self.iri_label(triple.predicate.as_named_node())?;
        let o = match &triple.object {
            RdfObject::NamedNode(n) => self.iri_label(n)?,
            RdfObject::BlankNode(b) => blank_node_label(b),
            RdfObject::Literal(l) => literal_label(l),
        };

        for label in [&s, &p, &o] {
            if label.has_line_delimiters() {
                warn!("Label {:?} contains a tab or newline; its triplet line will be split", label);
            }
        }

        Ok([s, p, o])
    }

    /// Encode one term into its label
    pub fn encode_term(&mut self, term: &RdfTerm) -> CodecResult<TermLabel> {
        match term {
            RdfTerm::NamedNode(n) => self.iri_label(n),
            RdfTerm::BlankNode(b) => Ok(blank_node_label(b)),
            RdfTerm::Literal(l) => Ok(literal_label(l)),
        }
    }

    /// Encode a graph and write the triplet file
    pub fn write_triplets(&mut self, graph: &RdfGraph, path: &Path) -> CodecResult<usize> {
        let text = self.encode(graph)?;
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(text.as_bytes())?;
        writer.flush()?;

        info!(
            "Wrote {} triplets to {:?} ({} namespaces)",
            graph.len(),
            path,
            self.namespaces.len()
        );
        Ok(graph.len())
    }

    /// Rebuild the RDF term behind a label
    pub fn decode_label(&self, label: &str) -> CodecResult<RdfTerm> {
        let term = match label.parse::<TermLabel>()? {
            TermLabel::Iri { namespace_id, local } => {
                let iri = self.namespaces.expand(&namespace_id, &local)?;
                RdfTerm::NamedNode(NamedNode::new(&iri)?)
            }
            TermLabel::Literal(value) => RdfTerm::Literal(Literal::new_simple_literal(value)),
            TermLabel::BlankNode(id) => RdfTerm::BlankNode(BlankNode::from_id(&id)?),
        };
        Ok(term)
    }

    /// Attach trained embeddings to the RDF terms they were trained for.
    ///
    /// Row `i` of `table` is the embedding of the entity whose label is
    /// `labels[i]`. The result is ordered by entity id.
    pub fn decode_embeddings(
        &self,
        table: &EmbeddingTable,
        labels: &EntityLabelIndex,
    ) -> CodecResult<EmbeddingMap> {
        let mut map = EmbeddingMap::with_capacity(table.len());

        for (entity_id, row) in table.rows().enumerate() {
            let label = labels
                .get(entity_id)
                .ok_or(CodecError::MissingLabel(entity_id))?;
            let term = self.decode_label(label)?;
            if map.insert(term, row.to_owned()).is_some() {
                warn!("Label {} decodes to a term seen earlier; keeping the later embedding", label);
            }
        }

        info!("Decoded {} embeddings of dimension {}", map.len(), table.dim());
        Ok(map)
    }

    fn iri_label(&mut self, node: &NamedNode) -> CodecResult<TermLabel> {
        let (namespace_id, local) = self.namespaces.compress(node.as_str())?;
        Ok(TermLabel::Iri {
            namespace_id,
            local: local.to_string(),
        })
    }
}

fn blank_node_label(node: &BlankNode) -> TermLabel {
    TermLabel::BlankNode(node.as_str().to_string())
}

fn literal_label(literal: &Literal) -> TermLabel {
    TermLabel::Literal(literal.value().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::RdfPredicate;

    fn iri(s: &str) -> NamedNode {
        NamedNode::new(s).unwrap()
    }

    #[test]
    fn test_encode_literal_triple() {
        let mut graph = RdfGraph::new();
        graph.insert(Triple::new(
            iri("http://ex.org/s").into(),
            RdfPredicate::new("http://ex.org/p").unwrap(),
            Literal::new_simple_literal("hello").into(),
        ));

        let mut codec = TripletCodec::new();
        assert_eq!(codec.encode(&graph).unwrap(), "ns1_s\tns1_p\tlit_hello\n");
        assert_eq!(codec.namespaces().get_namespace("ns1").unwrap(), "http://ex.org/");
    }

    #[test]
    fn test_encode_blank_nodes_and_namespaces() {
        let mut graph = RdfGraph::new();
        graph.insert(Triple::new(
            BlankNode::from_id("b1").unwrap().into(),
            RdfPredicate::new("http://www.w3.org/1999/02/22-rdf-syntax-ns#type").unwrap(),
            iri("http://ex.org/onto#Person").into(),
        ));
        graph.insert(Triple::new(
            iri("http://ex.org/data/alice").into(),
            RdfPredicate::new("http://ex.org/onto#knows").unwrap(),
            BlankNode::from_id("b1").unwrap().into(),
        ));

        let mut codec = TripletCodec::new();
        let text = codec.encode(&graph).unwrap();
        assert_eq!(
            text,
            "bnode_b1\tns1_type\tns2_Person\nns3_alice\tns2_knows\tbnode_b1\n"
        );
    }

    #[test]
    fn test_literal_datatype_dropped() {
        let typed = Literal::new_typed_literal(
            "42",
            iri("http://www.w3.org/2001/XMLSchema#integer"),
        );
        let mut codec = TripletCodec::new();
        let label = codec.encode_term(&RdfTerm::Literal(typed)).unwrap();
        assert_eq!(label.to_string(), "lit_42");
        assert_eq!(
            codec.decode_label("lit_42").unwrap(),
            RdfTerm::Literal(Literal::new_simple_literal("42"))
        );
        // the literal datatype namespace is never registered
        assert!(codec.namespaces().is_empty());
    }

    #[test]
    fn test_unsplittable_iri_aborts() {
        let mut graph = RdfGraph::new();
        graph.insert(Triple::new(
            iri("urn:isbn:0451450523").into(),
            RdfPredicate::new("http://ex.org/p").unwrap(),
            Literal::new_simple_literal("x").into(),
        ));

        let mut codec = TripletCodec::new();
        assert!(matches!(
            codec.encode(&graph),
            Err(CodecError::UnsplittableIri(_))
        ));
    }

    #[test]
    fn test_decode_label_round_trip() {
        let mut codec = TripletCodec::new();
        for s in [
            "http://ex.org/onto#Person",
            "http://ex.org/data/has_part",
            "http://ex.org/a#b#c",
        ] {
            let term = RdfTerm::iri(s).unwrap();
            let label = codec.encode_term(&term).unwrap().to_string();
            assert_eq!(codec.decode_label(&label).unwrap(), term);
        }
    }

    #[test]
    fn test_decode_unknown_namespace() {
        let codec = TripletCodec::new();
        assert!(matches!(
            codec.decode_label("ns1_s"),
            Err(CodecError::UnknownNamespace(_))
        ));
    }

    #[test]
    fn test_decode_blank_node() {
        let codec = TripletCodec::new();
        let term = codec.decode_label("bnode_genid1").unwrap();
        match term {
            RdfTerm::BlankNode(b) => assert_eq!(b.as_str(), "genid1"),
            other => panic!("expected blank node, got {}", other),
        }
    }

    #[test]
    fn test_decode_embeddings_missing_label() {
        let codec = TripletCodec::new();
        let table = EmbeddingTable::from_rows(vec![vec![1.0], vec![2.0]]).unwrap();
        let labels = EntityLabelIndex::from_iter([(0, "lit_a")]);
        assert!(matches!(
            codec.decode_embeddings(&table, &labels),
            Err(CodecError::MissingLabel(1))
        ));
    }
}
