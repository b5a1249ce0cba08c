//! RDF data model and parsing
//!
//! - RDF terms and triples backed by `oxrdf`
//! - An insertion-ordered, duplicate-free [`RdfGraph`]
//! - Turtle, N-Triples and RDF/XML parsing via `rio`
//!
//! # Example
//!
//! ```rust
//! use inductive_concepts::rdf::{RdfFormat, RdfParser};
//!
//! let graph = RdfParser::parse(
//!     "<http://ex.org/alice> <http://xmlns.com/foaf/0.1/name> \"Alice\" .",
//!     RdfFormat::NTriples,
//!     None,
//! )
//! .unwrap();
//! assert_eq!(graph.len(), 1);
//! ```

mod graph;
mod serialization;
mod types;

pub use graph::RdfGraph;

pub use types::{
    BlankNode, Literal, NamedNode, RdfError, RdfObject, RdfPredicate, RdfResult, RdfSubject,
    RdfTerm, Triple,
};

pub use serialization::{ParseError, ParseResult, RdfFormat, RdfParser};
