//! In-memory RDF graph
//!
//! A set of triples with set semantics (a repeated triple is stored once)
//! that iterates in insertion order. Parsers insert in document order, so
//! the triplet corpus follows the source file line by line.

use super::types::Triple;
use indexmap::IndexSet;

/// Insertion-ordered triple set
#[derive(Debug, Clone, Default)]
pub struct RdfGraph {
    triples: IndexSet<Triple>,
}

impl RdfGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a triple, returning `false` if it was already present
    pub fn insert(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    /// Check if a triple exists in the graph
    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// Get the total number of triples
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Check if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Iterate over triples in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }
}

impl FromIterator<Triple> for RdfGraph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        Self {
            triples: iter.into_iter().collect(),
        }
    }
}

impl Extend<Triple> for RdfGraph {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        self.triples.extend(iter);
    }
}

impl<'a> IntoIterator for &'a RdfGraph {
    type Item = &'a Triple;
    type IntoIter = indexmap::set::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::{Literal, NamedNode, RdfPredicate};

    fn triple(s: &str, p: &str, o: &str) -> Triple {
        Triple::new(
            NamedNode::new(s).unwrap().into(),
            RdfPredicate::new(p).unwrap(),
            Literal::new_simple_literal(o).into(),
        )
    }

    #[test]
    fn test_insert_and_dedup() {
        let mut graph = RdfGraph::new();
        assert!(graph.is_empty());

        assert!(graph.insert(triple("http://ex.org/a", "http://ex.org/p", "1")));
        assert!(!graph.insert(triple("http://ex.org/a", "http://ex.org/p", "1")));
        assert_eq!(graph.len(), 1);
        assert!(graph.contains(&triple("http://ex.org/a", "http://ex.org/p", "1")));
    }

    #[test]
    fn test_insertion_order() {
        let graph: RdfGraph = vec![
            triple("http://ex.org/c", "http://ex.org/p", "1"),
            triple("http://ex.org/a", "http://ex.org/p", "2"),
            triple("http://ex.org/b", "http://ex.org/p", "3"),
        ]
        .into_iter()
        .collect();

        let subjects: Vec<String> = graph.iter().map(|t| t.subject.to_string()).collect();
        assert_eq!(
            subjects,
            vec!["<http://ex.org/c>", "<http://ex.org/a>", "<http://ex.org/b>"]
        );
    }
}
