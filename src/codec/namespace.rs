//! Namespace compression table
//!
//! Maps IRI namespaces to short synthetic ids (`ns1`, `ns2`, ...) assigned
//! in first-seen order. Ids are never reused or renumbered, and the table
//! serializes to JSON so a later process can decode labels written by an
//! earlier encoding run.

use super::{CodecError, CodecResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::{debug, info};

const ID_PREFIX: &str = "ns";

/// Namespace (id → IRI prefix)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    /// Synthetic id, e.g. `ns1`
    pub id: String,
    /// IRI prefix ending in `#` or `/`
    pub namespace: String,
}

#[derive(Serialize, Deserialize)]
struct NamespaceFile {
    namespaces: Vec<Namespace>,
}

/// Split an IRI into namespace and local part.
///
/// Splits after the last `#` if the IRI has one, otherwise after the last
/// `/`. The separator stays with the namespace.
pub fn split_iri(iri: &str) -> CodecResult<(&str, &str)> {
    let pos = iri
        .rfind('#')
        .or_else(|| iri.rfind('/'))
        .ok_or_else(|| CodecError::UnsplittableIri(iri.to_string()))?;
    Ok(iri.split_at(pos + 1))
}

/// Bidirectional namespace ↔ id table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceTable {
    /// Id → namespace, in assignment order
    by_id: IndexMap<String, String>,
    /// Namespace → id
    by_namespace: HashMap<String, String>,
}

impl NamespaceTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the id for a namespace, assigning the next one if it is new
    pub fn id_for(&mut self, namespace: &str) -> &str {
        if !self.by_namespace.contains_key(namespace) {
            let id = format!("{}{}", ID_PREFIX, self.by_id.len() + 1);
            debug!("Assigned {} to namespace {}", id, namespace);
            self.by_id.insert(id.clone(), namespace.to_string());
            self.by_namespace.insert(namespace.to_string(), id);
        }
        &self.by_namespace[namespace]
    }

    /// Look up the id of a known namespace
    pub fn get_id(&self, namespace: &str) -> Option<&str> {
        self.by_namespace.get(namespace).map(|s| s.as_str())
    }

    /// Look up the namespace for an id
    pub fn get_namespace(&self, id: &str) -> CodecResult<&str> {
        self.by_id
            .get(id)
            .map(|s| s.as_str())
            .ok_or_else(|| CodecError::UnknownNamespace(id.to_string()))
    }

    /// Compress an IRI into `(id, local_part)`
    pub fn compress<'a>(&mut self, iri: &'a str) -> CodecResult<(String, &'a str)> {
        let (namespace, local) = split_iri(iri)?;
        Ok((self.id_for(namespace).to_string(), local))
    }

    /// Expand `(id, local_part)` back into the full IRI
    pub fn expand(&self, id: &str, local: &str) -> CodecResult<String> {
        let namespace = self.get_namespace(id)?;
        Ok(format!("{}{}", namespace, local))
    }

    /// Number of namespaces
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// All namespaces in id order
    pub fn namespaces(&self) -> Vec<Namespace> {
        self.by_id
            .iter()
            .map(|(id, namespace)| Namespace {
                id: id.clone(),
                namespace: namespace.clone(),
            })
            .collect()
    }

    /// Rebuild a table from persisted entries.
    ///
    /// Entries must be `ns1..nsN` in order with distinct namespaces, so that
    /// ids assigned after loading continue the sequence. Every namespace must
    /// end in `#` or `/`, as produced by [`split_iri`].
    pub fn from_namespaces(entries: Vec<Namespace>) -> CodecResult<Self> {
        let mut table = Self::new();
        for (i, entry) in entries.into_iter().enumerate() {
            let expected = format!("{}{}", ID_PREFIX, i + 1);
            if entry.id != expected {
                return Err(CodecError::InvalidNamespaceTable(format!(
                    "expected id {} at position {}, found {}",
                    expected, i, entry.id
                )));
            }
            if !entry.namespace.ends_with(['#', '/']) {
                return Err(CodecError::InvalidNamespaceTable(format!(
                    "namespace {} does not end in '#' or '/'",
                    entry.namespace
                )));
            }
            if table.by_namespace.contains_key(&entry.namespace) {
                return Err(CodecError::InvalidNamespaceTable(format!(
                    "duplicate namespace {}",
                    entry.namespace
                )));
            }
            table.by_namespace.insert(entry.namespace.clone(), entry.id.clone());
            table.by_id.insert(entry.id, entry.namespace);
        }
        Ok(table)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> CodecResult<String> {
        let file = NamespaceFile {
            namespaces: self.namespaces(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> CodecResult<Self> {
        let file: NamespaceFile = serde_json::from_str(json)?;
        Self::from_namespaces(file.namespaces)
    }

    /// Write the table to a JSON file
    pub fn save(&self, path: &Path) -> CodecResult<()> {
        let writer = BufWriter::new(File::create(path)?);
        let file = NamespaceFile {
            namespaces: self.namespaces(),
        };
        serde_json::to_writer_pretty(writer, &file)?;
        info!("Saved {} namespaces to {:?}", self.len(), path);
        Ok(())
    }

    /// Read a table from a JSON file
    pub fn load(path: &Path) -> CodecResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        let file: NamespaceFile = serde_json::from_reader(reader)?;
        let table = Self::from_namespaces(file.namespaces)?;
        info!("Loaded {} namespaces from {:?}", table.len(), path);
        Ok(table)
    }
}
