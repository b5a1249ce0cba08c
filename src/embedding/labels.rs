//! Entity id → term label index produced by the external trainer

use super::{EmbeddingError, EmbeddingResult};
use flate2::read::GzDecoder;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::info;

/// Entity id → term label
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityLabelIndex {
    labels: BTreeMap<usize, String>,
}

impl EntityLabelIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a label, failing if the id is already taken
    pub fn insert(&mut self, entity_id: usize, label: impl Into<String>) -> EmbeddingResult<()> {
        if self.labels.contains_key(&entity_id) {
            return Err(EmbeddingError::DuplicateEntityId(entity_id));
        }
        self.labels.insert(entity_id, label.into());
        Ok(())
    }

    /// Build from the trainer's label → id mapping
    pub fn from_entity_to_id<I, S>(entity_to_id: I) -> EmbeddingResult<Self>
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        let mut index = Self::new();
        for (label, id) in entity_to_id {
            index.insert(id, label)?;
        }
        Ok(index)
    }

    /// Label of an entity
    pub fn get(&self, entity_id: usize) -> Option<&str> {
        self.labels.get(&entity_id).map(|s| s.as_str())
    }

    /// Number of labelled entities
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate `(id, label)` in id order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.labels.iter().map(|(id, label)| (*id, label.as_str()))
    }

    /// Parse `id<TAB>label` lines; an `id<TAB>label` header line is skipped
    pub fn parse_tsv<R: BufRead>(reader: R) -> EmbeddingResult<Self> {
        let mut index = Self::new();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                continue;
            }
            let (id, label) = line.split_once('\t').ok_or_else(|| EmbeddingError::Parse {
                line: line_no + 1,
                message: "expected id<TAB>label".to_string(),
            })?;
            if line_no == 0 && id == "id" {
                continue;
            }
            let id = id.trim().parse::<usize>().map_err(|_| EmbeddingError::Parse {
                line: line_no + 1,
                message: format!("not an entity id: {:?}", id),
            })?;
            index.insert(id, label)?;
        }

        Ok(index)
    }

    /// Parse a JSON object mapping label → id
    pub fn parse_json<R: Read>(reader: R) -> EmbeddingResult<Self> {
        let entity_to_id: HashMap<String, usize> = serde_json::from_reader(reader)?;
        Self::from_entity_to_id(entity_to_id)
    }

    /// Load from a `.tsv`, `.json`, or gzip-compressed variant of either
    pub fn load(path: &Path) -> EmbeddingResult<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let (name, gzipped) = match name.strip_suffix(".gz") {
            Some(inner) => (inner.to_string(), true),
            None => (name, false),
        };

        let file = File::open(path)?;
        let reader: Box<dyn Read> = if gzipped {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };

        let index = if name.ends_with(".json") {
            Self::parse_json(reader)?
        } else {
            Self::parse_tsv(BufReader::new(reader))?
        };

        info!("Loaded {} entity labels from {:?}", index.len(), path);
        Ok(index)
    }
}

impl<S: Into<String>> FromIterator<(usize, S)> for EntityLabelIndex {
    /// Later entries overwrite earlier ones with the same id
    fn from_iter<I: IntoIterator<Item = (usize, S)>>(iter: I) -> Self {
        Self {
            labels: iter.into_iter().map(|(id, l)| (id, l.into())).collect(),
        }
    }
}
