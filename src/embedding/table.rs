//! Dense per-entity embedding table

use super::{EmbeddingError, EmbeddingResult};
use ndarray::{Array2, ArrayView1, Ix1};
use std::fs;
use std::path::Path;
use tracing::info;

/// Row `i` holds the embedding of entity id `i`
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingTable {
    data: Array2<f32>,
}

impl EmbeddingTable {
    /// Wrap an existing `(entities, dim)` matrix
    pub fn from_array(data: Array2<f32>) -> Self {
        Self { data }
    }

    /// Build from row vectors, which must all have the same width
    pub fn from_rows(rows: Vec<Vec<f32>>) -> EmbeddingResult<Self> {
        let dim = rows.first().map(|r| r.len()).unwrap_or(0);
        let n = rows.len();
        let mut flat = Vec::with_capacity(n * dim);

        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != dim {
                return Err(EmbeddingError::DimensionMismatch {
                    row: i,
                    expected: dim,
                    got: row.len(),
                });
            }
            flat.extend(row);
        }

        let data = Array2::from_shape_vec((n, dim), flat)
            .map_err(|e| EmbeddingError::Shape(e.to_string()))?;
        Ok(Self { data })
    }

    /// Parse rows of floats separated by tabs, commas or spaces
    pub fn parse(text: &str) -> EmbeddingResult<Self> {
        let mut rows = Vec::new();

        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let row = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|v| !v.is_empty())
                .map(|v| {
                    v.parse::<f32>().map_err(|_| EmbeddingError::Parse {
                        line: line_no + 1,
                        message: format!("not a number: {:?}", v),
                    })
                })
                .collect::<EmbeddingResult<Vec<f32>>>()?;
            rows.push(row);
        }

        Self::from_rows(rows)
    }

    /// Load a table written by the external trainer
    pub fn load(path: &Path) -> EmbeddingResult<Self> {
        let text = fs::read_to_string(path)?;
        let table = Self::parse(&text)?;
        info!("Loaded {} embeddings of dimension {} from {:?}", table.len(), table.dim(), path);
        Ok(table)
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    /// Embedding dimension
    pub fn dim(&self) -> usize {
        self.data.ncols()
    }

    /// Embedding of one entity
    pub fn row(&self, entity_id: usize) -> Option<ArrayView1<'_, f32>> {
        (entity_id < self.len()).then(|| self.data.row(entity_id))
    }

    /// Iterate rows in entity id order
    pub fn rows(&self) -> ndarray::iter::AxisIter<'_, f32, Ix1> {
        self.data.outer_iter()
    }

    /// The underlying matrix
    pub fn as_array(&self) -> &Array2<f32> {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_separators() {
        let table = EmbeddingTable::parse("0.1\t0.2 0.3\n\n1,2,3\n").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.dim(), 3);
        assert_eq!(table.row(1).unwrap().to_vec(), vec![1.0, 2.0, 3.0]);
        assert!(table.row(2).is_none());
    }

    #[test]
    fn test_ragged_rows() {
        let err = EmbeddingTable::parse("1 2\n3\n").unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch { row: 1, expected: 2, got: 1 }
        ));
    }

    #[test]
    fn test_bad_number() {
        let err = EmbeddingTable::parse("1 x\n").unwrap_err();
        assert!(matches!(err, EmbeddingError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_empty() {
        let table = EmbeddingTable::parse("").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.rows().count(), 0);
    }
}
