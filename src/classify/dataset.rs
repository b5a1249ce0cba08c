//! Labelled example sets and their feature tensors

use super::{ClassifyError, ClassifyResult};
use crate::embedding::EmbeddingMap;
use crate::rdf::RdfTerm;
use candle_core::{Device, Tensor};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::warn;

/// Terms paired with class indices
#[derive(Debug, Clone, PartialEq)]
pub struct ExampleSet {
    examples: Vec<(RdfTerm, u32)>,
    num_classes: usize,
}

impl ExampleSet {
    /// Positive examples get class 1, negative examples class 0
    pub fn binary<P, N>(positives: P, negatives: N) -> Self
    where
        P: IntoIterator<Item = RdfTerm>,
        N: IntoIterator<Item = RdfTerm>,
    {
        let positives: Vec<RdfTerm> = positives.into_iter().collect();
        let positive_set: HashSet<&RdfTerm> = positives.iter().collect();

        let mut examples = Vec::new();
        for term in negatives {
            if positive_set.contains(&term) {
                warn!("{} is both a positive and a negative example", term);
            }
            examples.push((term, 0));
        }
        examples.extend(positives.iter().cloned().map(|t| (t, 1)));

        Self {
            examples,
            num_classes: 2,
        }
    }

    /// Members of `classes[i]` get class `i`
    pub fn multiclass(classes: Vec<Vec<RdfTerm>>) -> Self {
        let num_classes = classes.len();
        let examples = classes
            .into_iter()
            .enumerate()
            .flat_map(|(class, members)| members.into_iter().map(move |t| (t, class as u32)))
            .collect();

        Self {
            examples,
            num_classes,
        }
    }

    /// Number of examples
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// Check if there are no examples
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Number of classes the labels range over
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// The `(term, class)` pairs
    pub fn examples(&self) -> &[(RdfTerm, u32)] {
        &self.examples
    }

    /// Shuffle with `seed` and split off `test_fraction` of the examples
    /// as a test set. Returns `(train, test)`.
    ///
    /// A non-empty set always keeps at least one training example.
    pub fn split(&self, test_fraction: f64, seed: u64) -> (ExampleSet, ExampleSet) {
        let mut shuffled = self.examples.clone();
        let mut rng = StdRng::seed_from_u64(seed);
        shuffled.shuffle(&mut rng);

        let n_test = ((shuffled.len() as f64) * test_fraction).round() as usize;
        let n_test = n_test.min(shuffled.len().saturating_sub(1));
        let train = shuffled.split_off(n_test);

        (
            ExampleSet { examples: train, num_classes: self.num_classes },
            ExampleSet { examples: shuffled, num_classes: self.num_classes },
        )
    }

    /// Look up every example's embedding.
    ///
    /// Returns `(features, targets)` with shapes `(n, dim)` (f32) and `(n,)`
    /// (u32).
    pub fn to_tensors(
        &self,
        embeddings: &EmbeddingMap,
        device: &Device,
    ) -> ClassifyResult<(Tensor, Tensor)> {
        if self.examples.is_empty() {
            return Err(ClassifyError::EmptyExampleSet);
        }

        let mut dim = None;
        let mut features = Vec::new();
        let mut targets = Vec::with_capacity(self.examples.len());

        for (term, class) in &self.examples {
            let embedding = embeddings
                .get(term)
                .ok_or_else(|| ClassifyError::MissingEmbedding(term.to_string()))?;
            let expected = *dim.get_or_insert(embedding.len());
            if embedding.len() != expected {
                return Err(ClassifyError::DimensionMismatch {
                    expected,
                    got: embedding.len(),
                });
            }
            features.extend(embedding.iter().copied());
            targets.push(*class);
        }

        let n = targets.len();
        let dim = dim.unwrap_or(0);
        let features = Tensor::from_vec(features, (n, dim), device)?;
        let targets = Tensor::from_vec(targets, n, device)?;
        Ok((features, targets))
    }
}

/// Read example IRIs, one per line.
///
/// IRIs may be wrapped in `<...>`. Blank lines and lines starting with `#`
/// are skipped.
pub fn read_example_file(path: &Path) -> ClassifyResult<Vec<RdfTerm>> {
    let reader = BufReader::new(File::open(path)?);
    let mut terms = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let iri = line
            .strip_prefix('<')
            .and_then(|l| l.strip_suffix('>'))
            .unwrap_or(line);
        let term = RdfTerm::iri(iri).map_err(|source| ClassifyError::InvalidExample {
            line: line_no + 1,
            source,
        })?;
        terms.push(term);
    }

    Ok(terms)
}
