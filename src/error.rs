//! Crate-level error type

use crate::classify::ClassifyError;
use crate::codec::CodecError;
use crate::config::ConfigError;
use crate::embedding::EmbeddingError;
use crate::rdf::{ParseError, RdfError};
use thiserror::Error;

/// Any error raised by the library
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Rdf(#[from] RdfError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Classify(#[from] ClassifyError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Error tied to one input file
    #[error("{path}: {source}")]
    File {
        path: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attach the path of the file being processed
    pub fn in_file(self, path: &std::path::Path) -> Self {
        Error::File {
            path: path.display().to_string(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
