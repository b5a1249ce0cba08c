//! RDF serialization formats
//!
//! Supports reading:
//! - Turtle (TTL)
//! - N-Triples (NT)
//! - RDF/XML

mod rio;

use super::RdfGraph;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// RDF serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    /// Turtle format (.ttl)
    Turtle,
    /// N-Triples format (.nt)
    NTriples,
    /// RDF/XML format (.rdf, .owl, .xml)
    RdfXml,
}

impl RdfFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "ttl" | "turtle" => Some(RdfFormat::Turtle),
            "nt" | "ntriples" => Some(RdfFormat::NTriples),
            "rdf" | "owl" | "xml" => Some(RdfFormat::RdfXml),
            _ => None,
        }
    }
}

impl std::str::FromStr for RdfFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "turtle" | "ttl" => Ok(RdfFormat::Turtle),
            "ntriples" | "n-triples" | "nt" => Ok(RdfFormat::NTriples),
            "rdfxml" | "rdf/xml" | "xml" => Ok(RdfFormat::RdfXml),
            other => Err(ParseError::UnknownFormat(other.to_string())),
        }
    }
}

/// Parse errors
#[derive(Error, Debug)]
pub enum ParseError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Base IRI could not be parsed
    #[error("Invalid base IRI: {0}")]
    InvalidBaseIri(String),

    /// Format could not be determined
    #[error("Unknown RDF format: {0}")]
    UnknownFormat(String),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// RDF parser
pub struct RdfParser;

impl RdfParser {
    /// Parse RDF data from a string
    pub fn parse(input: &str, format: RdfFormat, base_iri: Option<&str>) -> ParseResult<RdfGraph> {
        Self::parse_reader(Cursor::new(input), format, base_iri)
    }

    /// Parse RDF data from any buffered reader
    pub fn parse_reader<R: BufRead>(
        reader: R,
        format: RdfFormat,
        base_iri: Option<&str>,
    ) -> ParseResult<RdfGraph> {
        let graph = rio::parse(reader, format, base_iri)?;
        Ok(graph)
    }

    /// Parse RDF data from a file, guessing the format from the extension
    /// when none is given
    pub fn parse_file(
        path: &Path,
        format: Option<RdfFormat>,
        base_iri: Option<&str>,
    ) -> ParseResult<RdfGraph> {
        let format = match format {
            Some(f) => f,
            None => RdfFormat::from_path(path)
                .ok_or_else(|| ParseError::UnknownFormat(path.display().to_string()))?,
        };

        info!("Parsing {:?} as {:?}", path, format);
        let file = File::open(path)?;
        let graph = Self::parse_reader(BufReader::new(file), format, base_iri)?;
        info!("Loaded {} triples from {:?}", graph.len(), path);

        Ok(graph)
    }
}
