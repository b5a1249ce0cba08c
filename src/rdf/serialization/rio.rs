//! rio-based parsers for Turtle, N-Triples and RDF/XML

use crate::rdf::{
    BlankNode, Literal, NamedNode, RdfGraph, RdfObject, RdfPredicate, RdfSubject, Triple,
};
use super::{ParseError, ParseResult, RdfFormat};
use oxiri::Iri;
use rio_api::model;
use rio_api::parser::TriplesParser;
use rio_turtle::{NTriplesParser, TurtleError, TurtleParser};
use rio_xml::{RdfXmlError, RdfXmlParser};
use std::io::BufRead;

impl From<TurtleError> for ParseError {
    fn from(e: TurtleError) -> Self {
        ParseError::Parse(e.to_string())
    }
}

impl From<RdfXmlError> for ParseError {
    fn from(e: RdfXmlError) -> Self {
        ParseError::Parse(e.to_string())
    }
}

/// Parse a document into a graph, keeping document order
pub(super) fn parse<R: BufRead>(
    reader: R,
    format: RdfFormat,
    base_iri: Option<&str>,
) -> ParseResult<RdfGraph> {
    let base = base_iri
        .map(|b| Iri::parse(b.to_string()).map_err(|e| ParseError::InvalidBaseIri(e.to_string())))
        .transpose()?;

    match format {
        RdfFormat::Turtle => collect(TurtleParser::new(reader, base)),
        RdfFormat::NTriples => collect(NTriplesParser::new(reader)),
        RdfFormat::RdfXml => collect(RdfXmlParser::new(reader, base)),
    }
}

fn collect<P>(mut parser: P) -> ParseResult<RdfGraph>
where
    P: TriplesParser,
    ParseError: From<P::Error>,
{
    let mut graph = RdfGraph::new();

    parser.parse_all(&mut |t| -> ParseResult<()> {
        graph.insert(convert_triple(t)?);
        Ok(())
    })?;

    Ok(graph)
}

fn convert_triple(t: model::Triple) -> ParseResult<Triple> {
    Ok(Triple::new(
        convert_subject(t.subject)?,
        convert_predicate(t.predicate)?,
        convert_object(t.object)?,
    ))
}

fn convert_subject(s: model::Subject) -> ParseResult<RdfSubject> {
    match s {
        model::Subject::NamedNode(n) => Ok(RdfSubject::NamedNode(convert_named_node(n)?)),
        model::Subject::BlankNode(b) => Ok(RdfSubject::BlankNode(convert_blank_node(b)?)),
        #[allow(unreachable_patterns)]
        _ => Err(ParseError::Parse("Unsupported subject type (RDF-star)".to_string())),
    }
}

fn convert_predicate(p: model::NamedNode) -> ParseResult<RdfPredicate> {
    Ok(RdfPredicate::from(convert_named_node(p)?))
}

fn convert_object(o: model::Term) -> ParseResult<RdfObject> {
    match o {
        model::Term::NamedNode(n) => Ok(RdfObject::NamedNode(convert_named_node(n)?)),
        model::Term::BlankNode(b) => Ok(RdfObject::BlankNode(convert_blank_node(b)?)),
        model::Term::Literal(l) => Ok(RdfObject::Literal(convert_literal(l)?)),
        #[allow(unreachable_patterns)]
        _ => Err(ParseError::Parse("Unsupported object type (RDF-star)".to_string())),
    }
}

fn convert_named_node(n: model::NamedNode) -> ParseResult<NamedNode> {
    NamedNode::new(n.iri).map_err(|e| ParseError::Parse(e.to_string()))
}

fn convert_blank_node(b: model::BlankNode) -> ParseResult<BlankNode> {
    BlankNode::from_id(b.id).map_err(|e| ParseError::Parse(e.to_string()))
}

fn convert_literal(l: model::Literal) -> ParseResult<Literal> {
    match l {
        model::Literal::Simple { value } => Ok(Literal::new_simple_literal(value)),
        model::Literal::LanguageTaggedString { value, language } => {
            Literal::new_language_tagged_literal(value, language)
                .map_err(|e| ParseError::Parse(e.to_string()))
        }
        model::Literal::Typed { value, datatype } => {
            let dt = convert_named_node(datatype)?;
            Ok(Literal::new_typed_literal(value, dt))
        }
    }
}
