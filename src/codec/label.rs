//! Term labels
//!
//! The plain-text token for one RDF term in the triplet corpus:
//!
//! | Term       | Label             |
//! |------------|-------------------|
//! | IRI        | `{ns_id}_{local}` |
//! | Literal    | `lit_{value}`     |
//! | Blank node | `bnode_{id}`      |
//!
//! Namespace ids always start with `ns`, so the `lit_` and `bnode_`
//! prefixes cannot collide with IRI labels. Values are not escaped; a tab
//! or newline inside a literal breaks the line format.

use super::{CodecError, CodecResult};
use std::fmt;
use std::str::FromStr;

const LITERAL_PREFIX: &str = "lit_";
const BLANK_NODE_PREFIX: &str = "bnode_";

/// Tagged term label
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TermLabel {
    /// Namespace-compressed IRI
    Iri {
        /// Namespace id from the namespace table
        namespace_id: String,
        /// Local part after the namespace
        local: String,
    },
    /// Lexical value of a literal
    Literal(String),
    /// Blank node identifier
    BlankNode(String),
}

impl TermLabel {
    /// True if the rendered label would break the tab-separated line format
    pub fn has_line_delimiters(&self) -> bool {
        let text = match self {
            TermLabel::Iri { local, .. } => local,
            TermLabel::Literal(value) => value,
            TermLabel::BlankNode(id) => id,
        };
        text.contains(['\t', '\n', '\r'])
    }
}

impl fmt::Display for TermLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermLabel::Iri { namespace_id, local } => write!(f, "{}_{}", namespace_id, local),
            TermLabel::Literal(value) => write!(f, "{}{}", LITERAL_PREFIX, value),
            TermLabel::BlankNode(id) => write!(f, "{}{}", BLANK_NODE_PREFIX, id),
        }
    }
}

impl FromStr for TermLabel {
    type Err = CodecError;

    fn from_str(s: &str) -> CodecResult<Self> {
        if let Some(value) = s.strip_prefix(LITERAL_PREFIX) {
            return Ok(TermLabel::Literal(value.to_string()));
        }
        if let Some(id) = s.strip_prefix(BLANK_NODE_PREFIX) {
            return Ok(TermLabel::BlankNode(id.to_string()));
        }
        let (namespace_id, local) = s
            .split_once('_')
            .ok_or_else(|| CodecError::MalformedLabel(s.to_string()))?;
        Ok(TermLabel::Iri {
            namespace_id: namespace_id.to_string(),
            local: local.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let iri = TermLabel::Iri {
            namespace_id: "ns1".to_string(),
            local: "Person".to_string(),
        };
        assert_eq!(iri.to_string(), "ns1_Person");
        assert_eq!(TermLabel::Literal("hello".to_string()).to_string(), "lit_hello");
        assert_eq!(TermLabel::BlankNode("b0".to_string()).to_string(), "bnode_b0");
    }

    #[test]
    fn test_parse_variants() {
        assert_eq!(
            "lit_hello_world".parse::<TermLabel>().unwrap(),
            TermLabel::Literal("hello_world".to_string())
        );
        assert_eq!(
            "bnode_genid_1".parse::<TermLabel>().unwrap(),
            TermLabel::BlankNode("genid_1".to_string())
        );
        // IRI labels split at the first underscore only
        assert_eq!(
            "ns12_has_part".parse::<TermLabel>().unwrap(),
            TermLabel::Iri {
                namespace_id: "ns12".to_string(),
                local: "has_part".to_string(),
            }
        );
        assert_eq!("lit_".parse::<TermLabel>().unwrap(), TermLabel::Literal(String::new()));
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            "nounderscore".parse::<TermLabel>(),
            Err(CodecError::MalformedLabel(_))
        ));
    }

    #[test]
    fn test_line_delimiters() {
        assert!(TermLabel::Literal("a\tb".to_string()).has_line_delimiters());
        assert!(TermLabel::Literal("line\nbreak".to_string()).has_line_delimiters());
        assert!(!TermLabel::Literal("a_b".to_string()).has_line_delimiters());
    }
}
