//! Semantic tree for Konf programs
//!
//! The normalizer produces these nodes from the grammar-shaped parse tree.
//! Punctuation is gone; only the four node kinds remain.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceLocation {
    /// 1-based line
    pub line: usize,
    /// 1-based column, counted in characters
    pub column: usize,
    /// 0-based character offset from the start of the source
    pub offset: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Root of a normalized program: the top-level values in source order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    pub values: Vec<SemanticNode>,
}

impl Program {
    pub fn new(values: Vec<SemanticNode>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One node of the semantic tree.
///
/// The tree is acyclic: references name entries of the environment, never
/// other nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SemanticNode {
    /// Numeric literal
    Number(f64),
    /// Record entries in source order; duplicate keys are kept here
    Record(Vec<RecordEntry>),
    /// `set name = value`
    ConstDecl {
        name: String,
        value: Box<SemanticNode>,
    },
    /// `$[name]`, resolved against the environment at evaluation time
    Reference {
        name: String,
        location: SourceLocation,
    },
}

/// A single `name -> value` entry of a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordEntry {
    pub key: String,
    pub value: SemanticNode,
}

impl RecordEntry {
    pub fn new(key: impl Into<String>, value: SemanticNode) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

impl SemanticNode {
    pub fn const_decl(name: impl Into<String>, value: SemanticNode) -> Self {
        SemanticNode::ConstDecl {
            name: name.into(),
            value: Box::new(value),
        }
    }

    pub fn reference(name: impl Into<String>, location: SourceLocation) -> Self {
        SemanticNode::Reference {
            name: name.into(),
            location,
        }
    }

    /// Node kind name, used in logs and debugging output
    pub fn kind_name(&self) -> &'static str {
        match self {
            SemanticNode::Number(_) => "number",
            SemanticNode::Record(_) => "record",
            SemanticNode::ConstDecl { .. } => "const",
            SemanticNode::Reference { .. } => "reference",
        }
    }
}
