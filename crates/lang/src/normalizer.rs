//! Parse tree to semantic tree conversion
//!
//! Purely structural: punctuation is dropped, numeric literals become `f64`,
//! and nothing is resolved.

use crate::ast::{Program, RecordEntry, SemanticNode};
use crate::error::{KonfError, Result};
use crate::parser::{DictNode, NumberLiteral, ParseTree, ValueNode};

/// Convert a parse tree into a semantic program
pub fn normalize(tree: &ParseTree) -> Result<Program> {
    let values = tree
        .values
        .iter()
        .map(normalize_value)
        .collect::<Result<Vec<_>>>()?;

    Ok(Program::new(values))
}

fn normalize_value(node: &ValueNode) -> Result<SemanticNode> {
    match node {
        ValueNode::Number(literal) => Ok(SemanticNode::Number(parse_number(literal)?)),
        ValueNode::Dict(dict) => normalize_dict(dict),
        ValueNode::Const(decl) => Ok(SemanticNode::const_decl(
            decl.name.name.clone(),
            normalize_value(&decl.value)?,
        )),
        ValueNode::Reference(reference) => Ok(SemanticNode::reference(
            reference.name.name.clone(),
            reference.open.location(),
        )),
    }
}

fn normalize_dict(dict: &DictNode) -> Result<SemanticNode> {
    let mut entries = Vec::with_capacity(dict.entries.len());
    for entry in &dict.entries {
        let value = normalize_value(&entry.assign.value)?;
        entries.push(RecordEntry::new(entry.assign.name.name.clone(), value));
    }
    Ok(SemanticNode::Record(entries))
}

/// Literals that do not parse, or that overflow to infinity, are rejected:
/// neither has a JSON representation.
fn parse_number(literal: &NumberLiteral) -> Result<f64> {
    match literal.text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => {
            let err = KonfError::NumberFormat {
                literal: literal.text.clone(),
                location: literal.location,
            };
            tracing::debug!("Normalization failed: {}", err);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::SourceLocation;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn normalize_source(input: &str) -> Result<Program> {
        let tokens = Lexer::new(input).tokenize()?;
        let tree = Parser::new(tokens).parse()?;
        normalize(&tree)
    }

    #[test]
    fn test_numbers_become_floats() {
        let program = normalize_source("5 -2.5 .25 1e3").unwrap();

        assert_eq!(
            program.values,
            vec![
                SemanticNode::Number(5.0),
                SemanticNode::Number(-2.5),
                SemanticNode::Number(0.25),
                SemanticNode::Number(1000.0),
            ]
        );
    }

    #[test]
    fn test_record_keeps_duplicates_in_order() {
        let program = normalize_source("{ A -> 1. B -> 2. A -> 3. }").unwrap();

        assert_eq!(
            program.values,
            vec![SemanticNode::Record(vec![
                RecordEntry::new("A", SemanticNode::Number(1.0)),
                RecordEntry::new("B", SemanticNode::Number(2.0)),
                RecordEntry::new("A", SemanticNode::Number(3.0)),
            ])]
        );
    }

    #[test]
    fn test_const_and_reference() {
        let program = normalize_source("set a = 5\n$[a]").unwrap();

        assert_eq!(
            program.values,
            vec![
                SemanticNode::const_decl("a", SemanticNode::Number(5.0)),
                SemanticNode::reference(
                    "a",
                    SourceLocation {
                        line: 2,
                        column: 1,
                        offset: 10
                    }
                ),
            ]
        );
    }

    #[test]
    fn test_malformed_exponent_rejected() {
        let err = normalize_source("{ A -> 1e. }").unwrap_err();

        assert_eq!(
            err,
            KonfError::NumberFormat {
                literal: "1e".to_string(),
                location: SourceLocation {
                    line: 1,
                    column: 8,
                    offset: 7
                },
            }
        );
    }

    #[test]
    fn test_overflowing_literal_rejected() {
        let err = normalize_source("1e999").unwrap_err();
        assert_eq!(err.kind(), "NumberFormatError");
    }

    #[test]
    fn test_no_resolution_happens_here() {
        // An undeclared reference is fine until evaluation
        let program = normalize_source("$[missing]").unwrap();
        assert_eq!(program.values[0].kind_name(), "reference");
    }
}
