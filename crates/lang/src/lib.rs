//! Konf language core
//!
//! A small declarative configuration language. Source text flows through
//! the lexer, the parser, the normalizer and the evaluator, and comes out
//! as a fully resolved value tree with a canonical JSON form:
//!
//! ```text
//! text -> tokens -> parse tree -> semantic tree -> values -> JSON
//! ```
//!
//! ```
//! let json = konf_lang::run_to_json("set a = 5 { A -> $[a]. }").unwrap();
//! assert_eq!(json, r#"[["a",5.0],{"A":5.0}]"#);
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod normalizer;
pub mod parser;
pub mod serializer;


pub use ast::{Program, RecordEntry, SemanticNode, SourceLocation};
pub use error::{KonfError, Result};
pub use evaluator::{Environment, Evaluator, Value};
pub use lexer::{Lexer, Token, TokenType};
pub use parser::{ParseTree, Parser};

/// Tokenize source text
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    Lexer::new(source).tokenize()
}

/// Lex, parse and normalize source text into a semantic program
pub fn parse(source: &str) -> Result<Program> {
    let tokens = tokenize(source)?;
    let tree = Parser::new(tokens).parse()?;
    normalizer::normalize(&tree)
}

/// Evaluate a program against a caller-supplied environment
pub fn evaluate(program: &Program, env: &mut Environment) -> Result<Vec<Value>> {
    evaluator::evaluate(program, env)
}

/// Parse and evaluate `source` against `env`, leaving the bindings in place
pub fn run_with_env(source: &str, env: &mut Environment) -> Result<Vec<Value>> {
    let program = parse(source)?;
    evaluate(&program, env)
}

/// Parse and evaluate `source` in a fresh environment
pub fn run(source: &str) -> Result<Vec<Value>> {
    run_with_env(source, &mut Environment::new())
}

/// Parse, evaluate and serialize `source` to compact JSON
pub fn run_to_json(source: &str) -> Result<String> {
    run(source).map(|values| serializer::to_string(&values))
}
