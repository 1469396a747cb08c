//! Parser for Konf
//!
//! Recursive-descent matcher over the token stream. The result is a
//! grammar-shaped tree, one node per rule instance, with every punctuation
//! token still attached:
//!
//! ```text
//! start      := value+
//! value      := NUMBER | record | const-decl | reference
//! record     := '{' (assign '.')+ '}'
//! assign     := NAME '->' value
//! const-decl := 'set' NAME '=' value
//! reference  := '$[' NAME ']'
//! ```
//!
//! Each alternative of `value` starts with a distinct token, so one token of
//! lookahead decides every branch.

use crate::ast::SourceLocation;
use crate::error::{KonfError, Result};
use crate::lexer::{Token, TokenType};

/// `start` rule: the whole program
#[derive(Debug, Clone, PartialEq)]
pub struct ParseTree {
    pub values: Vec<ValueNode>,
    pub eof: Token,
}

/// `value` rule
#[derive(Debug, Clone, PartialEq)]
pub enum ValueNode {
    Number(NumberLiteral),
    Dict(DictNode),
    Const(ConstNode),
    Reference(ReferenceNode),
}

/// NUMBER token text with its position
#[derive(Debug, Clone, PartialEq)]
pub struct NumberLiteral {
    pub text: String,
    pub location: SourceLocation,
}

/// NAME token text with its position
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub location: SourceLocation,
}

/// `dict` rule: `'{' (assign '.')+ '}'`
#[derive(Debug, Clone, PartialEq)]
pub struct DictNode {
    pub open: Token,
    pub entries: Vec<AssignEntry>,
    pub close: Token,
}

/// One `assign '.'` repetition inside a dict
#[derive(Debug, Clone, PartialEq)]
pub struct AssignEntry {
    pub assign: AssignNode,
    pub terminator: Token,
}

/// `assign` rule: `NAME '->' value`
#[derive(Debug, Clone, PartialEq)]
pub struct AssignNode {
    pub name: Ident,
    pub arrow: Token,
    pub value: Box<ValueNode>,
}

/// `const` rule: `'set' NAME '=' value`
#[derive(Debug, Clone, PartialEq)]
pub struct ConstNode {
    pub keyword: Token,
    pub name: Ident,
    pub equals: Token,
    pub value: Box<ValueNode>,
}

/// `reference` rule: `'$[' NAME ']'`
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceNode {
    pub open: Token,
    pub name: Ident,
    pub close: Token,
}

const EXPECTED_VALUE: &str = "a value (number, '{', 'set' or '$[')";

/// Deepest allowed chain of nested values (records and declarations)
pub const MAX_DEPTH: usize = 256;

/// Parser for Konf
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    depth: usize,
}

impl Parser {
    /// Create a new parser with the given tokens.
    ///
    /// A trailing `Eof` token is appended when the stream lacks one.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(Token { token_type: TokenType::Eof, .. })) {
            let (line, column, offset) = tokens
                .last()
                .map(|t| (t.line, t.column + t.length, t.offset + t.length))
                .unwrap_or((1, 1, 0));
            tokens.push(Token {
                token_type: TokenType::Eof,
                line,
                column,
                offset,
                length: 0,
            });
        }

        Self {
            tokens,
            current: 0,
            depth: 0,
        }
    }

    /// Parse the tokens into a parse tree rooted at `start`
    pub fn parse(&mut self) -> Result<ParseTree> {
        let mut values = vec![self.parse_value()?];

        while !self.is_at_end() {
            values.push(self.parse_value()?);
        }

        tracing::debug!("Parsed {} top-level values", values.len());

        Ok(ParseTree {
            values,
            eof: self.peek().clone(),
        })
    }

    /// Every nested value passes through here, which bounds the recursion of
    /// the parser and of the tree walks after it.
    fn parse_value(&mut self) -> Result<ValueNode> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error_at_current(&format!("nesting depth at most {}", MAX_DEPTH)));
        }

        self.depth += 1;
        let value = self.parse_value_at_depth();
        self.depth -= 1;
        value
    }

    fn parse_value_at_depth(&mut self) -> Result<ValueNode> {
        match &self.peek().token_type {
            TokenType::Number(text) => {
                let literal = NumberLiteral {
                    text: text.clone(),
                    location: self.peek().location(),
                };
                self.advance();
                Ok(ValueNode::Number(literal))
            }
            TokenType::LeftBrace => Ok(ValueNode::Dict(self.parse_dict()?)),
            TokenType::Set => Ok(ValueNode::Const(self.parse_const()?)),
            TokenType::ReferenceOpen => Ok(ValueNode::Reference(self.parse_reference()?)),
            _ => Err(self.error_at_current(EXPECTED_VALUE)),
        }
    }

    fn parse_dict(&mut self) -> Result<DictNode> {
        let open = self.consume_token(TokenType::LeftBrace, "'{'")?;
        let mut entries = Vec::new();

        loop {
            let assign = self.parse_assign()?;
            let terminator = self.consume_token(TokenType::Dot, "'.' after record entry")?;
            entries.push(AssignEntry { assign, terminator });

            if self.check_token(&TokenType::RightBrace) {
                break;
            }
            if !matches!(self.peek().token_type, TokenType::Name(_)) {
                return Err(self.error_at_current("a name or '}'"));
            }
        }

        let close = self.consume_token(TokenType::RightBrace, "'}'")?;

        Ok(DictNode {
            open,
            entries,
            close,
        })
    }

    fn parse_assign(&mut self) -> Result<AssignNode> {
        let name = self.consume_name("a record key")?;
        let arrow = self.consume_token(TokenType::Arrow, "'->' after record key")?;
        let value = Box::new(self.parse_value()?);

        Ok(AssignNode { name, arrow, value })
    }

    fn parse_const(&mut self) -> Result<ConstNode> {
        let keyword = self.consume_token(TokenType::Set, "'set'")?;
        let name = self.consume_name("a constant name after 'set'")?;
        let equals = self.consume_token(TokenType::Assign, "'=' after constant name")?;
        let value = Box::new(self.parse_value()?);

        Ok(ConstNode {
            keyword,
            name,
            equals,
            value,
        })
    }

    fn parse_reference(&mut self) -> Result<ReferenceNode> {
        let open = self.consume_token(TokenType::ReferenceOpen, "'$['")?;
        let name = self.consume_name("a constant name after '$['")?;
        let close = self.consume_token(TokenType::RightBracket, "']' after reference")?;

        Ok(ReferenceNode { open, name, close })
    }

    fn consume_name(&mut self, expected: &str) -> Result<Ident> {
        if let TokenType::Name(name) = &self.peek().token_type {
            let ident = Ident {
                name: name.clone(),
                location: self.peek().location(),
            };
            self.advance();
            Ok(ident)
        } else {
            Err(self.error_at_current(expected))
        }
    }

    fn consume_token(&mut self, expected: TokenType, description: &str) -> Result<Token> {
        if self.check_token(&expected) {
            Ok(self.advance())
        } else {
            Err(self.error_at_current(description))
        }
    }

    fn check_token(&self, token_type: &TokenType) -> bool {
        std::mem::discriminant(&self.peek().token_type) == std::mem::discriminant(token_type)
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek().token_type, TokenType::Eof)
    }

    fn peek(&self) -> &Token {
        // `new` guarantees a final Eof token and `advance` never moves past it
        &self.tokens[self.current]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn error_at_current(&self, expected: &str) -> KonfError {
        let token = self.peek();
        let err = KonfError::Syntax {
            expected: expected.to_string(),
            found: token.token_type.to_string(),
            location: token.location(),
        };
        tracing::debug!("Parsing failed: {}", err);
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse_source(input: &str) -> Result<ParseTree> {
        let tokens = Lexer::new(input).tokenize()?;
        Parser::new(tokens).parse()
    }

    #[test]
    fn test_sequence_of_values() {
        let tree = parse_source("5 set a = 1 $[a] { K -> 2. }").unwrap();

        assert_eq!(tree.values.len(), 4);
        assert!(matches!(tree.values[0], ValueNode::Number(_)));
        assert!(matches!(tree.values[1], ValueNode::Const(_)));
        assert!(matches!(tree.values[2], ValueNode::Reference(_)));
        assert!(matches!(tree.values[3], ValueNode::Dict(_)));
    }

    #[test]
    fn test_dict_keeps_punctuation_and_order() {
        let tree = parse_source("{ A -> 1. B -> 2. A -> 3. }").unwrap();

        let ValueNode::Dict(dict) = &tree.values[0] else {
            panic!("Expected dict node");
        };
        let keys: Vec<&str> = dict
            .entries
            .iter()
            .map(|e| e.assign.name.name.as_str())
            .collect();
        assert_eq!(keys, vec!["A", "B", "A"]);
        assert_eq!(dict.open.token_type, TokenType::LeftBrace);
        assert_eq!(dict.close.token_type, TokenType::RightBrace);
        assert!(dict
            .entries
            .iter()
            .all(|e| e.terminator.token_type == TokenType::Dot));
    }

    #[test]
    fn test_nested_const_inside_dict() {
        let tree = parse_source("{ A -> set b = { C -> $[b]. }. }").unwrap();

        let ValueNode::Dict(dict) = &tree.values[0] else {
            panic!("Expected dict node");
        };
        let ValueNode::Const(decl) = dict.entries[0].assign.value.as_ref() else {
            panic!("Expected const node");
        };
        assert_eq!(decl.name.name, "b");
        assert!(matches!(decl.value.as_ref(), ValueNode::Dict(_)));
    }

    #[test]
    fn test_empty_dict_is_syntax_error() {
        let err = parse_source("{}").unwrap_err();

        assert_eq!(err.kind(), "SyntaxError");
        match err {
            KonfError::Syntax {
                expected, found, ..
            } => {
                assert_eq!(expected, "a record key");
                assert_eq!(found, "'}'");
            }
            other => panic!("Expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_terminator() {
        let err = parse_source("{ A -> 1 }").unwrap_err();

        assert_eq!(
            err,
            KonfError::Syntax {
                expected: "'.' after record entry".to_string(),
                found: "'}'".to_string(),
                location: SourceLocation {
                    line: 1,
                    column: 10,
                    offset: 9
                },
            }
        );
    }

    #[test]
    fn test_unclosed_dict() {
        let err = parse_source("{ A -> 1.").unwrap_err();
        match err {
            KonfError::Syntax { expected, found, .. } => {
                assert_eq!(expected, "a name or '}'");
                assert_eq!(found, "end of input");
            }
            other => panic!("Expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_program_is_syntax_error() {
        let err = parse_source("# only a comment\n").unwrap_err();
        assert_eq!(err.kind(), "SyntaxError");
    }

    #[test]
    fn test_bare_name_is_not_a_value() {
        let err = parse_source("5 a").unwrap_err();
        match err {
            KonfError::Syntax { found, location, .. } => {
                assert_eq!(found, "name 'a'");
                assert_eq!(location.column, 3);
            }
            other => panic!("Expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_set_cannot_be_a_key() {
        assert!(parse_source("{ set -> 1. }").is_err());
    }

    #[test]
    fn test_reference_requires_closing_bracket() {
        let err = parse_source("$[a").unwrap_err();
        match err {
            KonfError::Syntax { expected, .. } => assert_eq!(expected, "']' after reference"),
            other => panic!("Expected syntax error, got {:?}", other),
        }
    }

    fn nested_records(depth: usize) -> String {
        let mut source = String::new();
        for _ in 0..depth {
            source.push_str("{ A -> ");
        }
        source.push('1');
        for _ in 0..depth {
            source.push_str(". }");
        }
        source
    }

    fn const_chain(length: usize) -> String {
        let mut source: String = (0..length).map(|i| format!("set a{} = ", i)).collect();
        source.push('1');
        source
    }

    #[test]
    fn test_nesting_up_to_limit_is_accepted() {
        // The innermost number is the last of MAX_DEPTH nested values
        assert!(parse_source(&nested_records(MAX_DEPTH - 1)).is_ok());
        assert!(parse_source(&const_chain(MAX_DEPTH - 1)).is_ok());
    }

    #[test]
    fn test_deep_records_rejected() {
        let err = parse_source(&nested_records(100_000)).unwrap_err();

        match err {
            KonfError::Syntax { expected, found, location } => {
                assert_eq!(expected, "nesting depth at most 256");
                assert_eq!(found, "'{'");
                assert_eq!(location.offset, MAX_DEPTH * "{ A -> ".len());
            }
            other => panic!("Expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_deep_const_chain_rejected() {
        let err = parse_source(&const_chain(3_000)).unwrap_err();

        match err {
            KonfError::Syntax { expected, found, .. } => {
                assert_eq!(expected, "nesting depth at most 256");
                assert_eq!(found, "'set'");
            }
            other => panic!("Expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_depth_resets_between_top_level_values() {
        let source = format!("{} {}", const_chain(MAX_DEPTH - 1), nested_records(MAX_DEPTH - 1));
        let tree = parse_source(&source).unwrap();
        assert_eq!(tree.values.len(), 2);
    }

    #[test]
    fn test_parser_appends_missing_eof() {
        let mut tokens = Lexer::new("7").tokenize().unwrap();
        tokens.pop();

        let tree = Parser::new(tokens).parse().unwrap();
        assert_eq!(tree.values.len(), 1);
        assert_eq!(tree.eof.token_type, TokenType::Eof);
    }
}
