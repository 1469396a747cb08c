//! Lexer for Konf
//!
//! Converts raw text input into a stream of tokens for parsing.
//! Whitespace and `#` line comments are skipped and never produce tokens.

use crate::ast::SourceLocation;
use crate::error::{KonfError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token types recognized by the lexer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenType {
    /// Numeric literal, kept as source text until normalization
    Number(String),
    Name(String),

    // Keywords
    Set,

    // Punctuation
    Arrow,
    Dot,
    LeftBrace,
    RightBrace,
    ReferenceOpen,
    RightBracket,
    Assign,

    Eof,
}

impl TokenType {
    /// Short name used by `konf tokens`
    pub fn kind_name(&self) -> &'static str {
        match self {
            TokenType::Number(_) => "NUMBER",
            TokenType::Name(_) => "NAME",
            TokenType::Set => "SET",
            TokenType::Arrow => "ARROW",
            TokenType::Dot => "DOT",
            TokenType::LeftBrace => "LBRACE",
            TokenType::RightBrace => "RBRACE",
            TokenType::ReferenceOpen => "REF_OPEN",
            TokenType::RightBracket => "RBRACKET",
            TokenType::Assign => "ASSIGN",
            TokenType::Eof => "EOF",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Number(text) => write!(f, "number '{}'", text),
            TokenType::Name(name) => write!(f, "name '{}'", name),
            TokenType::Set => write!(f, "'set'"),
            TokenType::Arrow => write!(f, "'->'"),
            TokenType::Dot => write!(f, "'.'"),
            TokenType::LeftBrace => write!(f, "'{{'"),
            TokenType::RightBrace => write!(f, "'}}'"),
            TokenType::ReferenceOpen => write!(f, "'$['"),
            TokenType::RightBracket => write!(f, "']'"),
            TokenType::Assign => write!(f, "'='"),
            TokenType::Eof => write!(f, "end of input"),
        }
    }
}

/// Token with location information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub token_type: TokenType,
    pub line: usize,
    pub column: usize,
    pub offset: usize,
    pub length: usize,
}

impl Token {
    pub fn location(&self) -> SourceLocation {
        SourceLocation {
            line: self.line,
            column: self.column,
            offset: self.offset,
        }
    }

    /// Source text of the token
    pub fn lexeme(&self) -> String {
        match &self.token_type {
            TokenType::Number(text) | TokenType::Name(text) => text.clone(),
            TokenType::Set => "set".to_string(),
            TokenType::Arrow => "->".to_string(),
            TokenType::Dot => ".".to_string(),
            TokenType::LeftBrace => "{".to_string(),
            TokenType::RightBrace => "}".to_string(),
            TokenType::ReferenceOpen => "$[".to_string(),
            TokenType::RightBracket => "]".to_string(),
            TokenType::Assign => "=".to_string(),
            TokenType::Eof => String::new(),
        }
    }
}

/// Lexer for Konf source text
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given input
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input. The last token is always `Eof`.
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.token_type, TokenType::Eof);
            tokens.push(token);

            if is_eof {
                break;
            }
        }

        tracing::debug!("Lexed {} tokens", tokens.len());
        Ok(tokens)
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_trivia();

        let start_line = self.line;
        let start_column = self.column;
        let start_offset = self.position;

        let ch = match self.current_char_opt() {
            Some(ch) => ch,
            None => {
                return Ok(Token {
                    token_type: TokenType::Eof,
                    line: start_line,
                    column: start_column,
                    offset: start_offset,
                    length: 0,
                })
            }
        };

        let token_type = match ch {
            c if c.is_ascii_digit() => self.read_number(),
            '.' if self.peek_is_digit(1) => self.read_number(),
            '-' if self.peek_char() == Some('>') => {
                self.advance(); // -
                self.advance(); // >
                TokenType::Arrow
            }
            '-' if self.peek_is_digit(1) || (self.peek_char() == Some('.') && self.peek_is_digit(2)) => {
                self.read_number()
            }
            c if c.is_ascii_alphabetic() => {
                let identifier = self.read_identifier();
                if identifier == "set" {
                    TokenType::Set
                } else {
                    TokenType::Name(identifier)
                }
            }
            '$' if self.peek_char() == Some('[') => {
                self.advance(); // $
                self.advance(); // [
                TokenType::ReferenceOpen
            }
            '.' => { self.advance(); TokenType::Dot }
            '{' => { self.advance(); TokenType::LeftBrace }
            '}' => { self.advance(); TokenType::RightBrace }
            ']' => { self.advance(); TokenType::RightBracket }
            '=' => { self.advance(); TokenType::Assign }
            _ => {
                let err = KonfError::Lex {
                    found: ch,
                    location: SourceLocation {
                        line: start_line,
                        column: start_column,
                        offset: start_offset,
                    },
                };
                tracing::debug!("Lexing failed: {}", err);
                return Err(err);
            }
        };

        Ok(Token {
            token_type,
            line: start_line,
            column: start_column,
            offset: start_offset,
            length: self.position - start_offset,
        })
    }

    /// Skip whitespace and `#` comments
    fn skip_trivia(&mut self) {
        while let Some(ch) = self.current_char_opt() {
            if ch.is_whitespace() {
                self.advance();
            } else if ch == '#' {
                while let Some(c) = self.current_char_opt() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    /// Read a numeric literal: `-?(digits)?(.digits)?([eE][+-]?digits)?`.
    ///
    /// An exponent marker is consumed even without digits after it, so the
    /// malformed literal reaches the normalizer intact and is rejected there.
    fn read_number(&mut self) -> TokenType {
        let mut number_str = String::new();

        if self.current_char_opt() == Some('-') {
            number_str.push('-');
            self.advance();
        }

        self.read_digits(&mut number_str);

        if self.current_char_opt() == Some('.') && self.peek_is_digit(1) {
            number_str.push('.');
            self.advance();
            self.read_digits(&mut number_str);
        }

        if let Some(marker @ ('e' | 'E')) = self.current_char_opt() {
            number_str.push(marker);
            self.advance();
            if let Some(sign @ ('+' | '-')) = self.current_char_opt() {
                number_str.push(sign);
                self.advance();
            }
            self.read_digits(&mut number_str);
        }

        TokenType::Number(number_str)
    }

    fn read_digits(&mut self, out: &mut String) {
        while let Some(ch) = self.current_char_opt() {
            if ch.is_ascii_digit() {
                out.push(ch);
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Read an identifier: ASCII letter followed by ASCII letters or digits
    fn read_identifier(&mut self) -> String {
        let mut identifier = String::new();

        while let Some(ch) = self.current_char_opt() {
            if ch.is_ascii_alphanumeric() {
                identifier.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        identifier
    }

    fn current_char_opt(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn peek_is_digit(&self, distance: usize) -> bool {
        self.input
            .get(self.position + distance)
            .is_some_and(|c| c.is_ascii_digit())
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char_opt() {
            self.position += 1;
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }
}
