//! `konf tokens` and `konf ast` subcommands for looking inside the pipeline.

use super::{language_error, Source};
use anyhow::{Context, Result};
use konf_lang::TokenType;

/// Print one token per line as `line:column KIND lexeme`.
pub fn tokens(source: &Source) -> Result<()> {
    let tokens = konf_lang::tokenize(&source.text).map_err(|e| language_error(e, &source.label))?;

    for token in &tokens {
        if matches!(token.token_type, TokenType::Eof) {
            println!("{}:{} {}", token.line, token.column, token.token_type.kind_name());
        } else {
            println!(
                "{}:{} {} {}",
                token.line,
                token.column,
                token.token_type.kind_name(),
                token.lexeme()
            );
        }
    }
    Ok(())
}

/// Print the normalized semantic tree as JSON.
pub fn ast(source: &Source) -> Result<()> {
    let program = konf_lang::parse(&source.text).map_err(|e| language_error(e, &source.label))?;
    let json = serde_json::to_string_pretty(&program).context("failed to serialize syntax tree")?;
    println!("{}", json);
    Ok(())
}
