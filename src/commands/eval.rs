//! `konf eval` subcommand: evaluate a program and print its JSON form.

use super::{language_error, Source};
use anyhow::Result;
use konf_lang::serializer;

/// Run the evaluate-and-print command.
pub fn run(source: &Source, pretty: bool) -> Result<()> {
    let values = konf_lang::run(&source.text).map_err(|e| language_error(e, &source.label))?;
    tracing::info!("Evaluated {} top-level values from {}", values.len(), source.label);

    let output = if pretty {
        serializer::to_string_pretty(&values)
    } else {
        serializer::to_string(&values)
    };
    println!("{}", output);
    Ok(())
}
