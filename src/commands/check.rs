//! `konf check` subcommand: validate a program without printing its value.

use super::{language_error, Source};
use anyhow::Result;
use konf_lang::Environment;

pub fn run(source: &Source) -> Result<()> {
    let mut env = Environment::new();
    konf_lang::run_with_env(&source.text, &mut env).map_err(|e| language_error(e, &source.label))?;

    if env.is_empty() {
        println!("ok: {}", source.label);
    } else {
        let names: Vec<&str> = env.names().collect();
        println!("ok: {} (constants: {})", source.label, names.join(", "));
    }
    Ok(())
}
