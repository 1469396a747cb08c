pub mod check;
pub mod eval;
pub mod inspect;

use anyhow::{Context, Result};
use clap::ArgMatches;
use konf_lang::KonfError;

/// Program text plus a label for messages
pub struct Source {
    pub text: String,
    pub label: String,
}

/// Read the program from `--file` or `--content`; clap guarantees one is set.
pub fn read_source(matches: &ArgMatches) -> Result<Source> {
    if let Some(path) = matches.get_one::<String>("file") {
        let text =
            std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?;
        Ok(Source {
            text,
            label: path.clone(),
        })
    } else {
        let text = matches
            .get_one::<String>("content")
            .cloned()
            .unwrap_or_default();
        Ok(Source {
            text,
            label: "<inline>".to_string(),
        })
    }
}

/// Attach the error tag and input label to a language error
pub fn language_error(err: KonfError, label: &str) -> anyhow::Error {
    anyhow::anyhow!("{}: {} (in {})", err.kind(), err, label)
}
