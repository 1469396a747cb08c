mod commands;
mod config;

use clap::{Arg, ArgAction, ArgGroup, ArgMatches, Command};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn with_source_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Konf source file to read"),
        )
        .arg(
            Arg::new("content")
                .short('c')
                .long("content")
                .value_name("CONTENT")
                .help("Konf source text given inline"),
        )
        .group(
            ArgGroup::new("source")
                .args(["file", "content"])
                .required(true),
        )
}

fn build_cli() -> Command {
    Command::new("konf")
        .version(VERSION)
        .about("Konf - declarative configuration language evaluator")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .global(true)
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .global(true)
                .help("Log level: error, warn, info, debug or trace"),
        )
        .subcommand(
            with_source_args(Command::new("eval").about("Evaluate a program and print it as JSON"))
                .arg(
                    Arg::new("pretty")
                        .long("pretty")
                        .action(ArgAction::SetTrue)
                        .help("Pretty-print the JSON output"),
                ),
        )
        .subcommand(with_source_args(
            Command::new("check").about("Parse and evaluate a program, reporting only errors"),
        ))
        .subcommand(with_source_args(
            Command::new("tokens").about("Print the token stream of a program"),
        ))
        .subcommand(with_source_args(
            Command::new("ast").about("Print the normalized syntax tree as JSON"),
        ))
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<CliConfig> {
    let mut cli_config = match matches.get_one::<String>("config") {
        Some(path) => CliConfig::from_file(path)?,
        None => CliConfig::default(),
    };

    if let Some(level) = matches.get_one::<String>("log-level") {
        config::validate_level(level)?;
        cli_config.logging.level = Some(level.clone());
    }

    Ok(cli_config)
}

/// Logs go to stderr so stdout carries only program output
fn init_logging(cli_config: &CliConfig) {
    let filter = match &cli_config.logging.level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn dispatch(matches: &ArgMatches, cli_config: &CliConfig) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("eval", sub_matches)) => {
            let source = commands::read_source(sub_matches)?;
            let pretty = sub_matches.get_flag("pretty") || cli_config.output.pretty;
            commands::eval::run(&source, pretty)
        }
        Some(("check", sub_matches)) => commands::check::run(&commands::read_source(sub_matches)?),
        Some(("tokens", sub_matches)) => {
            commands::inspect::tokens(&commands::read_source(sub_matches)?)
        }
        Some(("ast", sub_matches)) => commands::inspect::ast(&commands::read_source(sub_matches)?),
        _ => {
            println!("Konf v{}", VERSION);
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let matches = build_cli().get_matches();

    let cli_config = match load_config(&matches) {
        Ok(cli_config) => cli_config,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::from(2);
        }
    };
    init_logging(&cli_config);

    match dispatch(&matches, &cli_config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("Command failed: {:?}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
