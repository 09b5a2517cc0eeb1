// server/src/cli/cli.rs

// Entry point for the suvera CLI: parses arguments, loads configuration and
// dispatches to the command handlers.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use log::debug;
use std::process::exit;

use lib::config::load_config;
use lib::TriageError;

use crate::cli::commands::{CliArgs, SuveraCommands};
use crate::cli::handlers;

pub async fn start_cli() -> Result<()> {
    let args = CliArgs::parse();
    debug!("Parsed CLI arguments: {:?}", args);

    let config = load_config(args.config.as_deref())?;

    let result = match args.command {
        SuveraCommands::Triage(triage) => handlers::handle_triage(triage, &config).await,
        SuveraCommands::Sos(sos) => handlers::handle_sos(sos, &config).await,
        SuveraCommands::Discover(discover) => handlers::handle_discover(discover, &config).await,
        SuveraCommands::Request(request) => handlers::handle_request(request, &config).await,
        SuveraCommands::Hospital { action } => handlers::handle_hospital(action, &config).await,
        SuveraCommands::Analyzer { action } => handlers::handle_analyzer(action, &config).await,
    };

    if let Err(err) = result {
        debug!("Command failed: {:?}", err);
        match err.downcast_ref::<TriageError>() {
            Some(triage_err) => eprintln!("{}", triage_err.user_message().red().bold()),
            None => eprintln!("{}", format!("Error: {:#}", err).red()),
        }
        exit(1);
    }
    Ok(())
}
