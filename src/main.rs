use clap::Parser;
use std::io::{self, IsTerminal};
use tracker_rust::cli::commands;
use tracker_rust::cli::{Cli, Commands};
use tracker_rust::config::CliOverrides;
use tracker_rust::logging::init_logging;
use tracker_rust::{StructuredError, TrackerError};

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    if let Err(e) = init_logging(cli.verbose, cli.quiet) {
        eprintln!("Failed to initialize logging: {e}");
        // Don't exit, just continue without logging
    }

    let overrides = CliOverrides { db: cli.db.clone() };

    let result = match cli.command {
        Commands::Init { force } => commands::init::execute(force, None),
        Commands::Create(args) => commands::create::execute(&args, cli.json, &overrides),
        Commands::Update(args) => commands::update::execute(&args, cli.json, &overrides),
        Commands::List(args) => commands::list::execute(&args, cli.json, &overrides),
        Commands::Tag { command } => commands::tag::execute(&command, cli.json, &overrides),
        Commands::Suggest { text } => commands::suggest::execute(&text, cli.json, &overrides),
        Commands::Awards => commands::awards::execute(cli.json, &overrides),
        Commands::Count(args) => commands::count::execute(&args, cli.json, &overrides),
        Commands::Delete(args) => commands::delete::execute(&args, cli.json, &overrides),
        Commands::Flush => commands::flush::execute(cli.json, &overrides),
        Commands::Sample(args) => commands::sample::execute(&args, cli.json, &overrides),
    };

    if let Err(e) = result {
        handle_error(&e, cli.json);
    }
}

/// Handle errors with structured output support.
///
/// When --json is set or stdout is not a TTY, outputs structured JSON to
/// stderr. Otherwise, outputs a human-readable error with a hint when one
/// is known.
fn handle_error(err: &TrackerError, json_mode: bool) -> ! {
    let structured = StructuredError::from_error(err);
    let exit_code = err.exit_code();

    let use_json = json_mode || !io::stdout().is_terminal();

    if use_json {
        let json = serde_json::to_string_pretty(&structured)
            .unwrap_or_else(|_| format!("{{\"message\":\"{}\"}}", structured.message));
        eprintln!("{json}");
    } else {
        eprintln!("{}", structured.to_human());
    }

    std::process::exit(exit_code);
}
