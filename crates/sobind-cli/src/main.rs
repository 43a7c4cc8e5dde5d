//! Sobind CLI - load the `example` shared library and call into it
//!
//! This is the main entry point for the sobind CLI, the reference caller for
//! the library: it resolves the library at runtime, verifies its interface
//! descriptor, and runs the demonstration sequence or any single operation.

mod adapter;
mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;
#[cfg(test)]
mod test_support;

use cli::{Cli, Commands, OutputFormat};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    let config = match Config::load_with_file(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", error::format_error(&e, false));
            process::exit(e.exit_code());
        }
    };

    // Set up colored output
    let use_color = cli.use_color() && config.output.color;
    control::set_override(use_color);

    // Initialize logging
    if let Err(e) = init_logging(&cli, &config) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    // Run the application
    match run(cli, &config, use_color) {
        Ok(()) => process::exit(0),
        Err(e) => {
            tracing::debug!(error = ?e, "Command failed");
            eprintln!("{}", error::format_error(&e, use_color));
            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip(cli, config), fields(command = ?cli.command, session_id = logging::session_id()))]
fn run(cli: Cli, config: &Config, use_color: bool) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let format = cli
        .output
        .or_else(|| OutputFormat::from_config(&config.output.format))
        .unwrap_or(OutputFormat::Human);
    let mut output = OutputWriter::new(format, use_color, cli.quiet);

    tracing::info!(
        format = ?output.format(),
        verbosity = cli.verbosity_level(),
        "Executing command"
    );

    let library_flag = cli.library.as_deref();
    let open = || handlers::utils::open_library(library_flag, config);

    // Handle the subcommand
    match cli.command {
        Commands::Demo => handlers::handle_demo(&open()?, &mut output),
        Commands::Factorial(args) => handlers::handle_factorial(args, &open()?, &mut output),
        Commands::Greet(args) => handlers::handle_greet(args, &open()?, &mut output),
        Commands::Repeat(args) => handlers::handle_repeat(args, &open()?, &mut output),
        Commands::Shout(args) => handlers::handle_shout(args, &open()?, &mut output),
        Commands::Maybe(args) => handlers::handle_maybe(args, &open()?, &mut output),
        Commands::Sort(args) => handlers::handle_sort(args, &open()?, &mut output),
        Commands::Interface => handlers::handle_interface(library_flag, config, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    let verbosity = cli.verbosity_level();
    let mut logging_config = LoggingConfig::from_verbosity(verbosity);

    // File settings first, environment last
    logging_config.merge_with_file(&config.logging, verbosity);
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}
