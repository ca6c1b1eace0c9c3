//! Benchline CLI - schema-driven testing of LLM-backed endpoints
//!
//! This is the main entry point for the Benchline CLI application, providing
//! commands for generating sample inputs, validating inputs against schemas
//! and running endpoint tests against recorded fixtures.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;
use tracing_appender::non_blocking::WorkerGuard;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    control::set_override(cli.use_color());

    // Configuration is loaded before logging so its [logging] section applies;
    // a load error is reported once logging is up.
    let config = Config::load_with_file(cli.config.as_deref());

    let log_guard = match init_logging(&cli, config.as_ref().ok()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            None
        }
    };

    let code = match run(cli, config).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{}", error::format_error(&e, control::SHOULD_COLORIZE.should_colorize()));

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            e.exit_code()
        }
    };

    // Flush buffered log lines before exiting
    drop(log_guard);
    process::exit(code);
}

/// Main application logic
#[instrument(skip(cli, config), fields(command = ?cli.command))]
async fn run(cli: Cli, config: Result<Config>) -> Result<()> {
    let _timer = Timer::new("cli_execution");
    let config = config?;

    let use_color = cli.use_color() && config.output.color;
    control::set_override(use_color);

    let mut output = OutputWriter::new(cli.output, use_color, cli.quiet)
        .with_redaction(config.output.redact)
        .with_progress(config.output.progress);

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        request_id = logging::current_request_id().unwrap_or("unknown"),
        "Executing command"
    );

    match cli.command {
        Commands::Sample(args) => handlers::handle_sample(args, &mut output).await,
        Commands::Validate(args) => handlers::handle_validate(args, &mut output).await,
        Commands::Test(args) => handlers::handle_test(args, &config, &mut output).await,
        Commands::Config(args) => handlers::handle_config(args, &config, &mut output).await,
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: Option<&Config>) -> Result<Option<WorkerGuard>> {
    let verbosity = cli.verbosity_level();
    let mut logging_config = LoggingConfig::from_verbosity(verbosity);

    if let Some(config) = config {
        logging_config.merge_with_settings(&config.logging, verbosity);
    }
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["benchline", "sample", "schema.json"]);
        assert_eq!(cli.verbosity_level(), 0);

        let cli = Cli::parse_from(["benchline", "-vv", "validate", "input.json", "-s", "schema.json"]);
        assert_eq!(cli.verbosity_level(), 2);

        let cli = Cli::parse_from(["benchline", "--quiet", "test", "endpoint.yaml"]);
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[tokio::test]
    async fn test_run_reports_config_errors() {
        let cli = Cli::parse_from(["benchline", "config", "path"]);
        let err = run(cli, Err(error::Error::config("bad file"))).await.unwrap_err();
        assert_eq!(err.exit_code(), 5);
    }
}
