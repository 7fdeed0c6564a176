//! fiction-writer CLI binary
//!
//! Resolves writing settings for a workspace and renders front-matter metadata trees.

use clap::Parser;
use fiction_writer::cli::{map_error, Cli, RunContext};
use fiction_writer::config::FileSettings;
use fiction_writer::logging::{init_logging, LoggingConfig};
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli);

    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("fiction-writer starting");

    let context = match RunContext::new(cli.workspace.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error loading workspace settings: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            info!("Command completed successfully");
            println!("{}", output);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    }
}

/// Precedence: CLI flags over the `[logging]` settings table over defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = FileSettings::load(&cli.workspace)
        .ok()
        .and_then(|settings| settings.logging())
        .unwrap_or_default();

    if cli.quiet {
        config.enabled = false;
    }
    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = file.clone();
    } else if config.file.is_relative() {
        config.file = cli.workspace.join(&config.file);
    }

    config
}
