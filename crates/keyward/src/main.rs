// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyward - a local, single-user password manager.
//!
//! This is the binary entry point.

mod shell;
mod status;

use std::path::PathBuf;

use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use colored::Colorize;
use keyward_config::model::KeywardConfig;
use keyward_config::validation::MAX_GENERATOR_LENGTH;
use keyward_core::KeywardError;
use keyward_vault::GeneratorOptions;

/// Keyward - a local, single-user password manager.
#[derive(Parser, Debug)]
#[command(name = "keyward", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign up or log in, then manage credentials interactively (default).
    Shell,
    /// Print a random password.
    Generate {
        /// Number of characters (defaults to generator.length).
        #[arg(
            short,
            long,
            value_parser = RangedU64ValueParser::<usize>::new().range(0..=MAX_GENERATOR_LENGTH as u64)
        )]
        length: Option<usize>,
        /// Leave out digits.
        #[arg(long)]
        no_numbers: bool,
        /// Leave out symbols.
        #[arg(long)]
        no_symbols: bool,
        /// Leave out uppercase letters.
        #[arg(long)]
        no_uppercase: bool,
    },
    /// Show storage paths and account state.
    Status {
        /// Output machine-readable JSON.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => keyward_config::load_and_validate_path(path),
        None => keyward_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            keyward_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.app.log_level);

    let result = match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => shell::run_shell(config),
        Commands::Generate {
            length,
            no_numbers,
            no_symbols,
            no_uppercase,
        } => {
            let options = generator_options(&config, length, no_numbers, no_symbols, no_uppercase);
            println!("{}", options.generate());
            Ok(())
        }
        Commands::Status { json, plain } => status::run_status(&config, json, plain),
        Commands::Config => print_config(&config),
    };

    if let Err(e) = result {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

/// Merge `generate` flags over the configured generator defaults.
fn generator_options(
    config: &KeywardConfig,
    length: Option<usize>,
    no_numbers: bool,
    no_symbols: bool,
    no_uppercase: bool,
) -> GeneratorOptions {
    let defaults = GeneratorOptions::from(&config.generator);
    GeneratorOptions {
        length: length.unwrap_or(defaults.length),
        numbers: defaults.numbers && !no_numbers,
        symbols: defaults.symbols && !no_symbols,
        uppercase: defaults.uppercase && !no_uppercase,
    }
}

fn print_config(config: &KeywardConfig) -> Result<(), KeywardError> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| KeywardError::Internal(format!("failed to render config: {e}")))?;
    print!("{rendered}");
    Ok(())
}

/// Logs go to stderr so they never mix with printed passwords or JSON.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("keyward={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
