// SPDX-FileCopyrightText: 2026 Seisreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! seisreg - format and algorithm plugin registry for seismological data.
//!
//! This is the binary entry point.

mod builtin;
mod commands;
mod doctor;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use seisreg_config::SeisregConfig;
use seisreg_core::SeisregError;

/// seisreg - format and algorithm plugin registry for seismological data.
#[derive(Parser, Debug)]
#[command(name = "seisreg", version, about, long_about = None)]
struct Cli {
    /// Explicit configuration file (skips the standard lookup).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List registered categories.
    Categories,
    /// List the names registered in a category.
    Formats {
        category: Option<String>,
    },
    /// Detect the format of a file.
    Detect {
        file: PathBuf,
        #[arg(long)]
        category: Option<String>,
    },
    /// Convert a file between formats.
    Convert {
        input: PathBuf,
        output: PathBuf,
        /// Target format.
        #[arg(long)]
        to: String,
        /// Source format; detected when omitted.
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Validate the plugin tables.
    Doctor {
        /// Resolve every registered operation.
        #[arg(long)]
        deep: bool,
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => seisreg_config::load_and_validate_path(path),
        None => seisreg_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            seisreg_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log.level);

    let Some(command) = cli.command else {
        println!("seisreg: use --help for available commands");
        return;
    };

    if let Commands::Doctor { deep, plain } = command {
        let failures = doctor::run_doctor(&config, deep, plain);
        if failures > 0 {
            std::process::exit(1);
        }
        return;
    }

    if let Err(e) = run(&config, command) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(config: &SeisregConfig, command: Commands) -> Result<(), SeisregError> {
    let registry = match builtin::build_registry(config) {
        Ok(registry) => registry,
        Err(errors) => {
            for e in &errors {
                eprintln!("error: {e}");
            }
            return Err(SeisregError::Config(format!(
                "{} plugin table error(s); run `seisreg doctor` for details",
                errors.len()
            )));
        }
    };
    let default_category = config.registry.default_category.as_str();
    let mut stdout = std::io::stdout().lock();

    match command {
        Commands::Categories => commands::run_categories(&registry, &mut stdout),
        Commands::Formats { category } => commands::run_formats(
            &registry,
            category.as_deref().unwrap_or(default_category),
            &mut stdout,
        ),
        Commands::Detect { file, category } => commands::run_detect(
            &registry,
            category.as_deref().unwrap_or(default_category),
            &file,
            &mut stdout,
        ),
        Commands::Convert {
            input,
            output,
            to,
            from,
            category,
        } => commands::run_convert(
            &registry,
            category.as_deref().unwrap_or(default_category),
            &input,
            &output,
            from.as_deref(),
            &to,
        ),
        Commands::Doctor { .. } => Ok(()),
    }
}

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence over the configured level. Logs go to stderr.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("seisreg={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
