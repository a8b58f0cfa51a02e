//! opack - operator package manifests generator
//!
//! Merges an operator's Kubernetes manifests into a ClusterServiceVersion and
//! maintains the package manifest that maps release channels to versions.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod annotations;
mod cli;
mod commands;
mod config;
mod descriptor;
mod error;
mod manifests;
mod operations;
mod package;
mod ui;
mod writer;

#[cfg(test)]
mod test_fixtures;

use cli::{Cli, Commands};

/// Environment variable overriding the log filter
const LOG_ENV: &str = "OPACK_LOG";

/// Diagnostics go to stderr so stdout stays usable as an object stream.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
