//! CLI definitions using clap derive API
//!
//! Argument types live in one submodule per command:
//! - generate: Generate command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};

pub mod completions;
pub mod generate;

pub use completions::CompletionsArgs;
pub use generate::GenerateArgs;

/// opack - operator package manifests generator
///
/// Build versioned operator package directories from Kubernetes manifests.
#[derive(Parser, Debug)]
#[command(
    name = "opack",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Generate operator package manifests",
    long_about = "opack merges an operator's Kubernetes manifests into a ClusterServiceVersion \
                  and maintains a package manifest that maps release channels to versions.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  opack generate --version 0.0.1 --deploy-dir config/deploy --crds-dir config/crds\n   \
                  kustomize build config/manifests | opack generate --version 0.0.2 --from-version 0.0.1\n   \
                  opack generate --version 0.0.1 --channel stable --default-channel --deploy-dir deploy --crds-dir crds\n"
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a versioned package manifests directory
    Generate(GenerateArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
