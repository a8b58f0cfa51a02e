use clap::Parser;
use std::path::PathBuf;

/// Arguments for the generate command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate from manifest directories:\n    opack generate --version 0.0.1 --deploy-dir config/deploy --crds-dir config/crds\n\n\
                  Generate from a kustomize build:\n    kustomize build config/manifests | opack generate --version 0.0.1\n\n\
                  Upgrade from a previous version:\n    opack generate --version 0.0.2 --from-version 0.0.1 --deploy-dir deploy --crds-dir crds\n\n\
                  Print objects instead of writing files:\n    kustomize build config/manifests | opack generate --version 0.0.1 --stdout")]
pub struct GenerateArgs {
    /// Semantic version of the packaged operator
    #[arg(long)]
    pub version: Option<String>,

    /// Version this release replaces
    #[arg(long)]
    pub from_version: Option<String>,

    /// Directory holding an existing package manifest (defaults to the output directory)
    #[arg(long, value_name = "DIR")]
    pub input_dir: Option<PathBuf>,

    /// Directory of operator resources (Deployments, RBAC, webhooks)
    #[arg(long, value_name = "DIR")]
    pub deploy_dir: Option<PathBuf>,

    /// Directory of CustomResourceDefinitions, searched recursively
    #[arg(long, value_name = "DIR")]
    pub crds_dir: Option<PathBuf>,

    /// Directory containing bases/<package>.clusterserviceversion.yaml
    #[arg(long, value_name = "DIR")]
    pub kustomize_dir: Option<PathBuf>,

    /// Root of the package manifests tree [default: packagemanifests]
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Write objects to stdout instead of files
    #[arg(long)]
    pub stdout: bool,

    /// Channel the new version is published in [default: alpha]
    #[arg(long)]
    pub channel: Option<String>,

    /// Make --channel the package's default channel
    #[arg(long)]
    pub default_channel: bool,

    /// Also write CRDs and other supporting objects
    #[arg(long)]
    pub update_objects: bool,

    /// Package name (defaults to projectName in PROJECT, then the directory name)
    #[arg(long, value_name = "NAME")]
    pub package: Option<String>,

    /// Suppress status output
    #[arg(long, short = 'q')]
    pub quiet: bool,
}
