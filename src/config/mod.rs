//! Run configuration for package manifest generation
//!
//! [`GenerateConfigBuilder`] applies defaults and validates every setting once;
//! the resulting [`GenerateConfig`] is immutable and handed to the pipeline.
//! All checks here run before anything touches the filesystem.

pub mod project;

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::annotations;
use crate::descriptor::{self, CsvGenerator};
use crate::error::{self, Result};
use crate::package::PackageOptions;

pub use project::ProjectFile;

/// Output root used when neither `--output-dir` nor `--stdout` is given
pub const DEFAULT_OUTPUT_DIR: &str = "packagemanifests";

/// Directory holding `bases/<package>.clusterserviceversion.yaml`
pub const DEFAULT_KUSTOMIZE_DIR: &str = "config/manifests";

/// Where input manifests come from, decided once at the command boundary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSource {
    /// Standard input is a pipe and is read before merging
    pub piped: bool,
    pub deploy_dir: Option<PathBuf>,
    pub crds_dir: Option<PathBuf>,
}

/// Where generated objects go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    Stdout,
    Directory(PathBuf),
}

/// Validated settings for one generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateConfig {
    pub package_name: String,
    pub layout: Option<String>,
    /// Normalized semantic version
    pub version: String,
    pub from_version: Option<String>,
    pub input: InputSource,
    /// Directory an existing package manifest is read from
    pub input_dir: PathBuf,
    pub kustomize_dir: PathBuf,
    pub output: OutputMode,
    pub channel_name: Option<String>,
    pub is_default_channel: bool,
    /// Also write CRDs and other supporting objects
    pub update_objects: bool,
    pub quiet: bool,
}

impl GenerateConfig {
    pub fn builder() -> GenerateConfigBuilder {
        GenerateConfigBuilder::default()
    }

    pub fn base_path(&self) -> PathBuf {
        descriptor::base_path(&self.kustomize_dir, &self.package_name)
    }

    pub fn package_options(&self) -> PackageOptions {
        PackageOptions {
            input_dir: self.input_dir.clone(),
            channel_name: self.channel_name.clone(),
            is_default_channel: self.is_default_channel,
        }
    }

    pub fn annotations(&self) -> BTreeMap<String, String> {
        annotations::bundle_object_annotations(self.layout.as_deref())
    }

    pub fn csv_generator(&self) -> CsvGenerator {
        CsvGenerator {
            package_name: self.package_name.clone(),
            version: self.version.clone(),
            from_version: self.from_version.clone(),
            annotations: self.annotations(),
        }
    }

    /// Progress messages would corrupt a stdout stream
    pub fn show_progress(&self) -> bool {
        !self.quiet && matches!(self.output, OutputMode::Directory(_))
    }
}

/// Collects raw settings and turns them into a [`GenerateConfig`]
#[derive(Debug, Clone, Default)]
pub struct GenerateConfigBuilder {
    package_name: Option<String>,
    project: Option<ProjectFile>,
    fallback_package_name: Option<String>,
    version: Option<String>,
    from_version: Option<String>,
    input: InputSource,
    input_dir: Option<PathBuf>,
    kustomize_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    stdout: bool,
    channel_name: Option<String>,
    is_default_channel: bool,
    update_objects: bool,
    quiet: bool,
}

impl GenerateConfigBuilder {
    pub fn package_name(mut self, name: Option<String>) -> Self {
        self.package_name = non_empty(name);
        self
    }

    /// Project file consulted for the package name and layout
    pub fn project(mut self, project: Option<ProjectFile>) -> Self {
        self.project = project;
        self
    }

    /// Package name used when neither the flag nor the project file names one
    pub fn fallback_package_name(mut self, name: Option<String>) -> Self {
        self.fallback_package_name = non_empty(name);
        self
    }

    pub fn version(mut self, version: Option<String>) -> Self {
        self.version = non_empty(version);
        self
    }

    pub fn from_version(mut self, version: Option<String>) -> Self {
        self.from_version = non_empty(version);
        self
    }

    pub fn input(mut self, input: InputSource) -> Self {
        self.input = input;
        self
    }

    pub fn input_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.input_dir = dir;
        self
    }

    pub fn kustomize_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.kustomize_dir = dir;
        self
    }

    pub fn output_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.output_dir = dir;
        self
    }

    pub fn stdout(mut self, stdout: bool) -> Self {
        self.stdout = stdout;
        self
    }

    pub fn channel_name(mut self, channel: Option<String>) -> Self {
        self.channel_name = non_empty(channel);
        self
    }

    pub fn default_channel(mut self, is_default: bool) -> Self {
        self.is_default_channel = is_default;
        self
    }

    pub fn update_objects(mut self, update_objects: bool) -> Self {
        self.update_objects = update_objects;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Apply defaults and validate
    pub fn build(self) -> Result<GenerateConfig> {
        let version = match self.version.as_deref() {
            Some(raw) => parse_version(raw)?,
            None => return Err(error::config_invalid("--version must be set")),
        };
        let from_version = self.from_version.as_deref().map(parse_version).transpose()?;

        if !self.input.piped {
            if self.input.deploy_dir.is_none() {
                return Err(error::config_invalid(
                    "--deploy-dir must be set if not reading from stdin",
                ));
            }
            if self.input.crds_dir.is_none() {
                return Err(error::config_invalid(
                    "--crds-dir must be set if not reading from stdin",
                ));
            }
        }
        if self.input.crds_dir.is_some() && self.input.deploy_dir.is_none() {
            return Err(error::config_invalid(
                "--crds-dir can only be set if --deploy-dir is set",
            ));
        }

        if self.stdout && self.output_dir.is_some() {
            return Err(error::config_conflict(
                "--output-dir cannot be set if writing to stdout",
            ));
        }

        if self.is_default_channel && self.channel_name.is_none() {
            return Err(error::config_invalid(
                "--default-channel can only be set if --channel is set",
            ));
        }

        let package_name = self
            .package_name
            .or_else(|| self.project.as_ref().and_then(|p| non_empty(p.project_name.clone())))
            .or(self.fallback_package_name)
            .ok_or_else(|| error::config_invalid("--package must be set"))?;
        let layout = self.project.as_ref().and_then(ProjectFile::layout);

        let output = if self.stdout {
            OutputMode::Stdout
        } else {
            OutputMode::Directory(
                self.output_dir
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            )
        };
        let input_dir = self.input_dir.unwrap_or_else(|| match &output {
            OutputMode::Directory(root) => root.clone(),
            OutputMode::Stdout => PathBuf::from(DEFAULT_OUTPUT_DIR),
        });

        Ok(GenerateConfig {
            package_name,
            layout,
            version,
            from_version,
            input: self.input,
            input_dir,
            kustomize_dir: self
                .kustomize_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_KUSTOMIZE_DIR)),
            output,
            channel_name: self.channel_name,
            is_default_channel: self.is_default_channel,
            update_objects: self.update_objects,
            quiet: self.quiet,
        })
    }
}

/// Validate a semantic version and return its canonical form
pub fn parse_version(raw: &str) -> Result<String> {
    semver::Version::parse(raw)
        .map(|v| v.to_string())
        .map_err(|e| error::version_invalid(raw, e.to_string()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
