//! Generate operation
//!
//! Runs one generation in a fixed order:
//! 1. collect manifests from the piped stream and the deploy/CRD directories
//! 2. resolve the base ClusterServiceVersion, unless one was collected
//! 3. merge the ClusterServiceVersion in memory
//! 4. update the package manifest (directory output only)
//! 5. write the ClusterServiceVersion and, on request, the supporting objects
//!
//! Everything that can fail on bad input happens before the first write.

use std::io::Write;
use std::path::PathBuf;

use crate::config::{GenerateConfig, OutputMode};
use crate::descriptor::{self, ClusterServiceVersion};
use crate::error::Result;
use crate::manifests::ManifestSet;
use crate::package::{self, PackageManifest};
use crate::ui::StatusReporter;
use crate::writer::{DirectoryWriter, ObjectWriter, StreamWriter};

/// Name used for the piped stream in error messages
const STREAM_SOURCE: &str = "stdin";

/// Outcome of a generation run
#[derive(Debug)]
pub struct GenerateReport {
    pub csv: ClusterServiceVersion,
    /// Updated package manifest, `None` for stream output
    pub package: Option<PackageManifest>,
    /// Directory the objects went to, `None` for stream output
    pub version_dir: Option<PathBuf>,
    pub objects_written: usize,
}

pub struct GenerateOperation<'a> {
    config: &'a GenerateConfig,
}

impl<'a> GenerateOperation<'a> {
    pub fn new(config: &'a GenerateConfig) -> Self {
        Self { config }
    }

    /// Execute the operation
    ///
    /// `stream` holds the already-read piped input, if any. `stdout` receives
    /// the object stream in stdout mode and is untouched otherwise.
    pub fn execute(
        &self,
        stream: Option<&[u8]>,
        stdout: &mut dyn Write,
        reporter: &mut dyn StatusReporter,
    ) -> Result<GenerateReport> {
        let config = self.config;
        reporter.step(&format!(
            "Generating package manifests version {}",
            config.version
        ));

        let manifests = self.collect(stream)?;
        let base = self.resolve_base(&manifests, reporter)?;
        let csv = config.csv_generator().generate(base, &manifests)?;

        let mut objects = vec![csv.to_manifest()?];
        if config.update_objects {
            objects.extend(manifests.supporting_objects());
        }

        let report = match &config.output {
            OutputMode::Stdout => {
                StreamWriter::new(stdout).write_objects(&objects)?;
                GenerateReport {
                    csv,
                    package: None,
                    version_dir: None,
                    objects_written: objects.len(),
                }
            }
            OutputMode::Directory(root) => {
                let package = package::generate(
                    &config.package_name,
                    &config.version,
                    root,
                    &config.package_options(),
                )?;
                let mut writer = DirectoryWriter::new(root.join(&config.version));
                writer.write_objects(&objects)?;
                reporter.success(&format!(
                    "Package manifests generated successfully in {}",
                    root.display()
                ));
                GenerateReport {
                    csv,
                    package: Some(package),
                    version_dir: Some(writer.dir().to_path_buf()),
                    objects_written: objects.len(),
                }
            }
        };

        tracing::info!(
            csv = %report.csv.metadata.name,
            objects = report.objects_written,
            "generation finished"
        );
        Ok(report)
    }

    fn collect(&self, stream: Option<&[u8]>) -> Result<ManifestSet> {
        let mut manifests = ManifestSet::new();
        if let Some(bytes) = stream {
            manifests.update_from_reader(bytes, STREAM_SOURCE)?;
        }
        if let Some(deploy_dir) = &self.config.input.deploy_dir {
            manifests.update_from_dirs(deploy_dir, self.config.input.crds_dir.as_deref())?;
        }
        if manifests.is_empty() {
            tracing::warn!("no manifests collected, the ClusterServiceVersion will have no install strategy");
        } else {
            tracing::debug!(count = manifests.len(), "collected manifests");
        }
        Ok(manifests)
    }

    fn resolve_base(
        &self,
        manifests: &ManifestSet,
        reporter: &mut dyn StatusReporter,
    ) -> Result<Option<ClusterServiceVersion>> {
        if manifests.has_cluster_service_version() {
            return Ok(None);
        }
        let path = self.config.base_path();
        let base = descriptor::resolve_base(&path)?;
        if base.is_none() {
            reporter.notice("Building a ClusterServiceVersion without an existing base");
        }
        Ok(base)
    }
}
