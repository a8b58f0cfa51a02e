//! Package manifest generation for one package version

use std::path::{Path, PathBuf};

use super::{DEFAULT_CHANNEL, PackageManifest, path_in};
use crate::descriptor::csv_name;
use crate::error::{self, Result};

/// Options for [`generate`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageOptions {
    /// Directory an existing package manifest is read from
    pub input_dir: PathBuf,
    pub channel_name: Option<String>,
    pub is_default_channel: bool,
}

/// Update the package manifest under `output_root` for `version`
///
/// Creates `<output_root>/<version>/` without clearing it, upserts the channel
/// and persists the record. Re-running with the same arguments rewrites an
/// identical file.
pub fn generate(
    package_name: &str,
    version: &str,
    output_root: &Path,
    options: &PackageOptions,
) -> Result<PackageManifest> {
    if options.is_default_channel && options.channel_name.is_none() {
        return Err(error::config_invalid(
            "--default-channel can only be set if --channel is set",
        ));
    }

    let version_dir = output_root.join(version);
    std::fs::create_dir_all(&version_dir)
        .map_err(|e| error::dir_create_failed(version_dir.display().to_string(), e.to_string()))?;

    let input_path = path_in(&options.input_dir, package_name);
    let mut manifest = match PackageManifest::load(&input_path)? {
        Some(existing) => {
            tracing::debug!(path = %input_path.display(), "updating existing package manifest");
            existing
        }
        None => PackageManifest::new(package_name),
    };
    if manifest.package_name != package_name {
        tracing::warn!(
            found = %manifest.package_name,
            expected = package_name,
            "package manifest names a different package, renaming"
        );
        package_name.clone_into(&mut manifest.package_name);
    }

    let channel = options.channel_name.as_deref().unwrap_or(DEFAULT_CHANNEL);
    manifest.upsert_channel(channel, &csv_name(package_name, version));

    if options.is_default_channel || manifest.channels.len() == 1 {
        manifest.set_default_channel(channel);
    }

    manifest.validate()?;

    let output_path = path_in(output_root, package_name);
    manifest.save(&output_path)?;
    tracing::debug!(path = %output_path.display(), channel, "wrote package manifest");

    Ok(manifest)
}
