//! Base ClusterServiceVersion lookup
//!
//! A base holds hand-written metadata and lives at
//! `<kustomize-dir>/bases/<package-name>.clusterserviceversion.yaml`.

use std::path::{Path, PathBuf};

use super::{CSV_FILE_SUFFIX, ClusterServiceVersion};
use crate::error::{self, Result};

/// Path where a base for `package_name` is expected
pub fn base_path(kustomize_dir: &Path, package_name: &str) -> PathBuf {
    kustomize_dir
        .join("bases")
        .join(format!("{package_name}.{CSV_FILE_SUFFIX}"))
}

/// Load the base at `path`
///
/// A missing file is not an error and yields `None`; a file that exists but
/// cannot be parsed as a ClusterServiceVersion is.
pub fn resolve_base(path: &Path) -> Result<Option<ClusterServiceVersion>> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no ClusterServiceVersion base found");
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| error::file_read_failed(path.display().to_string(), e.to_string()))?;
    let base = ClusterServiceVersion::from_yaml(&content)
        .map_err(|reason| error::base_parse_failed(path.display().to_string(), reason))?;

    tracing::debug!(path = %path.display(), name = %base.metadata.name, "loaded ClusterServiceVersion base");
    Ok(Some(base))
}
