//! ClusterServiceVersion generation
//!
//! Merge rules:
//! 1. Seed from a ClusterServiceVersion found in the collected manifests, else
//!    from the base, else from an empty descriptor.
//! 2. Replace the install strategy, CRD descriptions and webhook definitions
//!    as whole units with data derived from the manifests.
//! 3. Keep the seed's human metadata untouched.
//! 4. Set name and version; set `replaces` only when a previous version is known.
//! 5. Add the supplied annotations, overriding existing keys.
//!
//! Sub-structures are never merged field by field. A base that supplied two
//! deployments loses both even if the manifests only contain one.

use std::collections::BTreeMap;

use super::{ClusterServiceVersion, CrdDescriptions, csv_name, install, webhook};
use crate::error::Result;
use crate::manifests::ManifestSet;

/// Generates the ClusterServiceVersion of one package version
#[derive(Debug, Clone)]
pub struct CsvGenerator {
    pub package_name: String,
    pub version: String,
    pub from_version: Option<String>,
    pub annotations: BTreeMap<String, String>,
}

impl CsvGenerator {
    /// Merge `base` with `manifests`
    ///
    /// Pure: reads nothing from disk, so a failure here happens before any write.
    pub fn generate(
        &self,
        base: Option<ClusterServiceVersion>,
        manifests: &ManifestSet,
    ) -> Result<ClusterServiceVersion> {
        let mut csv = match manifests.cluster_service_version() {
            Some(document) => {
                if manifests.cluster_service_versions.len() > 1 {
                    tracing::warn!(
                        count = manifests.cluster_service_versions.len(),
                        "multiple ClusterServiceVersions collected, using the first"
                    );
                }
                if base.is_some() {
                    tracing::debug!("collected ClusterServiceVersion takes precedence over base");
                }
                ClusterServiceVersion::from_manifest(document)?
            }
            None => base.unwrap_or_default(),
        };

        csv.spec.install = install::install_strategy(manifests);
        csv.spec.customresourcedefinitions = CrdDescriptions {
            owned: install::owned_crds(manifests),
            required: Vec::new(),
        };
        csv.spec.webhookdefinitions = webhook::webhook_definitions(manifests);

        csv.metadata.name = csv_name(&self.package_name, &self.version);
        csv.spec.version.clone_from(&self.version);
        csv.spec.replaces = self
            .from_version
            .as_deref()
            .filter(|v| !v.is_empty())
            .map(|v| csv_name(&self.package_name, v));

        csv.metadata
            .annotations
            .extend(self.annotations.iter().map(|(k, v)| (k.clone(), v.clone())));

        Ok(csv)
    }
}
