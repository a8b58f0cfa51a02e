//! ClusterServiceVersion data structures
//!
//! The composite descriptor is split into three groups of fields:
//! - identity (`metadata.name`, `spec.version`) and upgrade linkage (`spec.replaces`)
//! - install specification, always regenerated from the collected manifests
//! - human-authored metadata ([`CsvMetadata`]), carried over from a base as one unit
//!
//! Unknown spec and metadata fields are kept in `extra` maps so hand-written
//! bases round-trip without losing data.

pub mod base;
pub mod generator;
mod install;
mod webhook;

use std::collections::BTreeMap;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

use crate::error::{self, Result};
use crate::manifests::{CSV_KIND, Manifest};

pub use base::{base_path, resolve_base};
pub use generator::CsvGenerator;

/// `apiVersion` of generated ClusterServiceVersions
pub const CSV_API_VERSION: &str = "operators.coreos.com/v1alpha1";

/// File name suffix of ClusterServiceVersion manifests
pub const CSV_FILE_SUFFIX: &str = "clusterserviceversion.yaml";

/// Name of a ClusterServiceVersion for a package at a version
pub fn csv_name(package_name: &str, version: &str) -> String {
    format!("{package_name}.v{version}")
}

/// The composite descriptor of an operator version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterServiceVersion {
    pub api_version: String,
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: ObjectMeta,
    #[serde(default, deserialize_with = "null_as_default")]
    pub spec: CsvSpec,
}

impl Default for ClusterServiceVersion {
    fn default() -> Self {
        Self {
            api_version: CSV_API_VERSION.to_string(),
            kind: CSV_KIND.to_string(),
            metadata: ObjectMeta::default(),
            spec: CsvSpec::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectMeta {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvSpec {
    #[serde(flatten)]
    pub metadata: CsvMetadata,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replaces: Option<String>,
    #[serde(default, deserialize_with = "regenerated")]
    pub install: InstallStrategy,
    #[serde(default, deserialize_with = "regenerated")]
    pub customresourcedefinitions: CrdDescriptions,
    #[serde(default, deserialize_with = "regenerated", skip_serializing_if = "Vec::is_empty")]
    pub webhookdefinitions: Vec<WebhookDescription>,
}

/// Hand-authored fields of a ClusterServiceVersion spec
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub icon: Vec<Icon>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub install_modes: Vec<InstallMode>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub maintainers: Vec<Maintainer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maturity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_kube_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Icon {
    #[serde(default)]
    pub base64data: String,
    #[serde(default)]
    pub mediatype: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallMode {
    #[serde(rename = "type")]
    pub mode: String,
    pub supported: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Maintainer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Deployment install strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallStrategy {
    pub strategy: String,
    #[serde(default)]
    pub spec: StrategyDetails,
}

impl Default for InstallStrategy {
    fn default() -> Self {
        Self {
            strategy: "deployment".to_string(),
            spec: StrategyDetails::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyDetails {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cluster_permissions: Vec<StrategyPermissions>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deployments: Vec<StrategyDeployment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<StrategyPermissions>,
}

/// RBAC rules granted to one service account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyPermissions {
    pub service_account_name: String,
    #[serde(default)]
    pub rules: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyDeployment {
    pub name: String,
    #[serde(default)]
    pub spec: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrdDescriptions {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owned: Vec<CrdDescription>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<CrdDescription>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrdDescription {
    pub kind: String,
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookDescription {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub admission_review_versions: Vec<String>,
    pub container_port: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub deployment_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_policy: Option<String>,
    pub generate_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_selector: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_effects: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<i64>,
    #[serde(rename = "type")]
    pub webhook_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_path: Option<String>,
}

/// Decode an optional value, reading `null` as the type's default
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Skip a field the generator rebuilds from the collected manifests
///
/// Whatever shape the input carries, including `null` or a partial scaffold,
/// decodes to the default.
fn regenerated<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default,
{
    IgnoredAny::deserialize(deserializer)?;
    Ok(T::default())
}

impl ClusterServiceVersion {
    /// Parse a ClusterServiceVersion from YAML
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, String> {
        let csv: Self = serde_yaml::from_str(yaml).map_err(|e| e.to_string())?;
        csv.check_kind()?;
        Ok(csv)
    }

    /// Convert a collected document into a ClusterServiceVersion
    pub fn from_manifest(manifest: &Manifest) -> Result<Self> {
        let source_name = format!("ClusterServiceVersion '{}'", manifest.name());
        let csv: Self = serde_yaml::from_value(manifest.value().clone())
            .map_err(|e| error::manifest_parse_failed(&source_name, e.to_string()))?;
        csv.check_kind()
            .map_err(|reason| error::manifest_parse_failed(&source_name, reason))?;
        Ok(csv)
    }

    /// Generic form used by the output writers
    pub fn to_manifest(&self) -> Result<Manifest> {
        let value = serde_yaml::to_value(self).map_err(|e| {
            error::manifest_parse_failed(format!("ClusterServiceVersion '{}'", self.metadata.name), e.to_string())
        })?;
        Manifest::from_value(value).map_err(|reason| {
            error::manifest_parse_failed(format!("ClusterServiceVersion '{}'", self.metadata.name), reason)
        })
    }

    fn check_kind(&self) -> std::result::Result<(), String> {
        if self.kind == CSV_KIND {
            Ok(())
        } else {
            Err(format!("expected kind {CSV_KIND}, found '{}'", self.kind))
        }
    }
}
