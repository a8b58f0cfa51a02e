//! Collected input manifests
//!
//! A [`ManifestSet`] holds every resource document read from stdin or from the
//! deploy/CRD directories, bucketed by kind. ClusterServiceVersion documents
//! are kept apart from the supporting resources that get folded into them.

mod collector;

use serde::Serialize;
use serde_yaml::Value;

/// Kind of a ClusterServiceVersion document
pub const CSV_KIND: &str = "ClusterServiceVersion";
/// Kind of a CustomResourceDefinition document
pub const CRD_KIND: &str = "CustomResourceDefinition";

/// A single Kubernetes-style resource document
///
/// Always a YAML mapping with non-empty `apiVersion` and `kind`.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    api_version: String,
    kind: String,
    value: Value,
}

impl Manifest {
    /// Wrap a decoded document, rejecting anything that is not an object
    pub fn from_value(value: Value) -> std::result::Result<Self, String> {
        if !value.is_mapping() {
            return Err("document is not a mapping".to_string());
        }
        let api_version = value
            .get("apiVersion")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "document has no apiVersion".to_string())?
            .to_string();
        let kind = value
            .get("kind")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "document has no kind".to_string())?
            .to_string();

        Ok(Self {
            api_version,
            kind,
            value,
        })
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// `metadata.name`, or an empty string when unset
    pub fn name(&self) -> &str {
        self.get(&["metadata", "name"])
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Look up a nested mapping value by key path
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        path.iter()
            .try_fold(&self.value, |current, key| current.get(*key))
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// `(roleRef.kind, roleRef.name)` of a RoleBinding or ClusterRoleBinding
    pub fn role_ref(&self) -> Option<(&str, &str)> {
        let kind = self.get(&["roleRef", "kind"])?.as_str()?;
        let name = self.get(&["roleRef", "name"])?.as_str()?;
        Some((kind, name))
    }

    /// Names of the `ServiceAccount` subjects of a binding
    pub fn service_account_subjects(&self) -> impl Iterator<Item = &str> {
        self.get(&["subjects"])
            .and_then(Value::as_sequence)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter(|subject| subject.get("kind").and_then(Value::as_str) == Some("ServiceAccount"))
            .filter_map(|subject| subject.get("name").and_then(Value::as_str))
    }
}

impl Serialize for Manifest {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value.serialize(serializer)
    }
}

/// Classified collection of input documents
#[derive(Debug, Clone, Default)]
pub struct ManifestSet {
    pub cluster_service_versions: Vec<Manifest>,
    pub custom_resource_definitions: Vec<Manifest>,
    pub roles: Vec<Manifest>,
    pub cluster_roles: Vec<Manifest>,
    pub role_bindings: Vec<Manifest>,
    pub cluster_role_bindings: Vec<Manifest>,
    pub service_accounts: Vec<Manifest>,
    pub deployments: Vec<Manifest>,
    pub services: Vec<Manifest>,
    pub validating_webhooks: Vec<Manifest>,
    pub mutating_webhooks: Vec<Manifest>,
    /// Anything not folded into the ClusterServiceVersion
    pub others: Vec<Manifest>,
}

impl ManifestSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a manifest to the bucket for its kind
    pub fn add(&mut self, manifest: Manifest) {
        let bucket = match manifest.kind() {
            CSV_KIND => &mut self.cluster_service_versions,
            CRD_KIND => &mut self.custom_resource_definitions,
            "Role" => &mut self.roles,
            "ClusterRole" => &mut self.cluster_roles,
            "RoleBinding" => &mut self.role_bindings,
            "ClusterRoleBinding" => &mut self.cluster_role_bindings,
            "ServiceAccount" => &mut self.service_accounts,
            "Deployment" => &mut self.deployments,
            "Service" => &mut self.services,
            "ValidatingWebhookConfiguration" => &mut self.validating_webhooks,
            "MutatingWebhookConfiguration" => &mut self.mutating_webhooks,
            _ => &mut self.others,
        };
        bucket.push(manifest);
    }

    /// Append a batch, preserving order
    pub fn extend(&mut self, manifests: impl IntoIterator<Item = Manifest>) {
        for manifest in manifests {
            self.add(manifest);
        }
    }

    /// First collected ClusterServiceVersion document, if any
    pub fn cluster_service_version(&self) -> Option<&Manifest> {
        self.cluster_service_versions.first()
    }

    pub fn has_cluster_service_version(&self) -> bool {
        !self.cluster_service_versions.is_empty()
    }

    /// Collected role a binding refers to
    ///
    /// A RoleBinding may reference a Role or a ClusterRole, a ClusterRoleBinding
    /// only a ClusterRole.
    pub fn bound_role(&self, binding: &Manifest) -> Option<&Manifest> {
        let (kind, name) = binding.role_ref()?;
        let roles = match (binding.kind(), kind) {
            ("RoleBinding", "Role") => &self.roles,
            (_, "ClusterRole") => &self.cluster_roles,
            _ => return None,
        };
        roles.iter().find(|role| role.name() == name)
    }

    /// Bindings and roles that end up as CSV permissions
    fn folded_rbac(&self) -> Vec<&Manifest> {
        self.role_bindings
            .iter()
            .chain(self.cluster_role_bindings.iter())
            .filter(|binding| binding.service_account_subjects().next().is_some())
            .filter_map(|binding| self.bound_role(binding).map(|role| [binding, role]))
            .flatten()
            .collect()
    }

    /// Objects written next to the ClusterServiceVersion when raw objects are requested
    ///
    /// CRDs, ServiceAccounts, RBAC objects that did not become CSV permissions,
    /// Services (the CSV only references them by name) and everything
    /// unrecognised.
    pub fn supporting_objects(&self) -> Vec<Manifest> {
        let folded = self.folded_rbac();
        let rbac = self
            .roles
            .iter()
            .chain(self.cluster_roles.iter())
            .chain(self.role_bindings.iter())
            .chain(self.cluster_role_bindings.iter())
            .filter(|object| !folded.iter().any(|f| std::ptr::eq(*f, *object)));

        self.custom_resource_definitions
            .iter()
            .chain(self.service_accounts.iter())
            .chain(rbac)
            .chain(self.services.iter())
            .chain(self.others.iter())
            .cloned()
            .collect()
    }

    /// Total number of collected documents
    pub fn len(&self) -> usize {
        [
            &self.cluster_service_versions,
            &self.custom_resource_definitions,
            &self.roles,
            &self.cluster_roles,
            &self.role_bindings,
            &self.cluster_role_bindings,
            &self.service_accounts,
            &self.deployments,
            &self.services,
            &self.validating_webhooks,
            &self.mutating_webhooks,
            &self.others,
        ]
        .iter()
        .map(|bucket| bucket.len())
        .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
