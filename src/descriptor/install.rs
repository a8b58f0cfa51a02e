//! Install specification derived from collected manifests

use serde_yaml::Value;

use super::{CrdDescription, InstallStrategy, StrategyDeployment, StrategyDetails, StrategyPermissions};
use crate::manifests::{Manifest, ManifestSet};

/// Build the deployment install strategy from RBAC objects and deployments
pub fn install_strategy(manifests: &ManifestSet) -> InstallStrategy {
    let mut permissions = Vec::new();
    for binding in &manifests.role_bindings {
        if let Some(role) = manifests.bound_role(binding) {
            grant(&mut permissions, binding, rules(role));
        }
    }

    let mut cluster_permissions = Vec::new();
    for binding in &manifests.cluster_role_bindings {
        if let Some(role) = manifests.bound_role(binding) {
            grant(&mut cluster_permissions, binding, rules(role));
        }
    }

    let deployments = manifests
        .deployments
        .iter()
        .map(|deployment| StrategyDeployment {
            name: deployment.name().to_string(),
            spec: deployment.get(&["spec"]).cloned().unwrap_or(Value::Null),
        })
        .collect();

    InstallStrategy {
        strategy: "deployment".to_string(),
        spec: StrategyDetails {
            cluster_permissions,
            deployments,
            permissions,
        },
    }
}

/// One owned CRD description per collected CustomResourceDefinition
pub fn owned_crds(manifests: &ManifestSet) -> Vec<CrdDescription> {
    manifests
        .custom_resource_definitions
        .iter()
        .map(|crd| {
            let str_at = |path: &[&str]| {
                crd.get(path)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            let group = str_at(&["spec", "group"]);
            let plural = str_at(&["spec", "names", "plural"]);
            let name = if group.is_empty() || plural.is_empty() {
                crd.name().to_string()
            } else {
                format!("{plural}.{group}")
            };

            CrdDescription {
                kind: str_at(&["spec", "names", "kind"]),
                name,
                version: crd_version(crd),
                display_name: None,
                description: None,
            }
        })
        .collect()
}

/// Storage version, else the first served version, else the first listed one
fn crd_version(crd: &Manifest) -> String {
    let versions = crd
        .get(&["spec", "versions"])
        .and_then(Value::as_sequence)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let flag = |v: &Value, key: &str| v.get(key).and_then(Value::as_bool).unwrap_or(false);

    versions
        .iter()
        .find(|v| flag(*v, "storage"))
        .or_else(|| versions.iter().find(|v| flag(*v, "served")))
        .or_else(|| versions.first())
        .and_then(|v| v.get("name"))
        .or_else(|| crd.get(&["spec", "version"]))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn rules(role: &Manifest) -> &[Value] {
    role.get(&["rules"])
        .and_then(Value::as_sequence)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Add `rules` to every ServiceAccount subject of `binding`, grouping by account
fn grant(permissions: &mut Vec<StrategyPermissions>, binding: &Manifest, rules: &[Value]) {
    for account in binding.service_account_subjects() {
        let index = match permissions
            .iter()
            .position(|p| p.service_account_name == account)
        {
            Some(index) => index,
            None => {
                permissions.push(StrategyPermissions {
                    service_account_name: account.to_string(),
                    rules: Vec::new(),
                });
                permissions.len() - 1
            }
        };

        let entry = &mut permissions[index];
        for rule in rules {
            if !entry.rules.contains(rule) {
                entry.rules.push(rule.clone());
            }
        }
    }
}
