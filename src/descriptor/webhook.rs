//! Webhook definitions derived from admission webhook configurations

use serde_yaml::Value;

use super::WebhookDescription;
use crate::manifests::{Manifest, ManifestSet};

const DEFAULT_CONTAINER_PORT: i64 = 443;

/// One definition per webhook entry, validating configurations first
pub fn webhook_definitions(manifests: &ManifestSet) -> Vec<WebhookDescription> {
    let validating = manifests
        .validating_webhooks
        .iter()
        .map(|config| (config, "ValidatingAdmissionWebhook"));
    let mutating = manifests
        .mutating_webhooks
        .iter()
        .map(|config| (config, "MutatingAdmissionWebhook"));

    validating
        .chain(mutating)
        .flat_map(|(config, webhook_type)| {
            sequence(config.value().get("webhooks"))
                .iter()
                .map(move |webhook| describe(manifests, webhook, webhook_type))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn describe(manifests: &ManifestSet, webhook: &Value, webhook_type: &str) -> WebhookDescription {
    let service = webhook.get("clientConfig").and_then(|c| c.get("service"));
    let service_field = |key: &str| service.and_then(|s| s.get(key));

    let container_port = service_field("name")
        .and_then(Value::as_str)
        .and_then(|name| target_port(manifests, name))
        .or_else(|| service_field("port").and_then(Value::as_i64))
        .unwrap_or(DEFAULT_CONTAINER_PORT);

    let deployment_name = service_field("name")
        .and_then(Value::as_str)
        .and_then(|name| deployment_for_service(manifests, name))
        .or_else(|| match manifests.deployments.as_slice() {
            [only] => Some(only.name().to_string()),
            _ => None,
        })
        .unwrap_or_default();

    WebhookDescription {
        admission_review_versions: sequence(webhook.get("admissionReviewVersions"))
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        container_port,
        deployment_name,
        failure_policy: string_field(webhook, "failurePolicy"),
        generate_name: string_field(webhook, "name").unwrap_or_default(),
        object_selector: webhook.get("objectSelector").cloned(),
        rules: sequence(webhook.get("rules")).to_vec(),
        side_effects: string_field(webhook, "sideEffects"),
        timeout_seconds: webhook.get("timeoutSeconds").and_then(Value::as_i64),
        webhook_type: webhook_type.to_string(),
        webhook_path: service_field("path")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

/// Numeric `targetPort` of the first port of the named Service
fn target_port(manifests: &ManifestSet, service_name: &str) -> Option<i64> {
    let service = find_by_name(&manifests.services, service_name)?;
    sequence(service.get(&["spec", "ports"]))
        .first()?
        .get("targetPort")?
        .as_i64()
}

/// Deployment whose pod template labels match the Service selector
fn deployment_for_service(manifests: &ManifestSet, service_name: &str) -> Option<String> {
    let service = find_by_name(&manifests.services, service_name)?;
    let selector = service.get(&["spec", "selector"])?.as_mapping()?;
    if selector.is_empty() {
        return None;
    }

    manifests
        .deployments
        .iter()
        .find(|deployment| {
            let Some(labels) = deployment
                .get(&["spec", "template", "metadata", "labels"])
                .and_then(Value::as_mapping)
            else {
                return false;
            };
            selector
                .iter()
                .all(|(key, value)| labels.get(key) == Some(value))
        })
        .map(|deployment| deployment.name().to_string())
}

fn find_by_name<'a>(manifests: &'a [Manifest], name: &str) -> Option<&'a Manifest> {
    manifests.iter().find(|m| m.name() == name)
}

fn sequence(value: Option<&Value>) -> &[Value] {
    value
        .and_then(Value::as_sequence)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}
