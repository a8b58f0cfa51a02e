//! Test fixtures shared by unit tests.
//!
//! Sample manifests for a small memcached operator plus helpers for temp
//! directories, so individual tests don't repeat the same YAML.

#![allow(clippy::expect_used)]

use tempfile::TempDir;

use crate::manifests::ManifestSet;

pub const PACKAGE_NAME: &str = "memcached-operator";

pub const SAMPLE_CRD: &str = r"apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: memcacheds.cache.example.com
spec:
  group: cache.example.com
  names:
    kind: Memcached
    listKind: MemcachedList
    plural: memcacheds
    singular: memcached
  scope: Namespaced
  versions:
  - name: v1alpha1
    served: true
    storage: false
  - name: v1beta1
    served: true
    storage: true
";

pub const ROLE: &str = r"apiVersion: rbac.authorization.k8s.io/v1
kind: Role
metadata:
  name: manager-role
rules:
- apiGroups:
  - cache.example.com
  resources:
  - memcacheds
  verbs:
  - get
  - list
";

pub const ROLE_BINDING: &str = r"apiVersion: rbac.authorization.k8s.io/v1
kind: RoleBinding
metadata:
  name: manager-rolebinding
roleRef:
  apiGroup: rbac.authorization.k8s.io
  kind: Role
  name: manager-role
subjects:
- kind: ServiceAccount
  name: controller-manager
  namespace: system
";

pub const CLUSTER_ROLE: &str = r"apiVersion: rbac.authorization.k8s.io/v1
kind: ClusterRole
metadata:
  name: metrics-reader
rules:
- nonResourceURLs:
  - /metrics
  verbs:
  - get
";

pub const CLUSTER_ROLE_BINDING: &str = r"apiVersion: rbac.authorization.k8s.io/v1
kind: ClusterRoleBinding
metadata:
  name: metrics-reader-binding
roleRef:
  apiGroup: rbac.authorization.k8s.io
  kind: ClusterRole
  name: metrics-reader
subjects:
- kind: ServiceAccount
  name: controller-manager
  namespace: system
";

pub const SERVICE_ACCOUNT: &str = r"apiVersion: v1
kind: ServiceAccount
metadata:
  name: controller-manager
";

pub const DEPLOYMENT: &str = r"apiVersion: apps/v1
kind: Deployment
metadata:
  name: memcached-operator-controller-manager
spec:
  replicas: 1
  selector:
    matchLabels:
      control-plane: controller-manager
  template:
    metadata:
      labels:
        control-plane: controller-manager
    spec:
      serviceAccountName: controller-manager
      containers:
      - name: manager
        image: controller:latest
";

pub const WEBHOOK_SERVICE: &str = r"apiVersion: v1
kind: Service
metadata:
  name: webhook-service
spec:
  ports:
  - port: 443
    targetPort: 9443
  selector:
    control-plane: controller-manager
";

pub const VALIDATING_WEBHOOK: &str = r"apiVersion: admissionregistration.k8s.io/v1
kind: ValidatingWebhookConfiguration
metadata:
  name: validating-webhook-configuration
webhooks:
- name: vmemcached.kb.io
  admissionReviewVersions:
  - v1
  clientConfig:
    service:
      name: webhook-service
      namespace: system
      path: /validate-cache-example-com-v1alpha1-memcached
  failurePolicy: Fail
  sideEffects: None
  rules:
  - apiGroups:
    - cache.example.com
    apiVersions:
    - v1alpha1
    operations:
    - CREATE
    - UPDATE
    resources:
    - memcacheds
";

pub const BASE_CSV: &str = r"apiVersion: operators.coreos.com/v1alpha1
kind: ClusterServiceVersion
metadata:
  annotations:
    alm-examples: '[]'
    capabilities: Basic Install
  name: memcached-operator.v0.0.0
  namespace: placeholder
spec:
  apiservicedefinitions: {}
  customresourcedefinitions:
    owned:
    - kind: Stale
      name: stales.example.com
      version: v1
  description: Memcached operator for tests
  displayName: Memcached Operator
  icon:
  - base64data: ''
    mediatype: ''
  install:
    spec:
      deployments:
      - name: stale-deployment
        spec: {}
    strategy: deployment
  installModes:
  - supported: true
    type: OwnNamespace
  - supported: false
    type: AllNamespaces
  keywords:
  - memcached
  maintainers:
  - email: dev@example.com
    name: dev
  maturity: alpha
  provider:
    name: Example
  version: 0.0.0
";

/// Base as written by project scaffolding, before anything is filled in
pub const SCAFFOLDED_BASE_CSV: &str = r"apiVersion: operators.coreos.com/v1alpha1
kind: ClusterServiceVersion
metadata:
  annotations:
    alm-examples: '[]'
    capabilities: Basic Install
  labels: null
  name: memcached-operator.v0.0.0
  namespace: placeholder
spec:
  apiservicedefinitions: {}
  customresourcedefinitions: {}
  description: Memcached Operator description.
  displayName: Memcached Operator
  icon:
  - base64data: ''
    mediatype: ''
  install:
    spec:
      deployments: null
    strategy: ''
  installModes:
  - supported: false
    type: OwnNamespace
  - supported: true
    type: AllNamespaces
  keywords:
  - memcached-operator
  links: null
  maintainers: null
  maturity: alpha
  provider: {}
  version: 0.0.0
  webhookdefinitions: null
";

/// Create a temp directory in the system temp location.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Build a manifest set from YAML documents
///
/// # Panics
///
/// Panics if any document fails to parse.
#[must_use]
pub fn manifest_set(documents: &[&str]) -> ManifestSet {
    let stream = documents.join("---\n");
    let mut set = ManifestSet::new();
    set.update_from_reader(stream.as_bytes(), "fixture")
        .expect("Failed to parse fixture manifests");
    set
}

/// The full memcached operator manifest set, without a ClusterServiceVersion
#[must_use]
pub fn operator_manifests() -> ManifestSet {
    manifest_set(&[
        SAMPLE_CRD,
        ROLE,
        ROLE_BINDING,
        CLUSTER_ROLE,
        CLUSTER_ROLE_BINDING,
        SERVICE_ACCOUNT,
        DEPLOYMENT,
        WEBHOOK_SERVICE,
        VALIDATING_WEBHOOK,
    ])
}
