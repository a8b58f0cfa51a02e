//! Annotations stamped onto generated ClusterServiceVersions

use std::collections::BTreeMap;

/// Records which tool produced the object
pub const BUILDER_ANNOTATION: &str = "operators.operatorframework.io/builder";

/// Records the project layout the operator was scaffolded with
pub const LAYOUT_ANNOTATION: &str = "operators.operatorframework.io/project_layout";

/// Value of the builder annotation for this build
pub fn builder_value() -> String {
    format!("opack-v{}", env!("CARGO_PKG_VERSION"))
}

/// Annotations for bundle objects; the layout entry is omitted when unknown
pub fn bundle_object_annotations(layout: Option<&str>) -> BTreeMap<String, String> {
    let mut annotations = BTreeMap::from([(BUILDER_ANNOTATION.to_string(), builder_value())]);
    if let Some(layout) = layout.filter(|l| !l.is_empty()) {
        annotations.insert(LAYOUT_ANNOTATION.to_string(), layout.to_string());
    }
    annotations
}
