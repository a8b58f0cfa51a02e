//! Manifest ingestion from a byte stream or from deploy/CRD directories
//!
//! Every source is decoded completely before anything is added to the set, so
//! a malformed document never leaves a partially filled [`ManifestSet`].

use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::Value;
use walkdir::WalkDir;

use super::{Manifest, ManifestSet};
use crate::error::{self, Result};

/// File extensions read from manifest directories
const MANIFEST_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

impl ManifestSet {
    /// Read zero or more `---` separated documents from `reader`
    pub fn update_from_reader(&mut self, mut reader: impl Read, source_name: &str) -> Result<()> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|e| error::manifest_parse_failed(source_name, e.to_string()))?;

        let manifests = parse_documents(&content, source_name)?;
        tracing::debug!(source = source_name, count = manifests.len(), "collected manifests");
        self.extend(manifests);
        Ok(())
    }

    /// Read manifests from the top level of `deploy_dir` and recursively from `crds_dir`
    ///
    /// Files are visited in file name order so repeated runs see the same sequence.
    pub fn update_from_dirs(&mut self, deploy_dir: &Path, crds_dir: Option<&Path>) -> Result<()> {
        let mut files = manifest_files(deploy_dir, Some(1))?;
        if let Some(crds_dir) = crds_dir {
            if crds_dir != deploy_dir {
                files.extend(manifest_files(crds_dir, None)?);
            }
        }

        let mut manifests = Vec::new();
        for path in &files {
            manifests.extend(read_manifest_file(path)?);
        }

        tracing::debug!(
            deploy_dir = %deploy_dir.display(),
            files = files.len(),
            count = manifests.len(),
            "collected manifests from directories"
        );
        self.extend(manifests);
        Ok(())
    }
}

/// Decode a multi-document YAML string, skipping empty documents
fn parse_documents(content: &str, source_name: &str) -> Result<Vec<Manifest>> {
    let mut manifests = Vec::new();

    for (index, document) in serde_yaml::Deserializer::from_str(content).enumerate() {
        let location = || format!("{} (document {})", source_name, index + 1);
        let value = Value::deserialize(document)
            .map_err(|e| error::manifest_parse_failed(location(), e.to_string()))?;
        if value.is_null() {
            continue;
        }
        let manifest =
            Manifest::from_value(value).map_err(|reason| error::manifest_parse_failed(location(), reason))?;
        manifests.push(manifest);
    }

    Ok(manifests)
}

fn read_manifest_file(path: &Path) -> Result<Vec<Manifest>> {
    let source_name = path.display().to_string();
    let content = std::fs::read_to_string(path)
        .map_err(|e| error::file_read_failed(&source_name, e.to_string()))?;

    let is_json = path.extension().and_then(|ext| ext.to_str()) == Some("json");
    if !is_json {
        return parse_documents(&content, &source_name);
    }

    let json: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| error::manifest_parse_failed(&source_name, e.to_string()))?;
    let value = serde_yaml::to_value(json)
        .map_err(|e| error::manifest_parse_failed(&source_name, e.to_string()))?;
    let manifest =
        Manifest::from_value(value).map_err(|reason| error::manifest_parse_failed(&source_name, reason))?;
    Ok(vec![manifest])
}

fn manifest_files(dir: &Path, max_depth: Option<usize>) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(error::file_read_failed(
            dir.display().to_string(),
            "not a directory",
        ));
    }

    let mut walker = WalkDir::new(dir).min_depth(1).sort_by_file_name();
    if let Some(depth) = max_depth {
        walker = walker.max_depth(depth);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .map_or_else(|| dir.display().to_string(), |p| p.display().to_string());
            error::file_read_failed(path, e.to_string())
        })?;
        if entry.file_type().is_file() && is_manifest_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn is_manifest_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| MANIFEST_EXTENSIONS.contains(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{self, DEPLOYMENT, ROLE, SAMPLE_CRD, SERVICE_ACCOUNT};

    #[test]
    fn test_update_from_reader_multi_document() {
        let stream = format!("---\n{ROLE}---\n{SERVICE_ACCOUNT}---\n");
        let mut set = ManifestSet::new();
        set.update_from_reader(stream.as_bytes(), "stdin").unwrap();

        assert_eq!(set.roles.len(), 1);
        assert_eq!(set.service_accounts.len(), 1);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_update_from_reader_empty_stream() {
        let mut set = ManifestSet::new();
        set.update_from_reader("".as_bytes(), "stdin").unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_malformed_document_fails_whole_ingestion() {
        let stream = format!("{ROLE}---\nkind: [unclosed\n");
        let mut set = ManifestSet::new();
        let err = set.update_from_reader(stream.as_bytes(), "stdin").unwrap_err();

        assert!(err.to_string().contains("stdin (document 2)"));
        assert!(set.is_empty());
    }

    #[test]
    fn test_document_without_kind_fails() {
        let mut set = ManifestSet::new();
        let result = set.update_from_reader("apiVersion: v1\nmetadata: {}\n".as_bytes(), "stdin");
        assert!(result.is_err());
    }

    #[test]
    fn test_update_from_dirs() {
        let temp = test_fixtures::create_temp_dir();
        let deploy = temp.path().join("deploy");
        let crds = deploy.join("crds");
        std::fs::create_dir_all(&crds).unwrap();
        std::fs::write(deploy.join("role.yaml"), ROLE).unwrap();
        std::fs::write(deploy.join("deployment.yaml"), DEPLOYMENT).unwrap();
        std::fs::write(deploy.join("README.md"), "not a manifest").unwrap();
        std::fs::write(crds.join("cache.example.com_memcacheds.yaml"), SAMPLE_CRD).unwrap();

        let mut set = ManifestSet::new();
        set.update_from_dirs(&deploy, Some(&crds)).unwrap();

        assert_eq!(set.roles.len(), 1);
        assert_eq!(set.deployments.len(), 1);
        assert_eq!(set.custom_resource_definitions.len(), 1);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_deploy_dir_is_not_recursive() {
        let temp = test_fixtures::create_temp_dir();
        let deploy = temp.path().join("deploy");
        std::fs::create_dir_all(deploy.join("nested")).unwrap();
        std::fs::write(deploy.join("nested/role.yaml"), ROLE).unwrap();

        let mut set = ManifestSet::new();
        set.update_from_dirs(&deploy, None).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_json_manifest_file() {
        let temp = test_fixtures::create_temp_dir();
        std::fs::write(
            temp.path().join("sa.json"),
            r#"{"apiVersion": "v1", "kind": "ServiceAccount", "metadata": {"name": "controller"}}"#,
        )
        .unwrap();

        let mut set = ManifestSet::new();
        set.update_from_dirs(temp.path(), None).unwrap();
        assert_eq!(set.service_accounts[0].name(), "controller");
    }

    #[test]
    fn test_missing_deploy_dir_is_an_error() {
        let temp = test_fixtures::create_temp_dir();
        let mut set = ManifestSet::new();
        let err = set
            .update_from_dirs(&temp.path().join("missing"), None)
            .unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_stream_then_dirs_are_unioned_in_order() {
        let temp = test_fixtures::create_temp_dir();
        std::fs::write(temp.path().join("role.yaml"), ROLE).unwrap();

        let mut set = ManifestSet::new();
        set.update_from_reader(
            "apiVersion: rbac.authorization.k8s.io/v1\nkind: Role\nmetadata:\n  name: from-stream\n"
                .as_bytes(),
            "stdin",
        )
        .unwrap();
        set.update_from_dirs(temp.path(), None).unwrap();

        let names: Vec<_> = set.roles.iter().map(Manifest::name).collect();
        assert_eq!(names, vec!["from-stream", "manager-role"]);
    }
}
