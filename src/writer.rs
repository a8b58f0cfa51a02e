//! Output writers for generated objects
//!
//! Two interchangeable writers sit behind [`ObjectWriter`]:
//! - [`StreamWriter`]: every object as one `---` document in a single sink
//! - [`DirectoryWriter`]: every object in its own file under a directory
//!
//! Objects are written in the order they are given. A failure stops the
//! sequence and is returned; files written before it stay on disk.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::descriptor::CSV_FILE_SUFFIX;
use crate::error::{self, Result};
use crate::manifests::{CRD_KIND, CSV_KIND, Manifest};

/// Destination for generated objects
pub trait ObjectWriter {
    fn write_object(&mut self, object: &Manifest) -> Result<()>;

    fn write_objects(&mut self, objects: &[Manifest]) -> Result<()> {
        for object in objects {
            self.write_object(object)?;
        }
        Ok(())
    }
}

/// Writes objects as a multi-document YAML stream
pub struct StreamWriter<W: Write> {
    sink: W,
}

impl<W: Write> StreamWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }
}

impl<W: Write> ObjectWriter for StreamWriter<W> {
    fn write_object(&mut self, object: &Manifest) -> Result<()> {
        let yaml = serialize(object)?;
        self.sink
            .write_all(format!("---\n{yaml}").as_bytes())
            .and_then(|()| self.sink.flush())
            .map_err(|e| error::io_error(format!("failed to write {}: {e}", describe(object))))
    }
}

/// Writes each object to its own file in `dir`
pub struct DirectoryWriter {
    dir: PathBuf,
}

impl DirectoryWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ObjectWriter for DirectoryWriter {
    fn write_object(&mut self, object: &Manifest) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| error::dir_create_failed(self.dir.display().to_string(), e.to_string()))?;

        let path = self.dir.join(file_name(object));
        let yaml = serialize(object)?;
        std::fs::write(&path, yaml)
            .map_err(|e| error::file_write_failed(path.display().to_string(), e.to_string()))?;

        tracing::debug!(path = %path.display(), kind = object.kind(), "wrote object");
        Ok(())
    }
}

/// Deterministic file name for an object
///
/// - ClusterServiceVersion: `<package>.clusterserviceversion.yaml`
/// - CustomResourceDefinition: `<group>_<plural>.yaml`
/// - anything else: `<name>_<apiVersion>_<kind>.yaml` with `/` mapped to `_`
pub fn file_name(object: &Manifest) -> String {
    match object.kind() {
        CSV_KIND => {
            let version = object
                .get(&["spec", "version"])
                .and_then(serde_yaml::Value::as_str)
                .unwrap_or_default();
            let suffix = format!(".v{version}");
            let package = object.name().strip_suffix(&suffix).unwrap_or(object.name());
            format!("{package}.{CSV_FILE_SUFFIX}")
        }
        CRD_KIND => {
            let str_at = |path: &[&str]| {
                object
                    .get(path)
                    .and_then(serde_yaml::Value::as_str)
                    .unwrap_or_default()
            };
            let group = str_at(&["spec", "group"]);
            let plural = str_at(&["spec", "names", "plural"]);
            if group.is_empty() || plural.is_empty() {
                format!("{}.yaml", object.name())
            } else {
                format!("{group}_{plural}.yaml")
            }
        }
        kind => format!(
            "{}_{}_{}.yaml",
            object.name(),
            object.api_version().replace('/', "_"),
            kind.to_lowercase()
        ),
    }
}

fn serialize(object: &Manifest) -> Result<String> {
    serde_yaml::to_string(object)
        .map_err(|e| error::manifest_parse_failed(describe(object), e.to_string()))
}

fn describe(object: &Manifest) -> String {
    format!("{} '{}'", object.kind(), object.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{self, DEPLOYMENT, ROLE, SAMPLE_CRD, WEBHOOK_SERVICE};

    fn objects(documents: &[&str]) -> Vec<Manifest> {
        let set = test_fixtures::manifest_set(documents);
        set.custom_resource_definitions
            .into_iter()
            .chain(set.roles)
            .chain(set.deployments)
            .chain(set.services)
            .collect()
    }

    #[test]
    fn test_file_names() {
        let objs = objects(&[SAMPLE_CRD, ROLE, WEBHOOK_SERVICE]);
        let names: Vec<_> = objs.iter().map(file_name).collect();
        assert_eq!(
            names,
            vec![
                "cache.example.com_memcacheds.yaml",
                "manager-role_rbac.authorization.k8s.io_v1_role.yaml",
                "webhook-service_v1_service.yaml",
            ]
        );
    }

    #[test]
    fn test_csv_file_name_strips_version() {
        let csv = r"apiVersion: operators.coreos.com/v1alpha1
kind: ClusterServiceVersion
metadata:
  name: memcached-operator.v1.2.3
spec:
  version: 1.2.3
";
        let set = test_fixtures::manifest_set(&[csv]);
        assert_eq!(
            file_name(&set.cluster_service_versions[0]),
            "memcached-operator.clusterserviceversion.yaml"
        );
    }

    #[test]
    fn test_stream_writer_preserves_order() {
        let objs = objects(&[ROLE, DEPLOYMENT]);
        let mut out = Vec::new();
        StreamWriter::new(&mut out).write_objects(&objs).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("---\n").count(), 2);
        let role_at = text.find("kind: Role").unwrap();
        let deployment_at = text.find("kind: Deployment").unwrap();
        assert!(role_at < deployment_at);
    }

    #[test]
    fn test_directory_writer_creates_dir() {
        let temp = test_fixtures::create_temp_dir();
        let dir = temp.path().join("packagemanifests/0.0.1");
        let mut writer = DirectoryWriter::new(&dir);

        writer.write_objects(&objects(&[SAMPLE_CRD, ROLE])).unwrap();

        assert!(dir.join("cache.example.com_memcacheds.yaml").is_file());
        assert!(
            dir.join("manager-role_rbac.authorization.k8s.io_v1_role.yaml")
                .is_file()
        );
    }

    #[test]
    fn test_directory_writer_overwrites_in_place() {
        let temp = test_fixtures::create_temp_dir();
        let mut writer = DirectoryWriter::new(temp.path());
        let objs = objects(&[ROLE]);

        writer.write_objects(&objs).unwrap();
        writer.write_objects(&objs).unwrap();

        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_directory_writer_surfaces_failure() {
        let temp = test_fixtures::create_temp_dir();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, "a file where a directory is expected").unwrap();

        let err = DirectoryWriter::new(blocker.join("0.0.1"))
            .write_objects(&objects(&[ROLE]))
            .unwrap_err();
        assert!(err.to_string().contains("blocker"));
    }
}
