//! Package manifest (`<package>.package.yaml`)
//!
//! The package manifest names the current ClusterServiceVersion of each
//! channel. Updates only ever add a channel or move an existing channel to a
//! new version; other channels are left as they are.

pub mod generator;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{self, Result};

pub use generator::{PackageOptions, generate};

/// Channel used when none is given
pub const DEFAULT_CHANNEL: &str = "alpha";

/// File name of the package manifest for `package_name`
pub fn file_name(package_name: &str) -> String {
    format!("{package_name}.package.yaml")
}

/// Path of the package manifest for `package_name` under `dir`
pub fn path_in(dir: &Path, package_name: &str) -> PathBuf {
    dir.join(file_name(package_name))
}

/// Package manifest structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    pub package_name: String,
    #[serde(default)]
    pub channels: Vec<PackageChannel>,
    #[serde(
        default,
        rename = "defaultChannel",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_channel: Option<String>,
}

/// A release track and the ClusterServiceVersion it currently points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageChannel {
    pub name: String,
    #[serde(rename = "currentCSV")]
    pub current_csv: String,
}

impl PackageManifest {
    /// Create an empty package manifest
    pub fn new(package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            channels: Vec::new(),
            default_channel: None,
        }
    }

    /// Parse package manifest from YAML string
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Serialize package manifest to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| error::package_invalid(format!("cannot serialize: {e}")))
    }

    /// Load the package manifest at `path`, `None` if the file does not exist
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| error::file_read_failed(path.display().to_string(), e.to_string()))?;
        let manifest = Self::from_yaml(&content)
            .map_err(|e| error::package_parse_failed(path.display().to_string(), e.to_string()))?;
        Ok(Some(manifest))
    }

    /// Write the package manifest to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        let yaml = self.to_yaml()?;
        std::fs::write(path, yaml)
            .map_err(|e| error::file_write_failed(path.display().to_string(), e.to_string()))
    }

    /// Find a channel by name
    pub fn find_channel(&self, name: &str) -> Option<&PackageChannel> {
        self.channels.iter().find(|c| c.name == name)
    }

    /// Point `name` at `current_csv`, appending the channel if it is new
    pub fn upsert_channel(&mut self, name: &str, current_csv: &str) {
        match self.channels.iter_mut().find(|c| c.name == name) {
            Some(channel) => current_csv.clone_into(&mut channel.current_csv),
            None => self.channels.push(PackageChannel {
                name: name.to_string(),
                current_csv: current_csv.to_string(),
            }),
        }
    }

    /// Make `name` the default channel, replacing any previous default
    pub fn set_default_channel(&mut self, name: &str) {
        self.default_channel = Some(name.to_string());
    }

    /// Check structural invariants before the record is persisted
    pub fn validate(&self) -> Result<()> {
        if self.package_name.is_empty() {
            return Err(error::package_invalid("packageName must be set"));
        }
        if self.channels.is_empty() {
            return Err(error::package_invalid(format!(
                "package '{}' has no channels",
                self.package_name
            )));
        }

        for (i, channel) in self.channels.iter().enumerate() {
            if channel.name.is_empty() {
                return Err(error::package_invalid("channel name must not be empty"));
            }
            if channel.current_csv.is_empty() {
                return Err(error::package_invalid(format!(
                    "channel '{}' has no currentCSV",
                    channel.name
                )));
            }
            if self.channels[..i].iter().any(|c| c.name == channel.name) {
                return Err(error::package_invalid(format!(
                    "duplicate channel '{}'",
                    channel.name
                )));
            }
        }

        match self.default_channel.as_deref() {
            None => Err(error::package_invalid(format!(
                "package '{}' has no default channel",
                self.package_name
            ))),
            Some(default) if self.find_channel(default).is_none() => Err(
                error::default_channel_missing(&self.package_name, default),
            ),
            Some(_) => Ok(()),
        }
    }
}
