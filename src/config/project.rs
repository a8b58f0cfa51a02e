//! Project file (`PROJECT`) written by operator scaffolding tools
//!
//! Only the project name and layout are read; they default the package name
//! and the layout annotation.

use std::path::Path;

use serde::Deserialize;

use crate::error::{self, Result};

/// Project file name, looked up in the working directory
pub const PROJECT_FILE: &str = "PROJECT";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub layout: Option<Layout>,
}

/// Older project files use a single layout key, newer ones a list of plugin keys
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Layout {
    Single(String),
    Plugins(Vec<String>),
}

impl ProjectFile {
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Load `<dir>/PROJECT`, `None` if there is no such file
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(PROJECT_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|e| error::file_read_failed(path.display().to_string(), e.to_string()))?;
        let project = Self::from_yaml(&content).map_err(|e| {
            error::config::project_parse_failed(path.display().to_string(), e.to_string())
        })?;
        Ok(Some(project))
    }

    /// Layout as a single annotation value, plugin keys joined with commas
    pub fn layout(&self) -> Option<String> {
        match self.layout.as_ref()? {
            Layout::Single(layout) => Some(layout.clone()),
            Layout::Plugins(plugins) if plugins.is_empty() => None,
            Layout::Plugins(plugins) => Some(plugins.join(",")),
        }
    }
}
