//! Plugin manifest parsing for `plugin.yaml`

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::config::DEFAULT_MANIFEST_FILE;

/// Plugin manifest structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PluginManifest {
    /// Manifest schema version (required)
    pub schema_version: String,

    /// Plugin name (required)
    pub name: String,

    /// One-line description shown in the registry (required)
    pub description: String,

    /// Plugin version
    #[serde(default)]
    pub version: Option<String>,

    /// Author name or contact
    #[serde(default)]
    pub author: Option<String>,

    /// License identifier
    #[serde(default)]
    pub license: Option<String>,

    /// Homepage URL
    #[serde(default)]
    pub homepage: Option<String>,

    /// Keywords for discovery
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Manifest loading failures. The Display text is reported to plugin
/// authors unchanged.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Plugin manifest not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid manifest {path}: {message}")]
    Schema { path: PathBuf, message: String },
}

pub trait ManifestLoader {
    /// Load and validate the manifest inside `plugin_dir`
    fn load(&self, plugin_dir: &Path) -> Result<PluginManifest, ManifestError>;
}

/// Loads `plugin.yaml` (or a configured file name) with serde_yaml_ng
#[derive(Debug, Clone)]
pub struct YamlManifestLoader {
    file_name: String,
}

impl YamlManifestLoader {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

impl Default for YamlManifestLoader {
    fn default() -> Self {
        Self::new(DEFAULT_MANIFEST_FILE)
    }
}

impl ManifestLoader for YamlManifestLoader {
    fn load(&self, plugin_dir: &Path) -> Result<PluginManifest, ManifestError> {
        let path = plugin_dir.join(&self.file_name);
        if !path.is_file() {
            return Err(ManifestError::NotFound { path });
        }

        let content = fs::read_to_string(&path).map_err(|source| ManifestError::Read {
            path: path.clone(),
            source,
        })?;

        let manifest: PluginManifest =
            serde_yaml_ng::from_str(&content).map_err(|e| ManifestError::Parse {
                path: path.clone(),
                message: e.to_string(),
            })?;

        manifest
            .check_schema()
            .map_err(|message| ManifestError::Schema { path, message })?;

        Ok(manifest)
    }
}

impl PluginManifest {
    /// Field constraints serde cannot express
    fn check_schema(&self) -> Result<(), String> {
        if self.schema_version.trim().is_empty() {
            return Err("schema_version must not be empty".to_string());
        }
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        if self.description.trim().is_empty() {
            return Err("description must not be empty".to_string());
        }
        Ok(())
    }
}
