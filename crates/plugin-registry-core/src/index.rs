//! Registry index assembly and serialization
//!
//! The index is regenerated from scratch on every write; an existing file is
//! never read or merged.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{RegistryError, Result};

/// Public record for one accepted plugin. Field order is the on-disk order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryPluginEntry {
    pub name: String,
    /// Root-relative path, e.g. `plugins/piper`
    pub path: String,
    pub description: String,
}

/// The index document: accepted plugins in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryIndex {
    pub plugins: Vec<RegistryPluginEntry>,
}

impl RegistryIndex {
    /// Wrap entries unchanged, preserving their order
    pub fn assemble(plugins: Vec<RegistryPluginEntry>) -> Self {
        Self { plugins }
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(content)?)
    }
}

/// Writes the index file, replacing any previous content
#[derive(Debug, Clone)]
pub struct IndexWriter {
    path: PathBuf,
}

impl IndexWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize fully in memory, then swap the file in with a rename so
    /// readers see either the old index or the new one.
    pub fn write(&self, index: &RegistryIndex) -> Result<()> {
        let content = index.to_yaml()?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut temp_file = tempfile::Builder::new()
            .prefix(".index-")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|source| self.write_error(source))?;

        temp_file
            .write_all(content.as_bytes())
            .map_err(|source| self.write_error(source))?;

        // temp files are created owner-only; the index is published
        if let Some(permissions) = self.target_permissions() {
            temp_file
                .as_file()
                .set_permissions(permissions)
                .map_err(|source| self.write_error(source))?;
        }

        temp_file
            .persist(&self.path)
            .map_err(|e| self.write_error(e.error))?;

        info!(path = %self.path.display(), plugins = index.len(), "wrote registry index");
        Ok(())
    }

    /// Keep the mode of an existing index, otherwise use a world-readable one
    fn target_permissions(&self) -> Option<fs::Permissions> {
        match fs::metadata(&self.path) {
            Ok(meta) => Some(meta.permissions()),
            Err(_) => default_permissions(),
        }
    }

    fn write_error(&self, source: std::io::Error) -> RegistryError {
        RegistryError::IndexWrite {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}
