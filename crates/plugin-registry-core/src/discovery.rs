use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{RegistryError, Result};

/// A candidate plugin: a direct subdirectory of the plugins directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginDirectory {
    pub name: String,
    pub path: PathBuf,
}

/// Find all plugin directories under `plugins_dir`, sorted by name.
///
/// A missing `plugins_dir` is an empty registry, not an error. A
/// `plugins_dir` that exists but is not a directory is. Hidden entries and
/// plain files are skipped. Read errors propagate.
pub fn discover_plugins(plugins_dir: &Path) -> Result<Vec<PluginDirectory>> {
    if !plugins_dir.exists() {
        debug!(path = %plugins_dir.display(), "plugins directory absent");
        return Ok(Vec::new());
    }
    if !plugins_dir.is_dir() {
        return Err(RegistryError::Discovery {
            path: plugins_dir.to_path_buf(),
            message: "not a directory".to_string(),
        });
    }

    let mut plugins = Vec::new();
    let walker = WalkDir::new(plugins_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| RegistryError::Discovery {
            path: plugins_dir.to_path_buf(),
            message: e.to_string(),
        })?;

        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        if !entry.path().is_dir() {
            continue;
        }

        plugins.push(PluginDirectory {
            name,
            path: entry.into_path(),
        });
    }

    debug!(count = plugins.len(), "discovered plugin directories");
    Ok(plugins)
}
