use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

use crate::error::{RegistryError, Result};

const CONFIG_FILE: &str = "registry.toml";

pub const DEFAULT_PLUGINS_DIR: &str = "plugins";
pub const DEFAULT_INDEX_FILE: &str = "index.yaml";
pub const DEFAULT_MANIFEST_FILE: &str = "plugin.yaml";
pub const DEFAULT_ADD_COMMAND: &str = "atk add";

/// On-disk overrides, read from `<root>/registry.toml`
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    registry: RegistrySection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistrySection {
    /// Directory under the root holding one subdirectory per plugin
    #[serde(default = "default_plugins_dir")]
    plugins_dir: String,

    /// Generated index file name, relative to the root
    #[serde(default = "default_index_file")]
    index_file: String,

    /// Manifest file name expected inside every plugin directory
    #[serde(default = "default_manifest_file")]
    manifest_file: String,

    /// Install command quoted in identity-conflict messages
    #[serde(default = "default_add_command")]
    add_command: String,
}

fn default_plugins_dir() -> String {
    DEFAULT_PLUGINS_DIR.to_string()
}

fn default_index_file() -> String {
    DEFAULT_INDEX_FILE.to_string()
}

fn default_manifest_file() -> String {
    DEFAULT_MANIFEST_FILE.to_string()
}

fn default_add_command() -> String {
    DEFAULT_ADD_COMMAND.to_string()
}

impl Default for RegistrySection {
    fn default() -> Self {
        Self {
            plugins_dir: default_plugins_dir(),
            index_file: default_index_file(),
            manifest_file: default_manifest_file(),
            add_command: default_add_command(),
        }
    }
}

/// Registry layout, passed explicitly into the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    pub root: PathBuf,
    pub plugins_dir: String,
    pub index_file: String,
    pub manifest_file: String,
    pub add_command: String,
}

impl RegistryConfig {
    /// Default layout rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::from_section(root.into(), RegistrySection::default())
    }

    /// Load layout for `root`, applying `registry.toml` if present
    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::config_path(root);
        if !path.exists() {
            return Ok(Self::new(root));
        }

        let content = fs::read_to_string(&path)?;
        let file: ConfigFile = toml::from_str(&content).map_err(|e| RegistryError::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        for (key, value) in [
            ("plugins_dir", &file.registry.plugins_dir),
            ("index_file", &file.registry.index_file),
        ] {
            if !is_root_relative(value) {
                return Err(RegistryError::ConfigParse {
                    path,
                    message: format!(
                        "registry.{} must be a relative path inside the root, got '{}'",
                        key, value
                    ),
                });
            }
        }

        Ok(Self::from_section(root.to_path_buf(), file.registry))
    }

    fn from_section(root: PathBuf, section: RegistrySection) -> Self {
        Self {
            root,
            plugins_dir: section.plugins_dir,
            index_file: section.index_file,
            manifest_file: section.manifest_file,
            add_command: section.add_command,
        }
    }

    /// Get config file path
    pub fn config_path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE)
    }

    pub fn plugins_path(&self) -> PathBuf {
        self.root.join(&self.plugins_dir)
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join(&self.index_file)
    }

    /// Portable, root-relative path recorded in the index for `name`
    pub fn entry_path(&self, name: &str) -> String {
        format!("{}/{}", self.plugins_dir.trim_end_matches('/'), name)
    }
}

/// Non-empty, relative, and never climbs out with `..`
fn is_root_relative(value: &str) -> bool {
    let path = Path::new(value);
    !value.trim().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
