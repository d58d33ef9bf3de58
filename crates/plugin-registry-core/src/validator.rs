//! Per-plugin acceptance checks
//!
//! Checks run in a fixed order and stop at the first failure for that
//! plugin. Failures are values, never errors: the caller decides what a
//! failed plugin means for the run.

use std::fmt;

use tracing::{debug, warn};

use crate::config::RegistryConfig;
use crate::discovery::PluginDirectory;
use crate::index::RegistryPluginEntry;
use crate::manifest::{ManifestError, ManifestLoader, YamlManifestLoader};
use crate::source::{DefaultResolver, NameResolver, SourceType};

pub const README_FILE: &str = "README.md";

const MAX_NAME_LEN: usize = 64;

/// Why a plugin was rejected
#[derive(Debug)]
pub enum ValidationFailure {
    /// The plugin's own name resolves to some other source kind
    IdentityConflict {
        name: String,
        source_type: SourceType,
        add_command: String,
    },
    MissingReadme,
    /// Loader failure, reported with the loader's own wording
    Manifest(ManifestError),
    InvalidName { name: String },
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IdentityConflict {
                name,
                source_type,
                add_command,
            } => write!(
                f,
                "Plugin name '{}' resolves as {} instead of registry. \
                 Users running '{} {}' would not reach the registry.",
                name, source_type, add_command, name
            ),
            Self::MissingReadme => write!(
                f,
                "Missing {} (required for all registry plugins)",
                README_FILE
            ),
            Self::Manifest(e) => write!(f, "{}", e),
            Self::InvalidName { name } => write!(
                f,
                "Invalid plugin name '{}': must start with a letter or digit and contain \
                 only alphanumerics, '-' or '_' (max {} chars)",
                name, MAX_NAME_LEN
            ),
        }
    }
}

/// A rejected plugin paired with its reason, ready for reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub plugin: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(plugin: impl Into<String>, failure: &ValidationFailure) -> Self {
        Self {
            plugin: plugin.into(),
            message: failure.to_string(),
        }
    }
}

/// Runs every acceptance check against a single plugin directory
pub struct PluginValidator<R = DefaultResolver, L = YamlManifestLoader> {
    resolver: R,
    loader: L,
    config: RegistryConfig,
}

impl PluginValidator {
    /// Validator with the default resolver and a loader for the configured
    /// manifest file name
    pub fn from_config(config: RegistryConfig) -> Self {
        let loader = YamlManifestLoader::new(config.manifest_file.clone());
        Self::new(DefaultResolver, loader, config)
    }
}

impl<R: NameResolver, L: ManifestLoader> PluginValidator<R, L> {
    pub fn new(resolver: R, loader: L, config: RegistryConfig) -> Self {
        Self {
            resolver,
            loader,
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn validate(
        &self,
        plugin: &PluginDirectory,
    ) -> Result<RegistryPluginEntry, ValidationFailure> {
        let name = plugin.name.as_str();

        let resolved = self.resolver.resolve(name);
        if resolved.source_type != SourceType::Registry {
            return Err(ValidationFailure::IdentityConflict {
                name: name.to_string(),
                source_type: resolved.source_type,
                add_command: self.config.add_command.clone(),
            });
        }

        if !plugin.path.join(README_FILE).is_file() {
            return Err(ValidationFailure::MissingReadme);
        }

        let manifest = self
            .loader
            .load(&plugin.path)
            .map_err(ValidationFailure::Manifest)?;

        if !is_valid_plugin_name(name) {
            return Err(ValidationFailure::InvalidName {
                name: name.to_string(),
            });
        }

        debug!(plugin = name, "plugin passed validation");
        Ok(RegistryPluginEntry {
            name: name.to_string(),
            path: self.config.entry_path(name),
            description: manifest.description,
        })
    }

    /// Validate every plugin, keeping discovery order. A failure never stops
    /// the remaining plugins from being checked.
    pub fn validate_all(&self, plugins: &[PluginDirectory]) -> Vec<PluginOutcome> {
        plugins
            .iter()
            .map(|plugin| {
                let result = self.validate(plugin).map_err(|failure| {
                    warn!(plugin = %plugin.name, reason = %failure, "plugin rejected");
                    ValidationError::new(&plugin.name, &failure)
                });
                PluginOutcome {
                    name: plugin.name.clone(),
                    result,
                }
            })
            .collect()
    }
}

/// Result of validating one discovered plugin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginOutcome {
    pub name: String,
    pub result: Result<RegistryPluginEntry, ValidationError>,
}

impl PluginOutcome {
    pub fn is_valid(&self) -> bool {
        self.result.is_ok()
    }
}

fn is_valid_plugin_name(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return false;
    }

    let starts_ok = name
        .chars()
        .next()
        .map(|c| c.is_ascii_alphanumeric())
        .unwrap_or(false);

    starts_ok
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::PluginManifest;
    use crate::source::ResolvedSource;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const MANIFEST: &str = "schema_version: \"1\"\nname: demo\ndescription: Demo plugin\n";

    fn plugin_dir(
        root: &Path,
        name: &str,
        readme: bool,
        manifest: Option<&str>,
    ) -> PluginDirectory {
        let path = root.join("plugins").join(name);
        fs::create_dir_all(&path).unwrap();
        if readme {
            fs::write(path.join("README.md"), "# Demo\n").unwrap();
        }
        if let Some(content) = manifest {
            fs::write(path.join("plugin.yaml"), content).unwrap();
        }
        PluginDirectory {
            name: name.to_string(),
            path,
        }
    }

    fn validator(root: &Path) -> PluginValidator {
        PluginValidator::from_config(RegistryConfig::new(root))
    }

    /// Resolves every name to a fixed kind
    struct FixedResolver(SourceType);

    impl NameResolver for FixedResolver {
        fn resolve(&self, name: &str) -> ResolvedSource {
            ResolvedSource {
                source_type: self.0,
                reference: name.to_string(),
            }
        }
    }

    /// Panics if consulted; proves earlier checks short-circuit
    struct UnreachableLoader;

    impl ManifestLoader for UnreachableLoader {
        fn load(&self, _plugin_dir: &Path) -> Result<PluginManifest, ManifestError> {
            panic!("manifest loader must not be called");
        }
    }

    #[test]
    fn test_valid_plugin_entry() {
        let tmp = TempDir::new().unwrap();
        let plugin = plugin_dir(tmp.path(), "demo", true, Some(MANIFEST));

        let entry = validator(tmp.path()).validate(&plugin).unwrap();
        assert_eq!(entry.name, "demo");
        assert_eq!(entry.path, "plugins/demo");
        assert_eq!(entry.description, "Demo plugin");
    }

    #[test]
    fn test_identity_conflict_message() {
        let tmp = TempDir::new().unwrap();
        let plugin = plugin_dir(tmp.path(), "tool.git", true, Some(MANIFEST));

        let failure = validator(tmp.path()).validate(&plugin).unwrap_err();
        assert!(matches!(
            failure,
            ValidationFailure::IdentityConflict {
                source_type: SourceType::Git,
                ..
            }
        ));
        assert_eq!(
            failure.to_string(),
            "Plugin name 'tool.git' resolves as git instead of registry. \
             Users running 'atk add tool.git' would not reach the registry."
        );
    }

    #[test]
    fn test_identity_checked_before_anything_else() {
        let tmp = TempDir::new().unwrap();
        let plugin = plugin_dir(tmp.path(), "demo", false, None);
        let validator = PluginValidator::new(
            FixedResolver(SourceType::Local),
            UnreachableLoader,
            RegistryConfig::new(tmp.path()),
        );

        let failure = validator.validate(&plugin).unwrap_err();
        assert!(failure.to_string().contains("resolves as local"));
        assert!(failure.to_string().contains("'demo'"));
    }

    #[test]
    fn test_missing_readme_skips_manifest() {
        let tmp = TempDir::new().unwrap();
        let plugin = plugin_dir(tmp.path(), "demo", false, Some(MANIFEST));
        let validator = PluginValidator::new(
            FixedResolver(SourceType::Registry),
            UnreachableLoader,
            RegistryConfig::new(tmp.path()),
        );

        let failure = validator.validate(&plugin).unwrap_err();
        assert!(matches!(failure, ValidationFailure::MissingReadme));
        assert_eq!(
            failure.to_string(),
            "Missing README.md (required for all registry plugins)"
        );
    }

    #[test]
    fn test_readme_directory_does_not_count() {
        let tmp = TempDir::new().unwrap();
        let plugin = plugin_dir(tmp.path(), "demo", false, Some(MANIFEST));
        fs::create_dir(plugin.path.join("README.md")).unwrap();

        let failure = validator(tmp.path()).validate(&plugin).unwrap_err();
        assert!(matches!(failure, ValidationFailure::MissingReadme));
    }

    #[test]
    fn test_manifest_error_passed_through_verbatim() {
        let tmp = TempDir::new().unwrap();
        let plugin = plugin_dir(tmp.path(), "demo", true, None);

        let failure = validator(tmp.path()).validate(&plugin).unwrap_err();
        let expected = ManifestError::NotFound {
            path: plugin.path.join("plugin.yaml"),
        }
        .to_string();
        assert_eq!(failure.to_string(), expected);
    }

    #[test]
    fn test_invalid_name_rejected_after_manifest() {
        let tmp = TempDir::new().unwrap();
        let plugin = plugin_dir(tmp.path(), "bad name", true, Some(MANIFEST));

        let failure = validator(tmp.path()).validate(&plugin).unwrap_err();
        assert!(matches!(failure, ValidationFailure::InvalidName { .. }));
        assert!(failure.to_string().starts_with("Invalid plugin name 'bad name'"));
    }

    #[test]
    fn test_validate_all_accumulates() {
        let tmp = TempDir::new().unwrap();
        let plugins = vec![
            plugin_dir(tmp.path(), "alpha", true, Some(MANIFEST)),
            plugin_dir(tmp.path(), "beta", false, Some(MANIFEST)),
            plugin_dir(tmp.path(), "gamma", true, Some("name: [")),
            plugin_dir(tmp.path(), "delta", true, Some(MANIFEST)),
        ];

        let outcomes = validator(tmp.path()).validate_all(&plugins);
        let valid: Vec<_> = outcomes.iter().map(|o| (o.name.as_str(), o.is_valid())).collect();
        assert_eq!(
            valid,
            vec![
                ("alpha", true),
                ("beta", false),
                ("gamma", false),
                ("delta", true)
            ]
        );

        let err = outcomes[1].result.as_ref().unwrap_err();
        assert_eq!(err.plugin, "beta");
        assert!(err.message.contains("README.md"));
    }

    #[test]
    fn test_plugin_name_rules() {
        assert!(is_valid_plugin_name("piper"));
        assert!(is_valid_plugin_name("a"));
        assert!(is_valid_plugin_name("2fa-helper"));
        assert!(is_valid_plugin_name("snake_case"));
        assert!(!is_valid_plugin_name(""));
        assert!(!is_valid_plugin_name("-leading"));
        assert!(!is_valid_plugin_name("_leading"));
        assert!(!is_valid_plugin_name("has space"));
        assert!(!is_valid_plugin_name("ünicode"));
        assert!(!is_valid_plugin_name(&"x".repeat(65)));
    }
}
