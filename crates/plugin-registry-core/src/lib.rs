pub mod config;
pub mod discovery;
pub mod error;
pub mod index;
pub mod manifest;
pub mod pipeline;
pub mod source;
pub mod validator;

pub use config::RegistryConfig;
pub use discovery::{discover_plugins, PluginDirectory};
pub use error::{RegistryError, Result};
pub use index::{IndexWriter, RegistryIndex, RegistryPluginEntry};
pub use manifest::{ManifestError, ManifestLoader, PluginManifest, YamlManifestLoader};
pub use pipeline::{decide, Decision, Pipeline, RunMode, RunReport, RunStatus, Summary};
pub use source::{DefaultResolver, NameResolver, ResolvedSource, SourceType};
pub use validator::{
    PluginOutcome, PluginValidator, ValidationError, ValidationFailure, README_FILE,
};
