//! Discovery → validation → decision → (optional) index write
//!
//! Every plugin is validated before anything is decided. The decision is a
//! pure function of the tallied outcomes and the run mode, and the index is
//! written at most once, only after every plugin passed.

use std::path::PathBuf;

use tracing::debug;

use crate::config::RegistryConfig;
use crate::discovery::discover_plugins;
use crate::error::Result;
use crate::index::{IndexWriter, RegistryIndex};
use crate::manifest::{ManifestLoader, YamlManifestLoader};
use crate::source::{DefaultResolver, NameResolver};
use crate::validator::{PluginOutcome, PluginValidator, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Validate, then write the index
    #[default]
    Write,
    /// Validate and report only
    Check,
}

/// Valid/invalid counts folded from the outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub valid: usize,
    pub invalid: usize,
}

impl Summary {
    pub fn tally(outcomes: &[PluginOutcome]) -> Self {
        outcomes.iter().fold(Self::default(), |acc, o| {
            if o.is_valid() {
                Self {
                    valid: acc.valid + 1,
                    ..acc
                }
            } else {
                Self {
                    invalid: acc.invalid + 1,
                    ..acc
                }
            }
        })
    }

    pub fn has_failures(&self) -> bool {
        self.invalid > 0
    }
}

/// What to do once every plugin has been validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Fail,
    SkipWrite,
    Write,
}

pub fn decide(summary: &Summary, mode: RunMode) -> Decision {
    if summary.has_failures() {
        return Decision::Fail;
    }
    match mode {
        RunMode::Check => Decision::SkipWrite,
        RunMode::Write => Decision::Write,
    }
}

/// How the run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// No plugin directories; `written` is set in write mode
    EmptyRegistry { written: Option<PathBuf> },
    ValidationFailed,
    Checked,
    Written { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub outcomes: Vec<PluginOutcome>,
    pub summary: Summary,
    pub status: RunStatus,
}

impl RunReport {
    pub fn errors(&self) -> Vec<&ValidationError> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err())
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.status != RunStatus::ValidationFailed
    }

    /// 0 when no plugin failed (including an empty registry), 1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

pub struct Pipeline<R = DefaultResolver, L = YamlManifestLoader> {
    validator: PluginValidator<R, L>,
    mode: RunMode,
}

impl Pipeline {
    /// Pipeline using the default collaborators for `config`
    pub fn from_config(config: RegistryConfig, mode: RunMode) -> Self {
        Self::new(PluginValidator::from_config(config), mode)
    }
}

impl<R: NameResolver, L: ManifestLoader> Pipeline<R, L> {
    pub fn new(validator: PluginValidator<R, L>, mode: RunMode) -> Self {
        Self { validator, mode }
    }

    pub fn config(&self) -> &RegistryConfig {
        self.validator.config()
    }

    /// Run the whole pipeline. Only infrastructure failures are errors;
    /// rejected plugins are reported through [`RunReport`].
    pub fn run(&self) -> Result<RunReport> {
        let config = self.config();
        let candidates = discover_plugins(&config.plugins_path())?;

        if candidates.is_empty() {
            let written = match self.mode {
                RunMode::Write => Some(self.write(RegistryIndex::default())?),
                RunMode::Check => None,
            };
            return Ok(RunReport {
                outcomes: Vec::new(),
                summary: Summary::default(),
                status: RunStatus::EmptyRegistry { written },
            });
        }

        let outcomes = self.validator.validate_all(&candidates);
        let summary = Summary::tally(&outcomes);
        let decision = decide(&summary, self.mode);
        debug!(
            valid = summary.valid,
            invalid = summary.invalid,
            ?decision,
            "validation finished"
        );

        let status = match decision {
            Decision::Fail => RunStatus::ValidationFailed,
            Decision::SkipWrite => RunStatus::Checked,
            Decision::Write => {
                let entries = outcomes
                    .iter()
                    .filter_map(|o| o.result.as_ref().ok().cloned())
                    .collect();
                let path = self.write(RegistryIndex::assemble(entries))?;
                RunStatus::Written { path }
            }
        };

        Ok(RunReport {
            outcomes,
            summary,
            status,
        })
    }

    fn write(&self, index: RegistryIndex) -> Result<PathBuf> {
        let writer = IndexWriter::new(self.config().index_path());
        writer.write(&index)?;
        Ok(writer.path().to_path_buf())
    }
}
