//! Source resolution
//!
//! Classifies a name the way an end user's `add` command would interpret it.
//! A registry plugin is only reachable if its own name classifies as
//! [`SourceType::Registry`].

use std::fmt;

/// Where a name would be fetched from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    Registry,
    Git,
    Local,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Registry => "registry",
            SourceType::Git => "git",
            SourceType::Local => "local",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification result for a single name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    pub source_type: SourceType,
    /// The name as it was resolved
    pub reference: String,
}

pub trait NameResolver {
    fn resolve(&self, name: &str) -> ResolvedSource;
}

/// Purely lexical resolver; never touches the filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultResolver;

const GIT_PREFIXES: &[&str] = &["http://", "https://", "ssh://", "git@"];
const LOCAL_PREFIXES: &[&str] = &["/", "./", "../", "~"];

impl NameResolver for DefaultResolver {
    fn resolve(&self, name: &str) -> ResolvedSource {
        ResolvedSource {
            source_type: classify(name),
            reference: name.to_string(),
        }
    }
}

fn classify(name: &str) -> SourceType {
    if GIT_PREFIXES.iter().any(|p| name.starts_with(p)) || name.ends_with(".git") {
        return SourceType::Git;
    }

    if name == "." || name == ".." || name.contains('\\') {
        return SourceType::Local;
    }
    if LOCAL_PREFIXES.iter().any(|p| name.starts_with(p)) {
        return SourceType::Local;
    }

    // owner/repo shorthand
    if name.contains('/') {
        return SourceType::Git;
    }

    SourceType::Registry
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(name: &str) -> SourceType {
        DefaultResolver.resolve(name).source_type
    }

    #[test]
    fn test_plain_names_are_registry() {
        assert_eq!(kind("piper"), SourceType::Registry);
        assert_eq!(kind("text-to-speech"), SourceType::Registry);
        assert_eq!(kind("mcp_server2"), SourceType::Registry);
    }

    #[test]
    fn test_git_forms() {
        assert_eq!(kind("https://github.com/org/repo"), SourceType::Git);
        assert_eq!(kind("git@github.com:org/repo"), SourceType::Git);
        assert_eq!(kind("org/repo"), SourceType::Git);
        assert_eq!(kind("tool.git"), SourceType::Git);
    }

    #[test]
    fn test_local_forms() {
        assert_eq!(kind("./plugin"), SourceType::Local);
        assert_eq!(kind("../plugin"), SourceType::Local);
        assert_eq!(kind("/abs/plugin"), SourceType::Local);
        assert_eq!(kind("~plugin"), SourceType::Local);
        assert_eq!(kind("."), SourceType::Local);
        assert_eq!(kind("dir\\plugin"), SourceType::Local);
    }

    #[test]
    fn test_reference_is_preserved() {
        let resolved = DefaultResolver.resolve("org/repo");
        assert_eq!(resolved.reference, "org/repo");
        assert_eq!(resolved.source_type.to_string(), "git");
    }
}
