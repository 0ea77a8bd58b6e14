//! Synchronizer configuration and the on-disk manifest it is loaded from.
//!
//! Without a manifest the built-in mapping and defaults are used, which
//! reproduces the classic `.agent/rules` layout.

use rulesync_fs::{ConfigStore, NormalizedPath, RulesPath};
use serde::{Deserialize, Serialize};

use crate::mapping::{RuleEntry, RuleMapping};
use crate::{Error, Result};

/// Largest rule file, in characters, the assistant accepts.
pub const DEFAULT_MAX_CHARS: usize = 12_000;

/// Characters held back from every chunk on top of the preamble.
pub const DEFAULT_SAFETY_MARGIN: usize = 100;

/// Rule whose documents always get their links rewritten.
pub const LEGACY_ARCHITECTURE_RULE: &str = "read-architecture-docs.md";

/// Documents whose path contains this get their links rewritten.
pub const ARCHITECTURE_MARKER: &str = "ARCHITECTURE.md";

/// A file copied into the rules directory under its own base name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxiliaryCopy {
    /// Source path relative to the repository root
    pub source: String,
    /// Apply the `](docs/` link rewrite to the copy
    #[serde(default)]
    pub rewrite_links: bool,
}

impl AuxiliaryCopy {
    pub fn verbatim(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            rewrite_links: false,
        }
    }

    pub fn rewritten(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            rewrite_links: true,
        }
    }

    /// `AGENTS.md` as-is, then `docs/ARCHITECTURE.md` with links rewritten.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::verbatim(RulesPath::AgentsFile.as_str()),
            Self::rewritten(RulesPath::ArchitectureDoc.as_str()),
        ]
    }

    /// Destination file name (the source's base name).
    pub fn file_name(&self) -> &str {
        self.source
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(&self.source)
    }
}

/// Serialized form of a rule manifest (`.agent/rulesync.toml`).
///
/// Every field is optional. `legacy_architecture_rule = ""` disables the
/// legacy rewrite gate; omitting `rules` keeps the built-in mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_chars: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_margin: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_architecture_rule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture_marker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<RuleEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auxiliary: Option<Vec<AuxiliaryCopy>>,
}

/// Everything the synchronizer needs for one run.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Repository root; every mapped path is relative to it
    pub root: NormalizedPath,
    /// Output directory relative to `root`
    pub rules_dir: String,
    pub max_chars: usize,
    pub safety_margin: usize,
    pub legacy_architecture_rule: Option<String>,
    pub architecture_marker: String,
    pub mapping: RuleMapping,
    pub auxiliary: Vec<AuxiliaryCopy>,
}

impl SyncConfig {
    /// Defaults with the built-in mapping.
    pub fn new(root: NormalizedPath) -> Self {
        Self {
            root,
            rules_dir: RulesPath::RulesDir.as_str().to_string(),
            max_chars: DEFAULT_MAX_CHARS,
            safety_margin: DEFAULT_SAFETY_MARGIN,
            legacy_architecture_rule: Some(LEGACY_ARCHITECTURE_RULE.to_string()),
            architecture_marker: ARCHITECTURE_MARKER.to_string(),
            mapping: RuleMapping::builtin(),
            auxiliary: AuxiliaryCopy::defaults(),
        }
    }

    pub fn with_mapping(mut self, mapping: RuleMapping) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    pub fn with_auxiliary(mut self, auxiliary: Vec<AuxiliaryCopy>) -> Self {
        self.auxiliary = auxiliary;
        self
    }

    /// Apply a manifest on top of the defaults.
    pub fn from_manifest(root: NormalizedPath, manifest: Manifest) -> Result<Self> {
        let mut config = Self::new(root);

        if let Some(max_chars) = manifest.max_chars {
            config.max_chars = max_chars;
        }
        if let Some(margin) = manifest.safety_margin {
            config.safety_margin = margin;
        }
        if let Some(rules_dir) = manifest.rules_dir {
            if rules_dir.trim().is_empty() {
                return Err(Error::invalid_mapping("rules_dir must not be empty"));
            }
            config.rules_dir = rules_dir;
        }
        if let Some(legacy) = manifest.legacy_architecture_rule {
            config.legacy_architecture_rule = Some(legacy).filter(|name| !name.is_empty());
        }
        if let Some(marker) = manifest.architecture_marker {
            if marker.is_empty() {
                return Err(Error::invalid_mapping("architecture_marker must not be empty"));
            }
            config.architecture_marker = marker;
        }
        if let Some(rules) = manifest.rules {
            config.mapping = RuleMapping::new(rules)?;
        }
        if let Some(auxiliary) = manifest.auxiliary {
            config.auxiliary = auxiliary;
        }
        if let Some(aux) = config
            .auxiliary
            .iter()
            .find(|aux| config.mapping.get(aux.file_name()).is_some())
        {
            return Err(Error::invalid_mapping(format!(
                "rule {} has the same file name as the copy of {}",
                aux.file_name(),
                aux.source
            )));
        }

        Ok(config)
    }

    /// Load the configuration for `root`.
    ///
    /// An explicit manifest path must exist. Otherwise
    /// `<root>/.agent/rulesync.toml` is used when present, and the defaults
    /// when not.
    pub fn load(root: NormalizedPath, manifest_path: Option<&NormalizedPath>) -> Result<Self> {
        let discovered;
        let path = match manifest_path {
            Some(path) => path,
            None => {
                discovered = root.join(RulesPath::Manifest.as_str());
                if !discovered.is_file() {
                    tracing::debug!(root = %root, "no manifest found, using built-in mapping");
                    return Ok(Self::new(root));
                }
                &discovered
            }
        };

        tracing::debug!(manifest = %path, "loading manifest");
        let manifest: Manifest = ConfigStore::new().load(path)?;
        Self::from_manifest(root, manifest)
    }

    /// Absolute path of the rules output directory.
    pub fn rules_path(&self) -> NormalizedPath {
        self.root.join(&self.rules_dir)
    }
}
