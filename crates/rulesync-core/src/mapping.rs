//! Rule mapping: which documentation files feed which rule file.
//!
//! # Example TOML
//!
//! ```toml
//! [[rules]]
//! name = "agents-md.md"
//! docs = ["AGENTS.md"]
//!
//! [[rules]]
//! name = "llm-provider-docs.md"
//! docs_dir = "docs/modules/llm/providers"
//! trigger = "glob"
//! globs = ["src/llm/*-client.ts"]
//! ```

use std::collections::HashSet;

use rulesync_fs::{NormalizedPath, io};
use serde::{Deserialize, Serialize};

use crate::frontmatter::{Trigger, render_frontmatter};
use crate::{Error, Result};

/// Extension of files picked up from a `docs_dir`.
const DOC_EXTENSION: &str = "md";

/// One rule file and the documents concatenated into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
    /// Output file name inside the rules directory (e.g. `agents-md.md`)
    pub name: String,
    /// Documents, relative to the repository root, in concatenation order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub docs: Vec<String>,
    /// Directory whose `*.md` files are appended after `docs`, by name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs_dir: Option<String>,
    #[serde(default)]
    pub trigger: Trigger,
    /// File globs for `trigger = "glob"`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub globs: Vec<String>,
}

impl RuleEntry {
    pub fn new<I, S>(name: impl Into<String>, docs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            docs: docs.into_iter().map(Into::into).collect(),
            docs_dir: None,
            trigger: Trigger::AlwaysOn,
            globs: Vec::new(),
        }
    }

    /// A rule fed by every Markdown file in `dir`.
    pub fn from_dir(name: impl Into<String>, dir: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            docs: Vec::new(),
            docs_dir: Some(dir.into()),
            trigger: Trigger::AlwaysOn,
            globs: Vec::new(),
        }
    }

    pub fn with_globs<I, S>(mut self, globs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trigger = Trigger::Glob;
        self.globs = globs.into_iter().map(Into::into).collect();
        self
    }

    /// The preamble written at the top of each of this rule's files.
    pub fn frontmatter(&self) -> String {
        render_frontmatter(self.trigger, &self.globs)
    }

    /// Expand this entry to its concrete document list.
    ///
    /// Static `docs` come first, then the `docs_dir` listing. A missing
    /// `docs_dir` is an error; missing static documents are not checked here.
    pub fn resolve_docs(&self, root: &NormalizedPath) -> Result<Vec<String>> {
        let mut docs = self.docs.clone();

        if let Some(dir) = &self.docs_dir {
            let dir = dir.trim_end_matches('/');
            let native = root.join(dir);
            let names = io::list_files_with_extension(&native, DOC_EXTENSION).map_err(|e| {
                if e.is_not_found() {
                    Error::DocsDirNotFound {
                        rule: self.name.clone(),
                        path: native.to_native(),
                    }
                } else {
                    Error::Fs(e)
                }
            })?;
            docs.extend(names.into_iter().map(|name| format!("{}/{}", dir, name)));
        }

        Ok(docs)
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_mapping("rule name must not be empty"));
        }
        if self.name.contains('/') || self.name.contains('\\') {
            return Err(Error::invalid_mapping(format!(
                "rule name {} must be a plain file name",
                self.name
            )));
        }
        if self.docs.is_empty() && self.docs_dir.is_none() {
            return Err(Error::invalid_mapping(format!(
                "rule {} lists no documents",
                self.name
            )));
        }
        Ok(())
    }
}

/// An entry with its documents resolved against a repository root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRule {
    pub name: String,
    pub trigger: Trigger,
    pub docs: Vec<String>,
}

/// Ordered, validated list of rule entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMapping {
    entries: Vec<RuleEntry>,
}

impl RuleMapping {
    /// Build a mapping, rejecting empty or duplicate names and entries
    /// without documents.
    pub fn new(entries: Vec<RuleEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            entry.validate()?;
            if !seen.insert(entry.name.as_str()) {
                return Err(Error::invalid_mapping(format!(
                    "duplicate rule name {}",
                    entry.name
                )));
            }
        }
        Ok(Self { entries })
    }

    /// The documentation table this tool was written for.
    pub fn builtin() -> Self {
        let entries = vec![
            RuleEntry::new("ab-testing-docs.md", ["docs/architecture/ab-testing.md"]),
            RuleEntry::new("admin-api-docs.md", ["docs/architecture/admin-api.md"]),
            RuleEntry::new(
                "admin-controller-docs.md",
                ["docs/modules/server/admin-controller.md"],
            ),
            RuleEntry::new("agents-md.md", ["AGENTS.md"]),
            RuleEntry::new("architecture-docs.md", ["docs/ARCHITECTURE.md"]),
            RuleEntry::new("codebase-map.md", ["docs/CODEBASE_MAP.md"]),
            RuleEntry::new(
                "component-cache-docs.md",
                ["docs/modules/server/component-cache.md"],
            ),
            RuleEntry::new(
                "credential-storage-docs.md",
                ["docs/modules/utils/credential-store.md"],
            ),
            RuleEntry::new("credential-storage-guide.md", ["docs/CREDENTIAL_STORAGE.md"]),
            RuleEntry::new("llm-client-docs.md", ["docs/modules/llm/client.md"]),
            RuleEntry::new("llm-factory-docs.md", ["docs/modules/llm/factory.md"]),
            RuleEntry::new("llm-pipeline-docs.md", ["docs/architecture/llm-pipeline.md"]),
            RuleEntry::from_dir("llm-provider-docs.md", "docs/modules/llm/providers"),
            RuleEntry::new("macos-app-docs.md", ["docs/macos-app.md"]),
            RuleEntry::new("notarization-docs.md", ["docs/NOTARIZATION.md"]),
            RuleEntry::new(
                "rest-api-controller-docs.md",
                ["docs/modules/server/rest-api-controller.md"],
            ),
            RuleEntry::new(
                "runtime-config-docs.md",
                ["docs/modules/config/runtime-config.md"],
            ),
            RuleEntry::new("server-core-docs.md", ["docs/modules/server/server.md"]),
            RuleEntry::new(
                "session-lifecycle-docs.md",
                ["docs/architecture/session-lifecycle.md"],
            ),
            RuleEntry::new("session-store-docs.md", ["docs/modules/server/session-store.md"]),
            RuleEntry::new(
                "token-optimization-docs.md",
                ["docs/architecture/token-optimization.md"],
            ),
            RuleEntry::new("transition-ux-docs.md", ["docs/architecture/transition-ux.md"]),
            RuleEntry::new(
                "virtual-rest-api-docs.md",
                ["docs/architecture/virtual-rest-api.md"],
            ),
        ];
        Self { entries }
    }

    pub fn entries(&self) -> &[RuleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&RuleEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Resolve every entry's document list, in mapping order.
    pub fn resolve(&self, root: &NormalizedPath) -> Result<Vec<ResolvedRule>> {
        self.entries
            .iter()
            .map(|entry| {
                Ok(ResolvedRule {
                    name: entry.name.clone(),
                    trigger: entry.trigger,
                    docs: entry.resolve_docs(root)?,
                })
            })
            .collect()
    }
}

impl Default for RuleMapping {
    fn default() -> Self {
        Self::builtin()
    }
}
