//! Shared test utilities for the rulesync workspace.
//!
//! Dev-dependency only. [`DocTree`] builds a temporary repository with a
//! documentation tree and an `.agent/rules` directory.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Preamble of an `always_on` rule file.
pub const ALWAYS_ON: &str = "---\ntrigger: always_on\nglobs: **/*\n---\n";

/// A temporary repository with helpers for documentation fixtures.
///
/// # Example
///
/// ```rust,no_run
/// use rulesync_test_utils::DocTree;
///
/// let tree = DocTree::new().with_rules_dir();
/// tree.write("AGENTS.md", "# Agents\n");
/// tree.write("docs/ARCHITECTURE.md", "See [x](docs/setup.md).\n");
/// tree.assert_file_exists("AGENTS.md");
/// ```
pub struct DocTree {
    temp_dir: TempDir,
}

impl Default for DocTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DocTree {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Copy a fixture directory into a fresh temporary repository.
    pub fn from_fixture(fixture: &Path) -> Self {
        let tree = Self::new();
        copy_dir(fixture, tree.root());
        tree
    }

    /// Create `.agent/rules/`.
    pub fn with_rules_dir(self) -> Self {
        fs::create_dir_all(self.rules_dir()).unwrap();
        self
    }

    /// Create `AGENTS.md` and `docs/ARCHITECTURE.md` with minimal content.
    pub fn with_auxiliary_sources(self) -> Self {
        self.write("AGENTS.md", "# Agents\n\nSee [setup](docs/setup.md).\n");
        self.write(
            "docs/ARCHITECTURE.md",
            "# Architecture\n\nSee [server](docs/modules/server/server.md).\n",
        );
        self
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn rules_dir(&self) -> PathBuf {
        self.root().join(".agent/rules")
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
    }

    pub fn read(&self, rel: &str) -> String {
        let path = self.root().join(rel);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e))
    }

    /// Read a file from `.agent/rules/`.
    pub fn read_rule(&self, name: &str) -> String {
        self.read(&format!(".agent/rules/{}", name))
    }

    /// Sorted file names in `.agent/rules/`.
    pub fn rule_files(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.rules_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    pub fn assert_file_exists(&self, rel: &str) {
        let path = self.root().join(rel);
        assert!(path.exists(), "expected {} to exist", path.display());
    }

    pub fn assert_file_missing(&self, rel: &str) {
        let path = self.root().join(rel);
        assert!(!path.exists(), "expected {} not to exist", path.display());
    }
}

fn copy_dir(from: &Path, to: &Path) {
    for entry in fs::read_dir(from)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {}", from.display(), e))
    {
        let entry = entry.unwrap();
        let target = to.join(entry.file_name());
        if entry.file_type().unwrap().is_dir() {
            fs::create_dir_all(&target).unwrap();
            copy_dir(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), &target).unwrap();
        }
    }
}

/// Strip the leading `preamble` plus separator newline from a rule file.
pub fn strip_preamble<'a>(file: &'a str, preamble: &str) -> &'a str {
    file.strip_prefix(preamble)
        .and_then(|rest| rest.strip_prefix('\n'))
        .unwrap_or_else(|| panic!("rule file does not start with the preamble:\n{}", file))
}
