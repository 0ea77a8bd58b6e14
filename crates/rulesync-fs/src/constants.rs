//! Well-known paths inside a documented repository.

/// Standard locations used by the rule synchronizer, relative to the
/// repository root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulesPath {
    /// The `.agent/rules` output directory
    RulesDir,
    /// The optional rule manifest, `.agent/rulesync.toml`
    Manifest,
    /// The top-level `AGENTS.md`
    AgentsFile,
    /// The architecture overview, `docs/ARCHITECTURE.md`
    ArchitectureDoc,
}

impl RulesPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RulesDir => ".agent/rules",
            Self::Manifest => ".agent/rulesync.toml",
            Self::AgentsFile => "AGENTS.md",
            Self::ArchitectureDoc => "docs/ARCHITECTURE.md",
        }
    }
}
