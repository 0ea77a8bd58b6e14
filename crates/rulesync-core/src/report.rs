//! Reports produced by sync and check runs

use serde::{Deserialize, Serialize};

/// A rule chunk written (or, in a dry run, about to be written).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrittenFile {
    /// File name inside the rules directory
    pub name: String,
    /// Full output path
    pub path: String,
    /// Chunk length in characters, excluding the preamble
    pub chars: usize,
}

/// What happened to one rule entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule: String,
    pub files: Vec<WrittenFile>,
    /// Mapped documents that did not exist and were skipped
    pub missing_docs: Vec<String>,
    /// Leftover `-partN` files from an earlier, larger run that were removed
    /// (or, in a dry run, would be)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stale_parts: Vec<String>,
}

impl RuleOutcome {
    pub fn is_chunked(&self) -> bool {
        self.files.len() > 1
    }
}

/// An auxiliary file copied into the rules directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopiedFile {
    pub source: String,
    pub path: String,
    pub rewritten: bool,
}

/// Result of a sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub dry_run: bool,
    pub rules: Vec<RuleOutcome>,
    pub auxiliary: Vec<CopiedFile>,
}

impl SyncReport {
    /// Number of rule files plus auxiliary copies.
    pub fn file_count(&self) -> usize {
        self.rules.iter().map(|r| r.files.len()).sum::<usize>() + self.auxiliary.len()
    }

    /// `(rule, document)` pairs for every skipped document.
    pub fn warnings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rules.iter().flat_map(|r| {
            r.missing_docs
                .iter()
                .map(move |doc| (r.rule.as_str(), doc.as_str()))
        })
    }
}

/// Status of a check run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStatus {
    /// Every output matches what a sync would write
    Healthy,
    /// Some outputs do not exist
    Missing,
    /// Some outputs differ from what a sync would write
    Drifted,
}

/// An output file that is missing or out of date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftItem {
    /// Owning rule, or the auxiliary source path
    pub owner: String,
    pub file: String,
    pub description: String,
    /// Unified diff from the file on disk to the expected content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

/// Result of a check run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    pub status: CheckStatus,
    pub drifted: Vec<DriftItem>,
    pub missing: Vec<DriftItem>,
}

impl CheckReport {
    /// Build a report; drift outranks missing files.
    pub fn from_items(drifted: Vec<DriftItem>, missing: Vec<DriftItem>) -> Self {
        let status = if !drifted.is_empty() {
            CheckStatus::Drifted
        } else if !missing.is_empty() {
            CheckStatus::Missing
        } else {
            CheckStatus::Healthy
        };
        Self {
            status,
            drifted,
            missing,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == CheckStatus::Healthy
    }
}
