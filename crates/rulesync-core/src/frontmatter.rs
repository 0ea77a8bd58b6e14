//! Frontmatter preamble written at the top of every rule file.

use serde::{Deserialize, Serialize};

/// Preamble used by every rule with the default `always_on` trigger.
pub const ALWAYS_ON_FRONTMATTER: &str = "---\ntrigger: always_on\nglobs: **/*\n---\n";

/// When the assistant loads a rule file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Loaded for every file in the workspace
    #[default]
    AlwaysOn,
    /// Loaded only when a file matching one of the rule's globs is open
    Glob,
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlwaysOn => write!(f, "always_on"),
            Self::Glob => write!(f, "glob"),
        }
    }
}

/// Render the `---` delimited preamble for a rule.
///
/// Globs are anchored with a `**/` prefix. A glob rule without globs falls
/// back to matching everything.
pub fn render_frontmatter(trigger: Trigger, globs: &[String]) -> String {
    match trigger {
        Trigger::AlwaysOn => ALWAYS_ON_FRONTMATTER.to_string(),
        Trigger::Glob => {
            let globs = if globs.is_empty() {
                "**/*".to_string()
            } else {
                globs
                    .iter()
                    .map(|g| format!("**/{}", g))
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            format!("---\ntrigger: glob\nglobs: {}\n---\n", globs)
        }
    }
}
