//! Relative link rewriting for documents copied into the rules directory.
//!
//! Rule files live two levels below the repository root (`.agent/rules/`),
//! so a Markdown link written relative to the root, `](docs/...)`, has to
//! climb two directories to keep resolving. This is a literal substring
//! substitution; Markdown structure is not parsed.

/// Link prefix as written in root-relative documentation.
pub const DOCS_LINK_PREFIX: &str = "](docs/";

/// The same prefix as seen from `.agent/rules/`.
pub const RULES_DOCS_LINK_PREFIX: &str = "](../../docs/";

/// Replace every `](docs/` with `](../../docs/`.
pub fn rewrite_doc_links(text: &str) -> String {
    text.replace(DOCS_LINK_PREFIX, RULES_DOCS_LINK_PREFIX)
}

/// Whether a document's links are rewritten when it is folded into a rule.
///
/// Applies to the architecture document itself (any path containing
/// `architecture_marker`) and to every document of the legacy
/// architecture rule.
pub fn should_rewrite(
    doc_path: &str,
    rule_name: &str,
    architecture_marker: &str,
    legacy_rule: Option<&str>,
) -> bool {
    doc_path.contains(architecture_marker) || legacy_rule == Some(rule_name)
}
