//! The rule synchronizer
//!
//! Every rule is rendered in memory first, so a mapping whose outputs
//! collide fails before anything is written. Then, for each mapping entry in
//! order, its chunk files are written and leftover `-partN` files from an
//! earlier run are removed. The auxiliary copies follow once every rule is
//! written.

use std::collections::{HashMap, HashSet};

use rulesync_fs::checksum::{compute_bytes_checksum, compute_file_checksum};
use rulesync_fs::{NormalizedPath, io};
use similar::TextDiff;

use crate::config::{AuxiliaryCopy, SyncConfig};
use crate::links::{rewrite_doc_links, should_rewrite};
use crate::mapping::RuleEntry;
use crate::report::{CheckReport, CopiedFile, DriftItem, RuleOutcome, SyncReport, WrittenFile};
use crate::split::{char_len, chunk_budget, is_part_file_name, part_file_name, split_content};
use crate::{Error, Result};

/// Options for a sync run
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Do all the reading and rendering, write nothing
    pub dry_run: bool,
    /// Create the rules directory instead of failing when it is absent
    pub create_rules_dir: bool,
}

/// Options for a check run
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckOptions {
    /// Attach a unified diff to every drifted item
    pub with_diff: bool,
}

/// Progress of a running sync, reported as each step completes.
#[derive(Debug, Clone, Copy)]
pub enum SyncEvent<'a> {
    /// A rule's files were written (or rendered, in a dry run)
    Rule(&'a RuleOutcome),
    /// An auxiliary file was copied
    Auxiliary(&'a CopiedFile),
}

/// Concatenated documents for one rule, before chunking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombinedBody {
    pub content: String,
    pub missing_docs: Vec<String>,
}

/// One output file with its full content (preamble included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub name: String,
    pub path: NormalizedPath,
    pub content: String,
    /// Chunk length in characters, excluding the preamble
    pub chars: usize,
}

/// Every output file for one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRule {
    pub rule: String,
    pub files: Vec<RenderedFile>,
    pub missing_docs: Vec<String>,
}

impl RenderedRule {
    fn outcome(&self, stale_parts: Vec<String>) -> RuleOutcome {
        RuleOutcome {
            rule: self.rule.clone(),
            files: self
                .files
                .iter()
                .map(|f| WrittenFile {
                    name: f.name.clone(),
                    path: f.path.to_string(),
                    chars: f.chars,
                })
                .collect(),
            missing_docs: self.missing_docs.clone(),
            stale_parts,
        }
    }
}

/// Synchronizes `.agent/rules` with the documentation it is built from.
pub struct RuleSynchronizer {
    config: SyncConfig,
}

impl RuleSynchronizer {
    pub fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Concatenate a rule's documents, each under a `# Content from` header.
    ///
    /// Missing documents are skipped with a warning.
    pub fn combine_documents(&self, entry: &RuleEntry) -> Result<CombinedBody> {
        let root = &self.config.root;
        let mut body = CombinedBody::default();

        for doc in entry.resolve_docs(root)? {
            let path = root.join(&doc);
            if !path.exists() {
                tracing::warn!(rule = %entry.name, doc = %doc, "doc file not found");
                body.missing_docs.push(doc);
                continue;
            }

            let mut text = io::read_text(&path)?;
            if should_rewrite(
                &doc,
                &entry.name,
                &self.config.architecture_marker,
                self.config.legacy_architecture_rule.as_deref(),
            ) {
                tracing::debug!(rule = %entry.name, doc = %doc, "rewriting docs links");
                text = rewrite_doc_links(&text);
            }

            body.content
                .push_str(&format!("\n# Content from {}\n\n{}\n", doc, text));
        }

        Ok(body)
    }

    /// Render every output file for a rule without touching the disk.
    pub fn render_rule(&self, entry: &RuleEntry) -> Result<RenderedRule> {
        let preamble = entry.frontmatter();
        let budget = chunk_budget(self.config.max_chars, &preamble, self.config.safety_margin)
            .ok_or_else(|| Error::ChunkBudgetExhausted {
                rule: entry.name.clone(),
                max_chars: self.config.max_chars,
                preamble_chars: char_len(&preamble),
                safety_margin: self.config.safety_margin,
            })?;

        let body = self.combine_documents(entry)?;
        let chunks = split_content(&body.content, budget);
        let total = chunks.len();
        tracing::debug!(rule = %entry.name, budget, chunks = total, "split rule content");

        let rules_path = self.config.rules_path();
        let files = chunks
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| {
                let name = part_file_name(&entry.name, i + 1, total);
                RenderedFile {
                    path: rules_path.join(&name),
                    content: format!("{}\n{}", preamble, chunk),
                    chars: char_len(chunk),
                    name,
                }
            })
            .collect();

        Ok(RenderedRule {
            rule: entry.name.clone(),
            files,
            missing_docs: body.missing_docs,
        })
    }

    /// Render every rule in mapping order.
    ///
    /// Fails with [`Error::InvalidMapping`] when two outputs of the run,
    /// rule chunks or auxiliary copies, would land on the same file.
    pub fn render_all(&self) -> Result<Vec<RenderedRule>> {
        let rendered = self
            .config
            .mapping
            .entries()
            .iter()
            .map(|entry| self.render_rule(entry))
            .collect::<Result<Vec<_>>>()?;
        ensure_unique_outputs(&rendered, &self.config.auxiliary)?;
        Ok(rendered)
    }

    /// Rewrite every rule file and auxiliary copy.
    pub fn sync(&self, options: SyncOptions) -> Result<SyncReport> {
        self.sync_with_progress(options, |_| {})
    }

    /// Like [`sync`](Self::sync), calling `on_event` after each rule and
    /// each auxiliary copy so progress is visible before the run ends.
    pub fn sync_with_progress<F>(&self, options: SyncOptions, mut on_event: F) -> Result<SyncReport>
    where
        F: FnMut(SyncEvent<'_>),
    {
        self.ensure_root()?;
        self.prepare_rules_dir(options)?;

        tracing::info!(
            rules = self.config.mapping.len(),
            dry_run = options.dry_run,
            "processing rules"
        );

        let rendered = self.render_all()?;
        let produced = output_names(&rendered, &self.config.auxiliary);
        let existing = self.existing_outputs()?;

        let mut report = SyncReport {
            dry_run: options.dry_run,
            ..SyncReport::default()
        };

        for rule in &rendered {
            tracing::info!(rule = %rule.rule, "processing rule");

            if !options.dry_run {
                for file in &rule.files {
                    io::write_text(&file.path, &file.content)?;
                    tracing::info!(file = %file.name, chars = file.chars, "written");
                }
            }

            let stale = stale_parts(&rule.rule, &existing, &produced);
            if !options.dry_run {
                for name in &stale {
                    io::remove_file(&self.config.rules_path().join(name))?;
                    tracing::info!(file = %name, "removed stale part");
                }
            }

            let outcome = rule.outcome(stale);
            on_event(SyncEvent::Rule(&outcome));
            report.rules.push(outcome);
        }

        for aux in &self.config.auxiliary {
            let copied = self.copy_auxiliary(aux, options.dry_run)?;
            on_event(SyncEvent::Auxiliary(&copied));
            report.auxiliary.push(copied);
        }

        tracing::info!(files = report.file_count(), "rules synchronized");
        Ok(report)
    }

    /// Compare the rules directory with what a sync would write.
    ///
    /// Leftover `-partN` files a sync would remove count as drift.
    pub fn check(&self, options: CheckOptions) -> Result<CheckReport> {
        self.ensure_root()?;

        let rendered = self.render_all()?;
        let produced = output_names(&rendered, &self.config.auxiliary);
        let existing = self.existing_outputs()?;

        let mut drifted = Vec::new();
        let mut missing = Vec::new();

        for rule in &rendered {
            for file in &rule.files {
                let expected = file.content.as_bytes();
                match compare(&rule.rule, &file.name, &file.path, expected, options)? {
                    Comparison::Matches => {}
                    Comparison::Missing(item) => missing.push(item),
                    Comparison::Drifted(item) => drifted.push(item),
                }
            }
            for name in stale_parts(&rule.rule, &existing, &produced) {
                drifted.push(DriftItem {
                    owner: rule.rule.clone(),
                    file: name,
                    description: "stale part file not produced by the current mapping"
                        .to_string(),
                    diff: None,
                });
            }
        }

        for aux in &self.config.auxiliary {
            let expected = self.auxiliary_content(aux)?;
            let dest = self.config.rules_path().join(aux.file_name());
            match compare(&aux.source, aux.file_name(), &dest, &expected, options)? {
                Comparison::Matches => {}
                Comparison::Missing(item) => missing.push(item),
                Comparison::Drifted(item) => drifted.push(item),
            }
        }

        let report = CheckReport::from_items(drifted, missing);
        tracing::info!(status = ?report.status, "check complete");
        Ok(report)
    }

    fn ensure_root(&self) -> Result<()> {
        if !self.config.root.is_dir() {
            return Err(Error::RootNotFound {
                path: self.config.root.to_native(),
            });
        }
        Ok(())
    }

    fn prepare_rules_dir(&self, options: SyncOptions) -> Result<()> {
        let rules_path = self.config.rules_path();
        if rules_path.is_dir() {
            return Ok(());
        }
        if !options.create_rules_dir {
            return Err(Error::RulesDirNotFound {
                path: rules_path.to_native(),
            });
        }
        if !options.dry_run {
            tracing::info!(path = %rules_path, "creating rules directory");
            io::ensure_dir(&rules_path)?;
        }
        Ok(())
    }

    /// File names currently in the rules directory; none when it is absent.
    fn existing_outputs(&self) -> Result<Vec<String>> {
        match io::list_files(&self.config.rules_path()) {
            Ok(names) => Ok(names),
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Expected bytes of an auxiliary copy.
    fn auxiliary_content(&self, aux: &AuxiliaryCopy) -> Result<Vec<u8>> {
        let source = self.config.root.join(&aux.source);
        let not_found = |e: rulesync_fs::Error| {
            if e.is_not_found() {
                Error::AuxiliaryNotFound {
                    path: source.to_native(),
                }
            } else {
                Error::Fs(e)
            }
        };

        if aux.rewrite_links {
            let text = io::read_text(&source).map_err(not_found)?;
            Ok(rewrite_doc_links(&text).into_bytes())
        } else {
            io::read_bytes(&source).map_err(not_found)
        }
    }

    fn copy_auxiliary(&self, aux: &AuxiliaryCopy, dry_run: bool) -> Result<CopiedFile> {
        let content = self.auxiliary_content(aux)?;
        let dest = self.config.rules_path().join(aux.file_name());

        if !dry_run {
            io::write_atomic(&dest, &content)?;
            tracing::info!(source = %aux.source, dest = %dest, "copied");
        }

        Ok(CopiedFile {
            source: aux.source.clone(),
            path: dest.to_string(),
            rewritten: aux.rewrite_links,
        })
    }
}

/// Every file name a run writes, rule chunks and auxiliary copies alike.
fn output_names<'a>(rendered: &'a [RenderedRule], auxiliary: &'a [AuxiliaryCopy]) -> HashSet<&'a str> {
    rendered
        .iter()
        .flat_map(|rule| rule.files.iter().map(|f| f.name.as_str()))
        .chain(auxiliary.iter().map(AuxiliaryCopy::file_name))
        .collect()
}

fn ensure_unique_outputs(rendered: &[RenderedRule], auxiliary: &[AuxiliaryCopy]) -> Result<()> {
    let outputs = rendered
        .iter()
        .flat_map(|rule| {
            rule.files
                .iter()
                .map(move |f| (f.name.as_str(), rule.rule.as_str()))
        })
        .chain(auxiliary.iter().map(|aux| (aux.file_name(), aux.source.as_str())));

    let mut owners: HashMap<&str, &str> = HashMap::new();
    for (name, owner) in outputs {
        if let Some(previous) = owners.insert(name, owner) {
            return Err(Error::invalid_mapping(format!(
                "{} and {} both write {}",
                previous, owner, name
            )));
        }
    }
    Ok(())
}

/// Part files of `rule` present on disk that the current run does not write.
fn stale_parts(rule: &str, existing: &[String], produced: &HashSet<&str>) -> Vec<String> {
    existing
        .iter()
        .filter(|name| is_part_file_name(rule, name) && !produced.contains(name.as_str()))
        .cloned()
        .collect()
}

enum Comparison {
    Matches,
    Missing(DriftItem),
    Drifted(DriftItem),
}

fn compare(
    owner: &str,
    name: &str,
    path: &NormalizedPath,
    expected: &[u8],
    options: CheckOptions,
) -> Result<Comparison> {
    if !path.is_file() {
        return Ok(Comparison::Missing(DriftItem {
            owner: owner.to_string(),
            file: name.to_string(),
            description: "file does not exist".to_string(),
            diff: None,
        }));
    }

    let actual_checksum = compute_file_checksum(path)?;
    let expected_checksum = compute_bytes_checksum(expected);
    if actual_checksum == expected_checksum {
        return Ok(Comparison::Matches);
    }

    let diff = if options.with_diff {
        let actual = io::read_bytes(path)?;
        Some(unified_diff(name, &actual, expected))
    } else {
        None
    };

    Ok(Comparison::Drifted(DriftItem {
        owner: owner.to_string(),
        file: name.to_string(),
        description: format!("expected {}, found {}", expected_checksum, actual_checksum),
        diff,
    }))
}

fn unified_diff(name: &str, actual: &[u8], expected: &[u8]) -> String {
    let actual = String::from_utf8_lossy(actual);
    let expected = String::from_utf8_lossy(expected);
    TextDiff::from_lines(&*actual, &*expected)
        .unified_diff()
        .context_radius(3)
        .header(&format!("{} (on disk)", name), &format!("{} (expected)", name))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::RuleMapping;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn setup(mapping: Vec<RuleEntry>) -> (TempDir, RuleSynchronizer) {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".agent/rules")).unwrap();
        fs::create_dir_all(temp.path().join("docs")).unwrap();
        let config = SyncConfig::new(NormalizedPath::new(temp.path()))
            .with_mapping(RuleMapping::new(mapping).unwrap())
            .with_auxiliary(vec![]);
        (temp, RuleSynchronizer::new(config))
    }

    #[test]
    fn combine_adds_headers_in_order() {
        let (temp, sync) = setup(vec![RuleEntry::new("r.md", ["docs/a.md", "docs/b.md"])]);
        fs::write(temp.path().join("docs/a.md"), "A").unwrap();
        fs::write(temp.path().join("docs/b.md"), "B").unwrap();

        let entry = &sync.config().mapping.entries()[0];
        let body = sync.combine_documents(entry).unwrap();
        assert_eq!(
            body.content,
            "\n# Content from docs/a.md\n\nA\n\n# Content from docs/b.md\n\nB\n"
        );
        assert!(body.missing_docs.is_empty());
    }

    #[test]
    fn combine_skips_missing() {
        let (temp, sync) = setup(vec![RuleEntry::new("r.md", ["docs/a.md", "docs/gone.md"])]);
        fs::write(temp.path().join("docs/a.md"), "A").unwrap();

        let entry = &sync.config().mapping.entries()[0];
        let body = sync.combine_documents(entry).unwrap();
        assert_eq!(body.content, "\n# Content from docs/a.md\n\nA\n");
        assert_eq!(body.missing_docs, vec!["docs/gone.md"]);
    }

    #[test]
    fn combine_rewrites_architecture_only() {
        let (temp, sync) = setup(vec![RuleEntry::new(
            "r.md",
            ["docs/ARCHITECTURE.md", "docs/other.md"],
        )]);
        fs::write(temp.path().join("docs/ARCHITECTURE.md"), "[a](docs/x.md)").unwrap();
        fs::write(temp.path().join("docs/other.md"), "[b](docs/y.md)").unwrap();

        let entry = &sync.config().mapping.entries()[0];
        let body = sync.combine_documents(entry).unwrap();
        assert!(body.content.contains("[a](../../docs/x.md)"));
        assert!(body.content.contains("[b](docs/y.md)"));
    }

    #[test]
    fn legacy_rule_rewrites_every_document() {
        let (temp, sync) = setup(vec![RuleEntry::new(
            "read-architecture-docs.md",
            ["docs/other.md"],
        )]);
        fs::write(temp.path().join("docs/other.md"), "[b](docs/y.md)").unwrap();

        let entry = &sync.config().mapping.entries()[0];
        let body = sync.combine_documents(entry).unwrap();
        assert!(body.content.contains("[b](../../docs/y.md)"));
    }

    #[test]
    fn render_single_chunk_keeps_name() {
        let (temp, sync) = setup(vec![RuleEntry::new("r.md", ["docs/a.md"])]);
        fs::write(temp.path().join("docs/a.md"), "hello").unwrap();

        let rendered = sync.render_rule(&sync.config().mapping.entries()[0]).unwrap();
        assert_eq!(rendered.files.len(), 1);
        assert_eq!(rendered.files[0].name, "r.md");
        assert_eq!(
            rendered.files[0].content,
            "---\ntrigger: always_on\nglobs: **/*\n---\n\n\n# Content from docs/a.md\n\nhello\n"
        );
    }

    #[test]
    fn render_fails_when_budget_exhausted() {
        let (temp, sync) = setup(vec![RuleEntry::new("r.md", ["docs/a.md"])]);
        fs::write(temp.path().join("docs/a.md"), "hello").unwrap();
        let config = sync.config().clone().with_max_chars(100);
        let sync = RuleSynchronizer::new(config);

        let err = sync
            .render_rule(&sync.config().mapping.entries()[0])
            .unwrap_err();
        assert!(matches!(err, Error::ChunkBudgetExhausted { .. }));
    }

    #[test]
    fn unified_diff_marks_changes() {
        let diff = unified_diff("r.md", b"a\nb\n", b"a\nc\n");
        assert!(diff.contains("-b"));
        assert!(diff.contains("+c"));
    }

    fn long_doc() -> String {
        "line of text\n".repeat(60)
    }

    #[test]
    fn render_all_rejects_chunk_named_like_another_rule() {
        let (temp, sync) = setup(vec![
            RuleEntry::new("a.md", ["docs/a.md"]),
            RuleEntry::new("a-part1.md", ["docs/b.md"]),
        ]);
        fs::write(temp.path().join("docs/a.md"), long_doc()).unwrap();
        fs::write(temp.path().join("docs/b.md"), "B").unwrap();
        let sync = RuleSynchronizer::new(sync.config().clone().with_max_chars(400));

        let err = sync.sync(SyncOptions::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidMapping { .. }));
        assert!(err.to_string().contains("a-part1.md"));
        assert!(!temp.path().join(".agent/rules/a-part2.md").exists());
    }

    #[test]
    fn render_all_rejects_rule_named_like_auxiliary_copy() {
        let (temp, sync) = setup(vec![RuleEntry::new("AGENTS.md", ["docs/a.md"])]);
        fs::write(temp.path().join("docs/a.md"), "A").unwrap();
        fs::write(temp.path().join("AGENTS.md"), "agents").unwrap();
        let config = sync
            .config()
            .clone()
            .with_auxiliary(vec![AuxiliaryCopy::verbatim("AGENTS.md")]);
        let sync = RuleSynchronizer::new(config);

        let err = sync.render_all().unwrap_err();
        assert!(matches!(err, Error::InvalidMapping { .. }));
        let err = sync.check(CheckOptions::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidMapping { .. }));
        assert!(!temp.path().join(".agent/rules/AGENTS.md").exists());
    }

    #[test]
    fn sync_removes_stale_parts_after_shrink() {
        let (temp, sync) = setup(vec![RuleEntry::new("r.md", ["docs/a.md"])]);
        let sync = RuleSynchronizer::new(sync.config().clone().with_max_chars(400));
        let rules = temp.path().join(".agent/rules");

        fs::write(temp.path().join("docs/a.md"), long_doc()).unwrap();
        let first = sync.sync(SyncOptions::default()).unwrap();
        let parts = first.rules[0].files.len();
        assert!(parts > 2);
        assert!(rules.join("r-part2.md").exists());

        fs::write(temp.path().join("docs/a.md"), "short").unwrap();
        let second = sync.sync(SyncOptions::default()).unwrap();
        assert_eq!(second.rules[0].files.len(), 1);
        assert_eq!(second.rules[0].stale_parts.len(), parts);
        assert!(rules.join("r.md").exists());
        for i in 1..=parts {
            assert!(!rules.join(format!("r-part{}.md", i)).exists());
        }
    }

    #[test]
    fn dry_run_lists_stale_parts_without_removing() {
        let (temp, sync) = setup(vec![RuleEntry::new("r.md", ["docs/a.md"])]);
        fs::write(temp.path().join("docs/a.md"), "short").unwrap();
        fs::write(temp.path().join(".agent/rules/r-part3.md"), "old").unwrap();
        fs::write(temp.path().join(".agent/rules/other-part1.md"), "keep").unwrap();

        let report = sync
            .sync(SyncOptions {
                dry_run: true,
                ..SyncOptions::default()
            })
            .unwrap();
        assert_eq!(report.rules[0].stale_parts, vec!["r-part3.md"]);
        assert!(temp.path().join(".agent/rules/r-part3.md").exists());
    }

    #[test]
    fn check_reports_stale_parts_as_drift() {
        let (temp, sync) = setup(vec![RuleEntry::new("r.md", ["docs/a.md"])]);
        fs::write(temp.path().join("docs/a.md"), "short").unwrap();
        sync.sync(SyncOptions::default()).unwrap();
        assert!(sync.check(CheckOptions::default()).unwrap().is_healthy());

        fs::write(temp.path().join(".agent/rules/r-part2.md"), "old").unwrap();
        let report = sync.check(CheckOptions::default()).unwrap();
        assert!(!report.is_healthy());
        assert_eq!(report.drifted.len(), 1);
        assert_eq!(report.drifted[0].file, "r-part2.md");
        assert_eq!(report.drifted[0].owner, "r.md");

        sync.sync(SyncOptions::default()).unwrap();
        assert!(sync.check(CheckOptions::default()).unwrap().is_healthy());
    }

    #[test]
    fn sync_reports_progress_in_order() {
        let (temp, sync) = setup(vec![
            RuleEntry::new("a.md", ["docs/a.md"]),
            RuleEntry::new("b.md", ["docs/b.md"]),
        ]);
        fs::write(temp.path().join("docs/a.md"), "A").unwrap();
        fs::write(temp.path().join("docs/b.md"), "B").unwrap();
        fs::write(temp.path().join("AGENTS.md"), "agents").unwrap();
        let config = sync
            .config()
            .clone()
            .with_auxiliary(vec![AuxiliaryCopy::verbatim("AGENTS.md")]);
        let sync = RuleSynchronizer::new(config);

        let mut seen = Vec::new();
        sync.sync_with_progress(SyncOptions::default(), |event| match event {
            SyncEvent::Rule(outcome) => seen.push(outcome.rule.clone()),
            SyncEvent::Auxiliary(copied) => seen.push(copied.source.clone()),
        })
        .unwrap();
        assert_eq!(seen, vec!["a.md", "b.md", "AGENTS.md"]);
    }
}
