//! Golden-file tests using test-fixtures/
//!
//! The docs-site fixture is copied into a temporary directory, synced with
//! its own manifest, and every output is compared with test-fixtures/expected/.

use pretty_assertions::assert_eq;
use rulesync_core::{CheckOptions, RuleSynchronizer, SyncConfig, SyncOptions, Trigger};
use rulesync_fs::NormalizedPath;
use rulesync_test_utils::DocTree;
use std::fs;
use std::path::PathBuf;

fn normalize_line_endings(s: &str) -> String {
    s.replace("\r\n", "\n")
}

/// Path to the test-fixtures directory (relative to the workspace root).
fn fixtures_dir() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    // crates/rulesync-core -> ../../test-fixtures
    manifest_dir.join("../../test-fixtures")
}

fn expected_dir() -> PathBuf {
    fixtures_dir().join("expected/docs-site")
}

fn synced_tree() -> (DocTree, RuleSynchronizer) {
    let tree = DocTree::from_fixture(&fixtures_dir().join("repos/docs-site"));
    let config = SyncConfig::load(NormalizedPath::new(tree.root()), None).unwrap();
    let sync = RuleSynchronizer::new(config);
    sync.sync(SyncOptions {
        create_rules_dir: true,
        ..SyncOptions::default()
    })
    .unwrap();
    (tree, sync)
}

#[test]
fn test_fixture_manifest_is_discovered() {
    let tree = DocTree::from_fixture(&fixtures_dir().join("repos/docs-site"));
    let config = SyncConfig::load(NormalizedPath::new(tree.root()), None).unwrap();

    assert_eq!(config.max_chars, 400);
    assert_eq!(config.mapping.len(), 4);
    let server = config.mapping.get("server-docs.md").unwrap();
    assert_eq!(server.trigger, Trigger::Glob);
    assert_eq!(server.globs, vec!["src/server/*.ts"]);
}

#[test]
fn test_fixture_output_file_set() {
    let (tree, _) = synced_tree();

    let mut expected: Vec<String> = fs::read_dir(expected_dir())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    expected.sort();

    assert_eq!(tree.rule_files(), expected);
}

#[test]
fn test_fixture_outputs_match_golden_files() {
    let (tree, _) = synced_tree();

    for name in tree.rule_files() {
        let expected = fs::read_to_string(expected_dir().join(&name))
            .unwrap_or_else(|e| panic!("no golden file for {}: {}", name, e));
        assert_eq!(
            normalize_line_endings(&tree.read_rule(&name)),
            normalize_line_endings(&expected),
            "mismatch in {}",
            name
        );
    }
}

#[test]
fn test_fixture_reports_missing_codebase_map() {
    let tree = DocTree::from_fixture(&fixtures_dir().join("repos/docs-site"));
    let config = SyncConfig::load(NormalizedPath::new(tree.root()), None).unwrap();
    let report = RuleSynchronizer::new(config)
        .sync(SyncOptions {
            dry_run: true,
            create_rules_dir: true,
        })
        .unwrap();

    let warnings: Vec<_> = report.warnings().collect();
    assert_eq!(warnings, vec![("architecture-docs.md", "docs/CODEBASE_MAP.md")]);
    let providers = report
        .rules
        .iter()
        .find(|r| r.rule == "llm-provider-docs.md")
        .unwrap();
    assert_eq!(providers.files.len(), 3);
    tree.assert_file_missing(".agent/rules");
}

#[test]
fn test_fixture_is_healthy_after_sync() {
    let (_tree, sync) = synced_tree();
    assert!(sync.check(CheckOptions::default()).unwrap().is_healthy());
}
