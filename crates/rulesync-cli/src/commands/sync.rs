//! Sync command implementation

use std::path::Path;

use colored::{ColoredString, Colorize};

use rulesync_core::{
    CopiedFile, RuleOutcome, RuleSynchronizer, SyncEvent, SyncOptions, SyncReport,
};

use super::load_config;
use crate::error::Result;

/// Run the sync command
///
/// Regenerates every rule file and auxiliary copy, printing each one as it
/// is written (or, with `dry_run`, would be).
pub fn run_sync(
    path: &Path,
    manifest: Option<&Path>,
    dry_run: bool,
    create_dirs: bool,
    json: bool,
) -> Result<()> {
    let config = load_config(path, manifest)?;

    if !json {
        println!(
            "{} Updating rules in {}...",
            "=>".blue().bold(),
            config.rules_path().as_str().cyan()
        );
    }

    let options = SyncOptions {
        dry_run,
        create_rules_dir: create_dirs,
    };
    let synchronizer = RuleSynchronizer::new(config);

    if json {
        let report = synchronizer.sync(options)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let marker = if dry_run { "~".yellow() } else { "+".green() };
    let report = synchronizer.sync_with_progress(options, |event| match event {
        SyncEvent::Rule(outcome) => print_rule(outcome, &marker, dry_run),
        SyncEvent::Auxiliary(copy) => print_copy(copy, &marker),
    })?;
    print_summary(&report);

    Ok(())
}

fn print_rule(outcome: &RuleOutcome, marker: &ColoredString, dry_run: bool) {
    for doc in &outcome.missing_docs {
        println!(
            "   {} {}: {} not found, skipped",
            "!".yellow(),
            outcome.rule.dimmed(),
            doc
        );
    }
    if outcome.is_chunked() {
        println!(
            "   {} {} split into {} parts",
            marker,
            outcome.rule,
            outcome.files.len()
        );
    }
    for file in &outcome.files {
        println!("   {} {} ({} chars)", marker, file.name.cyan(), file.chars);
    }
    let removed = if dry_run {
        "stale part, would be removed"
    } else {
        "stale part removed"
    };
    for stale in &outcome.stale_parts {
        println!("   {} {} ({})", "-".red(), stale.dimmed(), removed);
    }
}

fn print_copy(copy: &CopiedFile, marker: &ColoredString) {
    let how = if copy.rewritten {
        "copied, links rewritten"
    } else {
        "copied"
    };
    println!("   {} {} ({})", marker, copy.source.cyan(), how);
}

fn print_summary(report: &SyncReport) {
    println!();
    if report.dry_run {
        println!(
            "{} Dry run: {} files would be written.",
            "DRY RUN".yellow().bold(),
            report.file_count()
        );
    } else {
        println!(
            "{} Rules updated: {} files written.",
            "OK".green().bold(),
            report.file_count()
        );
    }
}
