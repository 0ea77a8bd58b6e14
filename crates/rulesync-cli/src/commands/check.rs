//! Check command implementation

use std::path::Path;

use colored::Colorize;

use rulesync_core::{CheckOptions, CheckReport, CheckStatus, DriftItem, RuleSynchronizer};

use super::load_config;
use crate::error::{CliError, Result};

/// Run the check command
///
/// Compares `.agent/rules` with what a sync would write. Anything other than
/// a healthy report is returned as an error so the exit status reflects it.
pub fn run_check(path: &Path, manifest: Option<&Path>, diff: bool, json: bool) -> Result<()> {
    let config = load_config(path, manifest)?;

    if !json {
        println!("{} Checking rules...", "=>".blue().bold());
    }

    let report = RuleSynchronizer::new(config).check(CheckOptions { with_diff: diff })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.is_healthy() {
        Ok(())
    } else {
        Err(CliError::user(
            "rules are out of date; run `rulesync sync` to regenerate them",
        ))
    }
}

fn print_report(report: &CheckReport) {
    match report.status {
        CheckStatus::Healthy => {
            println!("{} Rules are up to date.", "OK".green().bold());
            return;
        }
        CheckStatus::Drifted => {
            println!("{} Rules have drifted:", "DRIFTED".red().bold());
            for item in &report.drifted {
                print_item("!".red().to_string(), item);
            }
            if report.missing.is_empty() {
                return;
            }
            println!();
            println!("{} Also missing:", "MISSING".yellow().bold());
        }
        CheckStatus::Missing => {
            println!("{} Some rule files are missing:", "MISSING".yellow().bold());
        }
    }

    for item in &report.missing {
        print_item("-".yellow().to_string(), item);
    }
}

fn print_item(marker: String, item: &DriftItem) {
    println!(
        "   {} {} ({}): {}",
        marker,
        item.file.cyan(),
        item.owner.dimmed(),
        item.description
    );
    if let Some(diff) = &item.diff {
        for line in diff.lines() {
            let line = if line.starts_with('+') && !line.starts_with("+++") {
                line.green().to_string()
            } else if line.starts_with('-') && !line.starts_with("---") {
                line.red().to_string()
            } else {
                line.to_string()
            };
            println!("     {}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::run_sync;
    use rulesync_test_utils::DocTree;

    fn tree() -> DocTree {
        let tree = DocTree::new().with_rules_dir().with_auxiliary_sources();
        tree.write(
            ".agent/rulesync.toml",
            "[[rules]]\nname = \"agents-md.md\"\ndocs = [\"AGENTS.md\"]\n",
        );
        tree
    }

    #[test]
    fn test_check_fails_before_sync() {
        let tree = tree();
        let err = run_check(tree.root(), None, false, false).unwrap_err();
        assert!(matches!(err, CliError::User { .. }));
    }

    #[test]
    fn test_check_passes_after_sync() {
        let tree = tree();
        run_sync(tree.root(), None, false, false, false).unwrap();
        run_check(tree.root(), None, false, false).unwrap();
    }

    #[test]
    fn test_check_with_diff_reports_drift() {
        let tree = tree();
        run_sync(tree.root(), None, false, false, false).unwrap();
        tree.write("AGENTS.md", "# Agents\n\nChanged.\n");
        assert!(run_check(tree.root(), None, true, false).is_err());
    }
}
