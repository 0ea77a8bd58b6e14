//! List command implementation

use std::path::Path;

use colored::Colorize;

use rulesync_core::ResolvedRule;

use super::load_config;
use crate::error::Result;

/// Run the list command
///
/// Prints every rule with its trigger and resolved documents, marking the
/// documents that do not exist.
pub fn run_list(path: &Path, manifest: Option<&Path>, json: bool) -> Result<()> {
    let config = load_config(path, manifest)?;
    let rules = config.mapping.resolve(&config.root)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rules)?);
        return Ok(());
    }

    println!("{} {} rules:", "=>".blue().bold(), rules.len());
    for rule in &rules {
        print_rule(rule, |doc| config.root.join(doc).is_file());
    }

    Ok(())
}

fn print_rule(rule: &ResolvedRule, exists: impl Fn(&str) -> bool) {
    println!("{} {}", rule.name.cyan().bold(), format!("[{}]", rule.trigger).dimmed());
    for doc in &rule.docs {
        if exists(doc) {
            println!("   {} {}", "-".green(), doc);
        } else {
            println!("   {} {} {}", "-".yellow(), doc, "(missing)".yellow());
        }
    }
}
