//! rulesync CLI
//!
//! Regenerates `.agent/rules/` from a repository's documentation.

mod cli;
mod commands;
mod error;
mod logging;

use std::path::Path;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose)
        .map_err(|e| CliError::user(format!("failed to initialize logging: {}", e)))?;

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };

    execute_command(
        cli.command.unwrap_or_default(),
        &root,
        cli.config.as_deref(),
    )
}

fn execute_command(cmd: Commands, root: &Path, config: Option<&Path>) -> Result<()> {
    match cmd {
        Commands::Sync {
            dry_run,
            json,
            create_dirs,
        } => commands::run_sync(root, config, dry_run, create_dirs, json),
        Commands::Check { json, diff } => commands::run_check(root, config, diff, json),
        Commands::List { json } => commands::run_list(root, config, json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulesync_test_utils::DocTree;
    use std::path::PathBuf;

    #[test]
    fn default_command_syncs() {
        let tree = DocTree::new().with_rules_dir().with_auxiliary_sources();
        tree.write(
            ".agent/rulesync.toml",
            "[[rules]]\nname = \"agents-md.md\"\ndocs = [\"AGENTS.md\"]\n",
        );

        execute_command(Commands::default(), tree.root(), None).unwrap();

        tree.assert_file_exists(".agent/rules/agents-md.md");
        tree.assert_file_exists(".agent/rules/AGENTS.md");
    }

    #[test]
    fn explicit_config_path_is_used() {
        let tree = DocTree::new().with_rules_dir().with_auxiliary_sources();
        tree.write(
            "rulesync.json",
            r#"{"rules": [{"name": "only.md", "docs": ["AGENTS.md"]}], "auxiliary": []}"#,
        );
        let config: PathBuf = tree.root().join("rulesync.json");

        execute_command(Commands::default(), tree.root(), Some(config.as_path())).unwrap();

        assert_eq!(tree.rule_files(), vec!["only.md"]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let tree = DocTree::new();
        let root = tree.root().join("missing");

        let result = execute_command(Commands::List { json: false }, &root, None);
        assert!(result.is_err());
    }
}
