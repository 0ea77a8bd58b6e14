//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// rulesync - Build assistant rule files from your documentation
#[derive(Parser, Debug)]
#[command(name = "rulesync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Repository root (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Rule manifest (defaults to <root>/.agent/rulesync.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// The command to run; `sync` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Regenerate .agent/rules from the documentation
    ///
    /// Examples:
    ///   rulesync sync                # Write every rule file
    ///   rulesync sync --dry-run      # Show what would be written
    ///   rulesync sync --create-dirs  # Create .agent/rules if missing
    Sync {
        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,

        /// Create the rules directory when it does not exist
        #[arg(long)]
        create_dirs: bool,
    },

    /// Check whether .agent/rules is up to date
    ///
    /// Exits non-zero when any rule file is missing or stale.
    Check {
        /// Output the report as JSON
        #[arg(long)]
        json: bool,

        /// Show a unified diff for every stale file
        #[arg(long)]
        diff: bool,
    },

    /// List every rule and the documents it is built from
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Default for Commands {
    /// A bare `rulesync` invocation regenerates the rules.
    fn default() -> Self {
        Self::Sync {
            dry_run: false,
            json: false,
            create_dirs: false,
        }
    }
}
