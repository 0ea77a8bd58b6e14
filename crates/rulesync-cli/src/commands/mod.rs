//! Command implementations for rulesync-cli

pub mod check;
pub mod list;
pub mod sync;

pub use check::run_check;
pub use list::run_list;
pub use sync::run_sync;

use std::path::Path;

use rulesync_core::SyncConfig;
use rulesync_fs::NormalizedPath;

use crate::error::Result;

/// Load the configuration for `root`, from `manifest` when given.
///
/// The root is canonicalized so reports show absolute paths.
pub fn load_config(root: &Path, manifest: Option<&Path>) -> Result<SyncConfig> {
    if !root.is_dir() {
        return Err(rulesync_core::Error::RootNotFound {
            path: root.to_path_buf(),
        }
        .into());
    }
    let root = NormalizedPath::new(root).canonicalize()?;
    let manifest = manifest.map(NormalizedPath::new);
    Ok(SyncConfig::load(root, manifest.as_ref())?)
}
