//! Shallow git clones.
use anyhow::{Context as _, Result};
use std::path::Path;

use crate::exec::Executor;

/// Clone the tip of `url` into `dest` (`git clone --depth 1`).
///
/// `dest` must not exist or must be empty.
///
/// # Errors
///
/// Returns an error if `git` fails.
pub fn shallow_clone(executor: &dyn Executor, url: &str, dest: &Path) -> Result<()> {
    let dest_str = dest.to_string_lossy();
    executor
        .run("git", &["clone", "--depth", "1", url, &dest_str])
        .with_context(|| format!("cloning {url} into {}", dest.display()))?;
    Ok(())
}

/// Delete `dest` if it exists, then shallow-clone `url` into it.
///
/// Anything previously at `dest` is lost, including local edits.
///
/// # Errors
///
/// Returns an error if the old directory cannot be removed or the clone fails.
pub fn replace_with_clone(executor: &dyn Executor, url: &str, dest: &Path) -> Result<()> {
    if dest.exists() {
        std::fs::remove_dir_all(dest)
            .with_context(|| format!("removing {}", dest.display()))?;
    }
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create directory: {}", parent.display()))?;
    }
    shallow_clone(executor, url, dest)
}
