//! Copy of a shipped configuration file with a fixed permission mode.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use super::{Resource, ResourceChange, ResourceState};
use crate::error::ResourceError;

/// Permission mode for deployed configuration files.
pub const CONFIG_MODE: u32 = 0o644;

/// A configuration file that should be a byte-identical copy of `source`.
#[derive(Debug, Clone)]
pub struct ConfigFileResource {
    /// File shipped with the installer.
    pub source: PathBuf,
    /// Per-user destination path.
    pub target: PathBuf,
    /// Unix permission bits applied to `target`.
    pub mode: u32,
}

impl ConfigFileResource {
    /// Create a resource deploying `source` to `target` with [`CONFIG_MODE`].
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self {
            source,
            target,
            mode: CONFIG_MODE,
        }
    }

    /// Fail unless the source file exists.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] naming the source path.
    pub fn check_source(&self) -> Result<(), ResourceError> {
        if self.source.is_file() {
            Ok(())
        } else {
            Err(ResourceError::NotFound(self.source.display().to_string()))
        }
    }
}

impl Resource for ConfigFileResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.source.display(), self.target.display())
    }

    fn current_state(&self) -> Result<ResourceState> {
        self.check_source()?;
        if !self.target.is_file() {
            return Ok(ResourceState::Missing);
        }

        if compute_sha256(&self.source)? != compute_sha256(&self.target)? {
            return Ok(ResourceState::Incorrect {
                current: "content differs".to_string(),
            });
        }

        let current_mode = file_mode(&self.target)?;
        if current_mode == self.mode {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Incorrect {
                current: format!("mode {current_mode:o}"),
            })
        }
    }

    fn apply(&self) -> Result<ResourceChange> {
        use std::os::unix::fs::PermissionsExt;

        self.check_source()?;
        if let Some(parent) = self.target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create directory: {}", parent.display()))?;
        }
        std::fs::copy(&self.source, &self.target)
            .with_context(|| format!("copy {}", self.description()))?;
        std::fs::set_permissions(&self.target, std::fs::Permissions::from_mode(self.mode))
            .with_context(|| format!("set permissions: {}", self.target.display()))?;
        Ok(ResourceChange::Applied)
    }
}

fn file_mode(path: &Path) -> Result<u32> {
    use std::os::unix::fs::PermissionsExt;
    let meta =
        std::fs::metadata(path).with_context(|| format!("read metadata: {}", path.display()))?;
    Ok(meta.permissions().mode() & 0o7777)
}

/// Compute the lowercase hex SHA-256 digest of the file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn compute_sha256(path: &Path) -> Result<String> {
    use sha2::{Digest, Sha256};
    use std::fmt::Write as _;

    let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let digest = Sha256::digest(&bytes);
    let mut hex = String::with_capacity(64);
    for b in &digest {
        write!(hex, "{b:02x}").unwrap_or(());
    }
    Ok(hex)
}
