//! Environment-derived paths and repository overrides.
use anyhow::{Result, bail};
use std::path::{Path, PathBuf};

/// Environment variable naming the compositor source repository.
pub const MANGOWC_REPO_VAR: &str = "MANGOWC_REPO";
/// Environment variable naming the shell source repository.
pub const NOCTALIA_REPO_VAR: &str = "NOCTALIA_REPO";
/// Environment variable overriding the installer root directory.
pub const ROOT_VAR: &str = "MANGO_INSTALLER_ROOT";

/// Paths and overrides resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// The user's home directory.
    pub home: PathBuf,
    /// `$XDG_CONFIG_HOME`, or `~/.config`.
    pub config_home: PathBuf,
    /// Git URL for the last-resort compositor build (`MANGOWC_REPO`).
    pub mangowc_repo: Option<String>,
    /// Git URL for the shell clone fallback (`NOCTALIA_REPO`).
    pub noctalia_repo: Option<String>,
    /// Installer root holding `config.conf` and optionally `conf/packages.toml`.
    pub root: PathBuf,
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `HOME` is not set.
    pub fn from_env(root: PathBuf) -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), root)
    }

    /// Build settings from an arbitrary variable lookup. Empty values count
    /// as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if `HOME` is not set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>, root: PathBuf) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let Some(home) = get("HOME").map(PathBuf::from) else {
            bail!("HOME environment variable is not set");
        };
        let config_home = get("XDG_CONFIG_HOME")
            .map_or_else(|| home.join(".config"), PathBuf::from);

        Ok(Self {
            home,
            config_home,
            mangowc_repo: get(MANGOWC_REPO_VAR),
            noctalia_repo: get(NOCTALIA_REPO_VAR),
            root,
        })
    }

    /// Compositor configuration shipped with the installer.
    #[must_use]
    pub fn config_source(&self) -> PathBuf {
        self.root.join("config.conf")
    }

    /// Per-user compositor configuration path.
    #[must_use]
    pub fn config_dest(&self) -> PathBuf {
        self.config_home.join("mango").join("config.conf")
    }

    /// Manual install location of the shell.
    #[must_use]
    pub fn shell_dir(&self) -> PathBuf {
        self.config_home.join("quickshell").join("noctalia-shell")
    }
}

/// Resolve the installer root directory.
///
/// Order: explicit `--root`, `MANGO_INSTALLER_ROOT`, the directory holding
/// the binary (or the checkout above `target/<profile>/`) when it contains a
/// `config.conf`, then the current directory.
///
/// # Errors
///
/// Returns an error if the current directory cannot be read.
pub fn resolve_root(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(root) = explicit {
        return Ok(root.to_path_buf());
    }

    if let Ok(root) = std::env::var(ROOT_VAR)
        && !root.is_empty()
    {
        return Ok(PathBuf::from(root));
    }

    if let Ok(exe) = std::env::current_exe()
        && let Some(parent) = exe.parent()
    {
        let candidates = [parent.to_path_buf(), parent.join("../..")];
        for candidate in &candidates {
            if candidate.join("config.conf").is_file() {
                return Ok(std::fs::canonicalize(candidate)?);
            }
        }
    }

    Ok(std::env::current_dir()?)
}
