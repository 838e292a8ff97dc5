//! Installer configuration: environment settings and dependency lists.
pub mod packages;
pub mod settings;
pub mod toml_loader;

use anyhow::{Context, Result};

use packages::PackageLists;
use settings::Settings;

/// All configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Paths and repository overrides.
    pub settings: Settings,
    /// Per-manager dependency lists.
    pub packages: PackageLists,
}

impl Config {
    /// Load the package lists for `settings.root`.
    ///
    /// # Errors
    ///
    /// Returns an error if a `conf/packages.toml` override fails to parse.
    pub fn load(settings: Settings) -> Result<Self> {
        let packages = PackageLists::load(&settings.root).context("loading packages.toml")?;
        Ok(Self { settings, packages })
    }
}
