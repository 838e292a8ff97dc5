//! Per-manager dependency lists loaded from `packages.toml`.
use anyhow::{Context as _, Result, bail};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use super::toml_loader;
use crate::resources::package::{PackageAdapter, PackageManager};

/// Package lists compiled into the binary.
const EMBEDDED: &str = include_str!("../../conf/packages.toml");

/// A required package, optionally with alternative names tried in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    /// Preferred package name.
    pub name: String,
    /// Fallback names, in preference order.
    pub aliases: Vec<String>,
}

impl PackageSpec {
    /// A spec with no aliases.
    #[must_use]
    pub fn plain(name: &str) -> Self {
        Self {
            name: name.to_string(),
            aliases: Vec::new(),
        }
    }

    /// Every candidate name: the primary name, then the aliases.
    pub fn candidates(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Pick the first candidate the repositories provide, falling back to the
    /// primary name so the install command reports the miss.
    #[must_use]
    pub fn resolve(&self, adapter: &PackageAdapter) -> String {
        if self.aliases.is_empty() {
            return self.name.clone();
        }
        self.candidates()
            .find(|candidate| adapter.package_exists(candidate))
            .unwrap_or(self.name.as_str())
            .to_string()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSpec {
    Name(String),
    WithAliases {
        name: String,
        #[serde(default)]
        aliases: Vec<String>,
    },
}

impl From<RawSpec> for PackageSpec {
    fn from(raw: RawSpec) -> Self {
        match raw {
            RawSpec::Name(name) => Self {
                name,
                aliases: Vec::new(),
            },
            RawSpec::WithAliases { name, aliases } => Self { name, aliases },
        }
    }
}

#[derive(Deserialize)]
struct RawManagerPackages {
    #[serde(default)]
    required: Vec<RawSpec>,
    #[serde(default)]
    optional: Vec<String>,
}

/// Required and optional packages for one manager.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagerPackages {
    /// Installed in one batch; failure aborts the run.
    pub required: Vec<PackageSpec>,
    /// Installed when present in the repositories; misses are warnings.
    pub optional: Vec<String>,
}

/// Dependency lists keyed by package manager.
#[derive(Debug, Clone, Default)]
pub struct PackageLists {
    by_manager: HashMap<PackageManager, ManagerPackages>,
}

impl PackageLists {
    /// Parse package lists from TOML text.
    ///
    /// Top-level tables are manager tags (`apt`, `dnf`, `pacman`, `zypper`).
    ///
    /// # Errors
    ///
    /// Returns an error on malformed TOML, an unknown manager tag, or two
    /// tables naming the same manager (`apt` and `apt-get`).
    pub fn parse(content: &str) -> Result<Self> {
        let raw: BTreeMap<String, RawManagerPackages> = toml_loader::parse(content)?;
        let mut tags = HashMap::new();
        let mut by_manager = HashMap::new();
        for (tag, lists) in raw {
            let manager: PackageManager = tag.parse()?;
            if let Some(first) = tags.insert(manager, tag.clone()) {
                bail!("tables [{first}] and [{tag}] both configure {manager}");
            }
            by_manager.insert(
                manager,
                ManagerPackages {
                    required: lists.required.into_iter().map(PackageSpec::from).collect(),
                    optional: lists.optional,
                },
            );
        }
        Ok(Self { by_manager })
    }

    /// The lists compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded file fails to parse.
    pub fn embedded() -> Result<Self> {
        Self::parse(EMBEDDED).context("parsing embedded packages.toml")
    }

    /// Load `<root>/conf/packages.toml`, or the embedded lists if it is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the override exists but cannot be read or parsed.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join("conf").join("packages.toml");
        match toml_loader::read_optional(&path)? {
            Some(content) => {
                Self::parse(&content).with_context(|| format!("parsing {}", path.display()))
            }
            None => Self::embedded(),
        }
    }

    /// Lists for `manager`; empty when the file has no table for it.
    #[must_use]
    pub fn for_manager(&self, manager: PackageManager) -> ManagerPackages {
        self.by_manager.get(&manager).cloned().unwrap_or_default()
    }
}
