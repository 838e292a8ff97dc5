//! Host detection: package manager and privilege escalation.
use std::fmt;

use crate::error::PlatformError;
use crate::exec::Executor;
use crate::resources::package::PackageManager;

/// How privileged commands (refresh, install, `ninja install`) are launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    /// The process already runs as root.
    Root,
    /// Commands are prefixed with `sudo`.
    Sudo,
    /// No escalation is available; commands run as the current user.
    Unprivileged,
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "root"),
            Self::Sudo => write!(f, "sudo"),
            Self::Unprivileged => write!(f, "unprivileged"),
        }
    }
}

impl Privilege {
    /// Detect whether the process is root, can use `sudo`, or neither.
    #[must_use]
    pub fn detect(executor: &dyn Executor) -> Self {
        let is_root = executor
            .run_unchecked("id", &["-u"])
            .is_ok_and(|r| r.success && r.stdout.trim() == "0");
        if is_root {
            Self::Root
        } else if executor.which("sudo") {
            Self::Sudo
        } else {
            Self::Unprivileged
        }
    }

    /// Build the command line for a privileged invocation of `program`.
    ///
    /// With [`Privilege::Sudo`] the program becomes the first argument of
    /// `sudo`; otherwise the command is returned unchanged.
    #[must_use]
    pub fn wrap<'a>(self, program: &'a str, args: &[&'a str]) -> (&'a str, Vec<&'a str>) {
        match self {
            Self::Sudo => {
                let mut full = Vec::with_capacity(args.len() + 1);
                full.push(program);
                full.extend_from_slice(args);
                ("sudo", full)
            }
            Self::Root | Self::Unprivileged => (program, args.to_vec()),
        }
    }
}

/// Platform information for the current host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    /// The package manager every adapter call targets.
    pub manager: PackageManager,
    /// Escalation mode for privileged commands.
    pub privilege: Privilege,
}

impl Platform {
    /// Create a platform with explicit values.
    #[must_use]
    pub const fn new(manager: PackageManager, privilege: Privilege) -> Self {
        Self { manager, privilege }
    }

    /// Detect the package manager and privilege mode.
    ///
    /// `requested` is an explicit manager tag (from `--package-manager`);
    /// when absent, the first supported manager found on `PATH` is used.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::UnsupportedManager`] for an unknown tag and
    /// [`PlatformError::NoPackageManager`] when detection finds nothing.
    pub fn detect(executor: &dyn Executor, requested: Option<&str>) -> Result<Self, PlatformError> {
        let manager = match requested {
            Some(tag) => tag.parse()?,
            None => detect_manager(executor)?,
        };
        Ok(Self::new(manager, Privilege::detect(executor)))
    }
}

/// Probe `PATH` for each supported package manager in priority order.
fn detect_manager(executor: &dyn Executor) -> Result<PackageManager, PlatformError> {
    PackageManager::ALL
        .into_iter()
        .find(|m| executor.which(m.binary()))
        .ok_or_else(|| PlatformError::NoPackageManager {
            searched: PackageManager::ALL
                .iter()
                .map(|m| m.binary())
                .collect::<Vec<_>>()
                .join(", "),
        })
}
