//! AUR helpers (`yay`, `paru`) for Arch-based hosts.
//!
//! Helpers run as the invoking user; they escalate on their own.
use std::fmt;

use crate::exec::Executor;

/// A supported AUR helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AurHelper {
    /// `yay`
    Yay,
    /// `paru`
    Paru,
}

impl fmt::Display for AurHelper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary())
    }
}

impl AurHelper {
    /// Helpers in the order they are tried.
    pub const ALL: [Self; 2] = [Self::Yay, Self::Paru];

    /// Executable name.
    #[must_use]
    pub const fn binary(self) -> &'static str {
        match self {
            Self::Yay => "yay",
            Self::Paru => "paru",
        }
    }

    /// Helpers present on `PATH`, in preference order.
    #[must_use]
    pub fn available(executor: &dyn Executor) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|h| executor.which(h.binary()))
            .collect()
    }

    /// Install `package` non-interactively. Returns `false` on any failure.
    #[must_use]
    pub fn install(self, executor: &dyn Executor, package: &str) -> bool {
        executor
            .run_unchecked(self.binary(), &["-S", "--needed", "--noconfirm", package])
            .is_ok_and(|r| r.success)
    }
}

/// Outcome of [`install_first`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AurOutcome {
    /// `package` was installed with `helper`.
    Installed {
        /// Helper that succeeded.
        helper: AurHelper,
        /// Package that was installed.
        package: String,
    },
    /// Neither `yay` nor `paru` is on `PATH`.
    NoHelper,
    /// Every helper failed for every candidate.
    Failed,
}

/// Try each available helper, and with each helper each candidate package,
/// stopping at the first successful install.
#[must_use]
pub fn install_first(executor: &dyn Executor, candidates: &[&str]) -> AurOutcome {
    let helpers = AurHelper::available(executor);
    if helpers.is_empty() {
        return AurOutcome::NoHelper;
    }
    for helper in helpers {
        for package in candidates {
            if helper.install(executor, package) {
                return AurOutcome::Installed {
                    helper,
                    package: (*package).to_string(),
                };
            }
        }
    }
    AurOutcome::Failed
}
