//! Ordered fallback chains of install strategies.
//!
//! A chain stops at the first strategy that reports the component as
//! installed or already present. `Unavailable` moves on to the next one;
//! an `Err` aborts the whole run.
use anyhow::Result;

use super::Context;
use crate::error::TaskError;
use crate::resources::aur::{self, AurOutcome};

/// Outcome of one install strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    /// This strategy installed the component.
    Installed,
    /// The component was already on the system.
    AlreadyPresent,
    /// This strategy does not apply or failed softly.
    Unavailable(String),
}

/// How a chain ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A strategy installed the component.
    Installed,
    /// The component was already on the system.
    AlreadyPresent,
}

/// One way of getting a component onto the system.
#[cfg_attr(test, mockall::automock)]
pub trait InstallStrategy: Send + Sync {
    /// Short description used in logs and error messages.
    fn label(&self) -> String;

    /// Try to install the component.
    ///
    /// # Errors
    ///
    /// An error is fatal; return [`Attempt::Unavailable`] to fall through.
    fn attempt(&self, ctx: &Context) -> Result<Attempt>;
}

/// Run `strategies` in order until one succeeds.
///
/// # Errors
///
/// Propagates the first strategy error, or returns
/// [`TaskError::FallbacksExhausted`] when every strategy was unavailable.
pub fn run_chain(
    component: &str,
    strategies: &[Box<dyn InstallStrategy>],
    ctx: &Context,
) -> Result<Outcome> {
    let mut misses = Vec::new();
    for strategy in strategies {
        let label = strategy.label();
        ctx.log.debug(&format!("{component}: trying {label}"));
        match strategy.attempt(ctx)? {
            Attempt::Unavailable(reason) => {
                ctx.log.warn(&format!("{component}: {label}: {reason}"));
                misses.push(format!("{label}: {reason}"));
            }
            Attempt::Installed => {
                ctx.log.info(&format!("{component}: installed via {label}"));
                return Ok(Outcome::Installed);
            }
            Attempt::AlreadyPresent => {
                ctx.log.info(&format!("{component}: {label}"));
                return Ok(Outcome::AlreadyPresent);
            }
        }
    }
    Err(TaskError::FallbacksExhausted {
        component: component.to_string(),
        attempts: misses.join("; "),
    }
    .into())
}

/// Labels of `strategies`, joined for dry-run output.
#[must_use]
pub fn describe(strategies: &[Box<dyn InstallStrategy>]) -> String {
    strategies
        .iter()
        .map(|s| s.label())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Install from the distribution repositories.
#[derive(Debug, Clone, Copy)]
pub struct ManagedPackage {
    /// Package names tried in order.
    pub candidates: &'static [&'static str],
}

impl InstallStrategy for ManagedPackage {
    fn label(&self) -> String {
        format!("package {}", self.candidates.join(" or "))
    }

    fn attempt(&self, ctx: &Context) -> Result<Attempt> {
        let mut reasons = Vec::new();
        for &name in self.candidates {
            if !ctx.adapter.package_exists(name) {
                reasons.push(format!("{name} not in repositories"));
                continue;
            }
            match ctx.adapter.install(&[name]) {
                Ok(()) => return Ok(Attempt::Installed),
                Err(e) => reasons.push(e.to_string()),
            }
        }
        Ok(Attempt::Unavailable(reasons.join(", ")))
    }
}

/// Install from the AUR with `yay` or `paru` (Arch-based hosts only).
#[derive(Debug, Clone, Copy)]
pub struct AurPackage {
    /// Package names tried in order with each helper.
    pub candidates: &'static [&'static str],
}

impl InstallStrategy for AurPackage {
    fn label(&self) -> String {
        format!("AUR {}", self.candidates.join(" or "))
    }

    fn attempt(&self, ctx: &Context) -> Result<Attempt> {
        if !ctx.platform.manager.supports_aur() {
            return Ok(Attempt::Unavailable(format!(
                "not available with {}",
                ctx.platform.manager
            )));
        }
        Ok(match aur::install_first(ctx.executor.as_ref(), self.candidates) {
            AurOutcome::Installed { helper, package } => {
                ctx.log.info(&format!("installed {package} with {helper}"));
                Attempt::Installed
            }
            AurOutcome::NoHelper => {
                Attempt::Unavailable("no AUR helper (yay or paru) found".to_string())
            }
            AurOutcome::Failed => Attempt::Unavailable("AUR helper failed".to_string()),
        })
    }
}
