//! Install the Noctalia shell.
use anyhow::Result;
use std::sync::Arc;

use super::strategy::{self, Attempt, AurPackage, InstallStrategy, ManagedPackage, Outcome};
use super::{Context, Task, TaskResult};
use crate::config::settings::NOCTALIA_REPO_VAR;
use crate::resources::archive::{self, CommandFetcher};
use crate::resources::git;

/// Package names the shell may be installed under.
pub const SHELL_PACKAGES: [&str; 2] = ["noctalia-shell", "noctalia-shell-git"];

/// Latest release tarball, used when no other source applies.
pub const RELEASE_URL: &str =
    "https://github.com/noctalia-dev/noctalia-shell/releases/latest/download/noctalia-latest.tar.gz";

/// Whether any shell package is in the local install database.
#[must_use]
pub fn shell_package_installed(ctx: &Context) -> bool {
    SHELL_PACKAGES
        .iter()
        .any(|name| ctx.adapter.package_installed(name))
}

#[derive(Debug)]
struct Installed;

impl InstallStrategy for Installed {
    fn label(&self) -> String {
        "installed package".to_string()
    }

    fn attempt(&self, ctx: &Context) -> Result<Attempt> {
        Ok(if shell_package_installed(ctx) {
            Attempt::AlreadyPresent
        } else {
            Attempt::Unavailable("not installed".to_string())
        })
    }
}

/// Replace the shell directory with a clone of `NOCTALIA_REPO`.
#[derive(Debug)]
struct RepoClone;

impl InstallStrategy for RepoClone {
    fn label(&self) -> String {
        format!("clone of {NOCTALIA_REPO_VAR}")
    }

    fn attempt(&self, ctx: &Context) -> Result<Attempt> {
        let Some(url) = ctx.settings.noctalia_repo.as_deref() else {
            return Ok(Attempt::Unavailable(format!("{NOCTALIA_REPO_VAR} not set")));
        };
        let dest = ctx.settings.shell_dir();
        if dest.exists() {
            ctx.log.warn(&format!(
                "removing {} and everything in it; local changes will be lost",
                dest.display()
            ));
        }
        git::replace_with_clone(ctx.executor.as_ref(), url, &dest)?;
        Ok(Attempt::Installed)
    }
}

#[derive(Debug)]
struct ReleaseTarball;

impl InstallStrategy for ReleaseTarball {
    fn label(&self) -> String {
        "release tarball".to_string()
    }

    fn attempt(&self, ctx: &Context) -> Result<Attempt> {
        let fetcher = CommandFetcher::new(Arc::clone(&ctx.executor));
        archive::install_release(
            &fetcher,
            ctx.executor.as_ref(),
            RELEASE_URL,
            &ctx.settings.shell_dir(),
        )?;
        Ok(Attempt::Installed)
    }
}

/// Strategies tried for the shell, in order.
#[must_use]
pub fn chain() -> Vec<Box<dyn InstallStrategy>> {
    vec![
        Box::new(Installed),
        Box::new(ManagedPackage {
            candidates: &["noctalia-shell"],
        }),
        Box::new(AurPackage {
            candidates: &SHELL_PACKAGES,
        }),
        Box::new(RepoClone),
        Box::new(ReleaseTarball),
    ]
}

/// Install the shell through the first strategy that works.
#[derive(Debug)]
pub struct InstallShell;

impl Task for InstallShell {
    fn name(&self) -> &str {
        "Install shell"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let strategies = chain();
        if ctx.dry_run {
            if shell_package_installed(ctx) {
                return Ok(TaskResult::Skipped("package already installed".to_string()));
            }
            ctx.log.dry_run(&format!(
                "would install Noctalia via {}",
                strategy::describe(&strategies)
            ));
            return Ok(TaskResult::DryRun);
        }

        match strategy::run_chain("Noctalia", &strategies, ctx)? {
            Outcome::AlreadyPresent => {
                Ok(TaskResult::Skipped("package already installed".to_string()))
            }
            Outcome::Installed => Ok(TaskResult::Ok),
        }
    }
}
