//! Install the MangoWC compositor.
use anyhow::{Context as _, Result};

use super::strategy::{self, Attempt, AurPackage, InstallStrategy, ManagedPackage, Outcome};
use super::{Context, Task, TaskResult};
use crate::config::settings::MANGOWC_REPO_VAR;
use crate::error::TaskError;
use crate::exec::Executor;
use crate::resources::git;

/// Executable names the compositor may be installed under.
pub const COMPOSITOR_BINARIES: [&str; 2] = ["mango", "mangowc"];

/// Whether any compositor binary is on `PATH`.
#[must_use]
pub fn compositor_on_path(executor: &dyn Executor) -> bool {
    COMPOSITOR_BINARIES.iter().any(|b| executor.which(b))
}

/// Compositor binary already installed.
#[derive(Debug)]
struct OnPath;

impl InstallStrategy for OnPath {
    fn label(&self) -> String {
        "existing binary on PATH".to_string()
    }

    fn attempt(&self, ctx: &Context) -> Result<Attempt> {
        Ok(if compositor_on_path(ctx.executor.as_ref()) {
            Attempt::AlreadyPresent
        } else {
            Attempt::Unavailable(format!("neither {} found", COMPOSITOR_BINARIES.join(" nor ")))
        })
    }
}

/// Build from `MANGOWC_REPO` with meson and ninja.
#[derive(Debug)]
struct SourceBuild;

impl InstallStrategy for SourceBuild {
    fn label(&self) -> String {
        format!("source build from {MANGOWC_REPO_VAR}")
    }

    fn attempt(&self, ctx: &Context) -> Result<Attempt> {
        let Some(url) = ctx.settings.mangowc_repo.as_deref() else {
            return Err(TaskError::SourceRepoRequired {
                component: "MangoWC".to_string(),
                var: MANGOWC_REPO_VAR.to_string(),
            }
            .into());
        };

        let build_root = tempfile::Builder::new()
            .prefix("mangowc-build-")
            .tempdir()
            .context("creating build directory")?;
        let src = build_root.path().join("mangowc");
        let executor = ctx.executor.as_ref();

        git::shallow_clone(executor, url, &src)?;
        ctx.log.info("configuring with meson");
        executor
            .run_in(&src, "meson", &["setup", "build", "-Dprefix=/usr"])
            .context("meson setup")?;
        ctx.log.info("building with ninja");
        executor
            .run_in(&src, "ninja", &["-C", "build"])
            .context("ninja build")?;
        let (program, args) = ctx
            .platform
            .privilege
            .wrap("ninja", &["-C", "build", "install"]);
        executor
            .run_in(&src, program, &args)
            .context("ninja install")?;
        Ok(Attempt::Installed)
    }
}

/// Strategies tried for the compositor, in order.
#[must_use]
pub fn chain() -> Vec<Box<dyn InstallStrategy>> {
    vec![
        Box::new(OnPath),
        Box::new(ManagedPackage {
            candidates: &["mangowc"],
        }),
        Box::new(AurPackage {
            candidates: &["mangowc-git"],
        }),
        Box::new(SourceBuild),
    ]
}

/// Install the compositor through the first strategy that works.
#[derive(Debug)]
pub struct InstallCompositor;

impl Task for InstallCompositor {
    fn name(&self) -> &str {
        "Install compositor"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let strategies = chain();
        if ctx.dry_run {
            if compositor_on_path(ctx.executor.as_ref()) {
                return Ok(TaskResult::Skipped("already on PATH".to_string()));
            }
            ctx.log.dry_run(&format!(
                "would install MangoWC via {}",
                strategy::describe(&strategies)
            ));
            return Ok(TaskResult::DryRun);
        }

        match strategy::run_chain("MangoWC", &strategies, ctx)? {
            Outcome::AlreadyPresent => Ok(TaskResult::Skipped("already on PATH".to_string())),
            Outcome::Installed => Ok(TaskResult::Ok),
        }
    }
}
