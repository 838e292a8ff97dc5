//! Install build and runtime dependencies for the detected manager.
use anyhow::{Context as _, Result};

use super::{Context, Task, TaskResult};

/// Install the required list in one batch, then whatever optional
/// packages the repositories carry.
#[derive(Debug)]
pub struct InstallDependencies;

impl Task for InstallDependencies {
    fn name(&self) -> &str {
        "Install dependencies"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let manager = ctx.platform.manager;
        let lists = ctx.packages.for_manager(manager);

        if !ctx.dry_run {
            ctx.adapter.refresh_metadata()?;
        }

        let required: Vec<String> = lists
            .required
            .iter()
            .map(|spec| {
                let chosen = spec.resolve(&ctx.adapter);
                if chosen != spec.name {
                    ctx.log
                        .info(&format!("using {chosen} in place of {}", spec.name));
                }
                chosen
            })
            .collect();
        let required: Vec<&str> = required.iter().map(String::as_str).collect();

        let optional: Vec<&str> = lists.optional.iter().map(String::as_str).collect();
        let (present, missing) = ctx.adapter.partition_available(&optional);
        for name in &missing {
            ctx.log
                .warn(&format!("optional package {name} not available from {manager}"));
        }

        if ctx.dry_run {
            ctx.log.dry_run(&format!(
                "would install {} required package(s): {}",
                required.len(),
                required.join(" ")
            ));
            if !present.is_empty() {
                ctx.log.dry_run(&format!(
                    "would install optional package(s): {}",
                    present.join(" ")
                ));
            }
            return Ok(TaskResult::DryRun);
        }

        ctx.log.info(&format!(
            "installing {} required package(s) with {manager}",
            required.len()
        ));
        ctx.adapter
            .install(&required)
            .context("installing required packages")?;

        if let Err(e) = ctx.adapter.install(&present) {
            ctx.log.warn(&format!("optional packages not installed: {e}"));
        }

        Ok(TaskResult::Ok)
    }
}
