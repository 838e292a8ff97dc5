//! Ordered install steps and the machinery that runs them.
pub mod compositor;
pub mod config;
pub mod context;
pub mod dependencies;
pub mod shell;
pub mod strategy;
pub mod verify;

pub use context::Context;

use std::fmt;

use anyhow::Result;

use crate::logging::TaskStatus;

/// Result of running a single step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// Step completed and changed (or confirmed) the system.
    Ok,
    /// Step had nothing to do.
    Skipped(String),
    /// Step ran in dry-run mode.
    DryRun,
}

/// A named install step.
pub trait Task: Send + Sync {
    /// Human-readable step name.
    fn name(&self) -> &str;

    /// Execute the step.
    ///
    /// # Errors
    ///
    /// Any error is fatal for the whole run.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// Position of a step in the run, for progress output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallStep<'a> {
    /// Step name.
    pub name: &'a str,
    /// One-based position.
    pub index: usize,
    /// Number of steps in the run.
    pub total: usize,
}

impl fmt::Display for InstallStep<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}/{}] {}", self.index, self.total, self.name)
    }
}

/// Every step of a full install, in execution order.
#[must_use]
pub fn all_install_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(dependencies::InstallDependencies),
        Box::new(compositor::InstallCompositor),
        Box::new(config::DeployConfig),
        Box::new(shell::InstallShell),
        Box::new(verify::VerifyInstallation),
    ]
}

/// Run one step, log its header, and record the outcome.
///
/// # Errors
///
/// Returns the step's error after recording it as failed.
pub fn execute(task: &dyn Task, step: InstallStep<'_>, ctx: &Context) -> Result<()> {
    ctx.log.stage(&step.to_string());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
            Ok(())
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
            Ok(())
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record_task(task.name(), TaskStatus::DryRun, None);
            Ok(())
        }
        Err(e) => {
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
            Err(e)
        }
    }
}

/// Run `tasks` in order, stopping at the first failure.
///
/// # Errors
///
/// Returns the first step error.
pub fn run_sequence(tasks: &[Box<dyn Task>], ctx: &Context) -> Result<()> {
    let total = tasks.len();
    for (i, task) in tasks.iter().enumerate() {
        let step = InstallStep {
            name: task.name(),
            index: i + 1,
            total,
        };
        execute(task.as_ref(), step, ctx)?;
    }
    Ok(())
}
