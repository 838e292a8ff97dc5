//! Post-install verification.
//!
//! Every check runs regardless of earlier results so the user sees the
//! full picture in one pass. Advisory checks warn but never count.
use anyhow::Result;

use super::compositor::compositor_on_path;
use super::shell::shell_package_installed;
use super::{Context, Task, TaskResult};
use crate::error::TaskError;

/// Outcome of one verification check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    /// What was checked.
    pub name: String,
    /// Whether the check passed.
    pub passed: bool,
    /// Advisory checks are reported but do not fail verification.
    pub advisory: bool,
}

/// Accumulated results of all checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    /// Checks in the order they ran.
    pub checks: Vec<Check>,
}

impl VerificationReport {
    fn record(&mut self, name: impl Into<String>, passed: bool, advisory: bool) {
        self.checks.push(Check {
            name: name.into(),
            passed,
            advisory,
        });
    }

    /// Number of failed non-advisory checks.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| !c.passed && !c.advisory)
            .count()
    }
}

/// Run every check against the current system.
#[must_use]
pub fn collect(ctx: &Context) -> VerificationReport {
    let executor = ctx.executor.as_ref();
    let mut report = VerificationReport::default();

    report.record(
        "compositor binary (mango or mangowc) on PATH",
        compositor_on_path(executor),
        false,
    );

    let config = ctx.settings.config_dest();
    report.record(
        format!("configuration at {}", config.display()),
        config.is_file(),
        false,
    );

    let shell_dir = ctx.settings.shell_dir();
    report.record(
        format!("Noctalia package or {}", shell_dir.display()),
        shell_package_installed(ctx) || shell_dir.is_dir(),
        false,
    );

    report.record("quickshell launcher (qs) on PATH", executor.which("qs"), true);

    report
}

/// Check that every installed artifact is in place.
#[derive(Debug)]
pub struct VerifyInstallation;

impl Task for VerifyInstallation {
    fn name(&self) -> &str {
        "Verify installation"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let report = collect(ctx);
        for check in &report.checks {
            match (check.passed, check.advisory) {
                (true, _) => ctx.log.info(&format!("ok: {}", check.name)),
                (false, true) => ctx.log.warn(&format!("not found: {}", check.name)),
                (false, false) => ctx.log.error(&format!("missing: {}", check.name)),
            }
        }

        let count = report.failures();
        if ctx.dry_run {
            if count > 0 {
                ctx.log
                    .dry_run(&format!("{count} check(s) would fail until the install runs"));
            }
            return Ok(TaskResult::DryRun);
        }
        if count > 0 {
            return Err(TaskError::VerificationFailed { count }.into());
        }
        Ok(TaskResult::Ok)
    }
}
