//! Verify command implementation.
use anyhow::Result;
use std::sync::Arc;

use crate::cli::GlobalOpts;
use crate::config::settings::Settings;
use crate::exec::Executor;
use crate::logging::Logger;
use crate::tasks::{Task, verify::VerifyInstallation};

/// Run only the post-install checks.
///
/// # Errors
///
/// Returns an error if platform detection fails or any check fails.
pub fn run(
    global: &GlobalOpts,
    settings: Settings,
    log: &Arc<Logger>,
    executor: Arc<dyn Executor>,
) -> Result<()> {
    let ctx = super::prepare(global, settings, log, executor)?;
    let steps: Vec<Box<dyn Task>> = vec![Box::new(VerifyInstallation)];
    super::run_to_completion(&steps, &ctx, log)
}
