//! Top-level subcommand orchestration.
pub mod install;
pub mod verify;
pub mod version;

use anyhow::Result;
use std::sync::Arc;

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::config::settings::Settings;
use crate::exec::Executor;
use crate::logging::{Log, Logger};
use crate::platform::Platform;
use crate::tasks::{self, Context, Task};

/// Detect the platform, load configuration, and build the step context.
///
/// # Errors
///
/// Returns an error if no supported package manager is found, the
/// `--package-manager` tag is unknown, or `packages.toml` fails to parse.
pub fn prepare(
    global: &GlobalOpts,
    settings: Settings,
    log: &Arc<Logger>,
    executor: Arc<dyn Executor>,
) -> Result<Context> {
    log.stage("Detecting platform");
    let platform = Platform::detect(executor.as_ref(), global.package_manager.as_deref())?;
    log.info(&format!(
        "package manager: {} ({})",
        platform.manager, platform.privilege
    ));

    let config = Config::load(settings)?;
    log.debug(&format!("installer root: {}", config.settings.root.display()));
    let lists = config.packages.for_manager(platform.manager);
    log.debug(&format!(
        "{} required, {} optional packages",
        lists.required.len(),
        lists.optional.len()
    ));

    Ok(Context::new(
        config,
        platform,
        Arc::clone(log) as Arc<dyn Log>,
        executor,
        global.dry_run,
    ))
}

/// Run `steps` in order, print the summary, and return the first failure.
///
/// # Errors
///
/// Returns the error of the step that stopped the run.
pub fn run_to_completion(steps: &[Box<dyn Task>], ctx: &Context, log: &Logger) -> Result<()> {
    let result = tasks::run_sequence(steps, ctx);
    log.print_summary();
    result
}
