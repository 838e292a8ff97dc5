//! Install command implementation.
use anyhow::Result;
use std::sync::Arc;

use crate::cli::GlobalOpts;
use crate::config::settings::Settings;
use crate::exec::Executor;
use crate::logging::Logger;
use crate::resources::config_file::ConfigFileResource;
use crate::tasks;

/// Run the install command.
///
/// The shipped `config.conf` is checked before anything touches the
/// package manager, so a broken checkout fails fast.
///
/// # Errors
///
/// Returns an error if the config source is missing, platform detection
/// fails, or any install step fails.
pub fn run(
    global: &GlobalOpts,
    settings: Settings,
    log: &Arc<Logger>,
    executor: Arc<dyn Executor>,
) -> Result<()> {
    log.info(&format!("mango-installer {}", super::version::string()));
    if global.dry_run {
        log.info("dry run: no changes will be made");
    }

    ConfigFileResource::new(settings.config_source(), settings.config_dest()).check_source()?;

    let ctx = super::prepare(global, settings, log, executor)?;
    let steps = tasks::all_install_tasks();
    super::run_to_completion(&steps, &ctx, log)
}
