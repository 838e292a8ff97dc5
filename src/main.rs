//! `mango-installer` binary entry point.
use anyhow::Result;
use clap::Parser;
use std::sync::Arc;

use mango_installer::cli::{Cli, Command};
use mango_installer::commands;
use mango_installer::config::settings::{Settings, resolve_root};
use mango_installer::exec::{Executor, SystemExecutor};
use mango_installer::logging::{Logger, init_subscriber};

fn main() -> Result<()> {
    let args = Cli::parse();
    let command = args.resolved_command();
    let run = match command {
        Command::Install => commands::install::run,
        Command::Verify => commands::verify::run,
        Command::Version => {
            commands::version::run();
            return Ok(());
        }
    };

    init_subscriber(args.verbose, command.log_name());
    let log = Arc::new(Logger::new(command.log_name()));
    let executor: Arc<dyn Executor> = Arc::new(SystemExecutor);

    let root = resolve_root(args.global.root.as_deref())?;
    let settings = Settings::from_env(root)?;
    run(&args.global, settings, &log, executor)
}
