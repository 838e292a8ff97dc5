//! Command-line interface definition.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Installer for the MangoWC compositor and the Noctalia shell.
#[derive(Parser, Debug)]
#[command(
    name = "mango-installer",
    about = "Install the MangoWC compositor and the Noctalia shell",
    version
)]
pub struct Cli {
    /// Subcommand to run; `install` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

impl Cli {
    /// The subcommand to run, defaulting to `install`.
    #[must_use]
    pub fn resolved_command(&self) -> Command {
        self.command.unwrap_or(Command::Install)
    }
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Directory holding config.conf (default: auto-detect)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Skip detection and use this package manager (apt, dnf, pacman, zypper)
    #[arg(long, global = true, value_name = "TAG")]
    pub package_manager: Option<String>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Install dependencies, compositor, configuration and shell
    Install,
    /// Check an existing installation
    Verify,
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the run log file.
    #[must_use]
    pub const fn log_name(self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Verify => "verify",
            Self::Version => "version",
        }
    }
}
