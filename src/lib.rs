//! Installer for the MangoWC Wayland compositor and the Noctalia shell.
//!
//! Detects the host package manager, installs build and runtime
//! dependencies, installs the compositor through an ordered fallback chain,
//! deploys its configuration, installs the shell the same way, and verifies
//! the result.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: environment settings and per-manager package lists
//! - **[`resources`]**: package-manager adapter, file, clone and download primitives
//! - **[`tasks`]**: the five ordered install steps and their fallback chains
//! - **[`commands`]**: top-level subcommand orchestration (`install`, `verify`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod platform;
pub mod resources;
pub mod tasks;
